//! Inventory record - the unit produced by one submission

use std::fmt;

/// Wire name of the item name field
pub const ITEM_NAME: &str = "itemName";
/// Wire name of the category field
pub const CATEGORY: &str = "category";
/// Wire name of the quantity field
pub const QUANTITY: &str = "quantity";
/// Wire name of the location field
pub const LOCATION: &str = "location";

/// One inventory entry extracted from free text
///
/// Records are transient: they live for the duration of a single
/// submission and are dropped once the status has been reported.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRecord {
    /// What was stored (e.g. "hammers")
    pub item_name: String,

    /// Free-form grouping (e.g. "tools")
    pub category: String,

    /// How many; may be fractional ("2.5" kg of flour)
    pub quantity: f64,

    /// Where it was put (e.g. "garage")
    pub location: String,
}

/// Reasons a record violates the four-field invariant
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A text field is absent or blank
    MissingField(&'static str),

    /// Quantity is NaN or infinite
    NonFiniteQuantity,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::MissingField(name) => write!(f, "missing field '{}'", name),
            RecordError::NonFiniteQuantity => write!(f, "quantity must be a finite number"),
        }
    }
}

impl std::error::Error for RecordError {}

impl InventoryRecord {
    /// Create a record, trimming the text fields and checking the invariant
    ///
    /// # Examples
    ///
    /// ```
    /// use stocktake_domain::InventoryRecord;
    ///
    /// let record = InventoryRecord::new(" hammers ", "tools", 5.0, "garage").unwrap();
    /// assert_eq!(record.item_name, "hammers");
    /// assert!(InventoryRecord::new("", "tools", 5.0, "garage").is_err());
    /// ```
    pub fn new(
        item_name: impl AsRef<str>,
        category: impl AsRef<str>,
        quantity: f64,
        location: impl AsRef<str>,
    ) -> Result<Self, RecordError> {
        let record = Self {
            item_name: item_name.as_ref().trim().to_string(),
            category: category.as_ref().trim().to_string(),
            quantity,
            location: location.as_ref().trim().to_string(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Check that all four fields are present and quantity is numeric
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.item_name.trim().is_empty() {
            return Err(RecordError::MissingField(ITEM_NAME));
        }
        if self.category.trim().is_empty() {
            return Err(RecordError::MissingField(CATEGORY));
        }
        if !self.quantity.is_finite() {
            return Err(RecordError::NonFiniteQuantity);
        }
        if self.location.trim().is_empty() {
            return Err(RecordError::MissingField(LOCATION));
        }
        Ok(())
    }

    /// Quantity as text: whole numbers have no fractional part ("5", "2.5")
    pub fn quantity_text(&self) -> String {
        self.quantity.to_string()
    }

    /// Field name/value pairs in wire order, with quantity rendered as text
    ///
    /// Used by encodings that only carry strings (query string, form body).
    pub fn text_fields(&self) -> [(&'static str, String); 4] {
        [
            (ITEM_NAME, self.item_name.clone()),
            (CATEGORY, self.category.clone()),
            (QUANTITY, self.quantity_text()),
            (LOCATION, self.location.clone()),
        ]
    }
}

impl fmt::Display for InventoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) in {}",
            self.quantity_text(),
            self.item_name,
            self.category,
            self.location
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hammers() -> InventoryRecord {
        InventoryRecord::new("hammers", "tools", 5.0, "garage").unwrap()
    }

    #[test]
    fn test_new_trims_text_fields() {
        let record = InventoryRecord::new("  hammers\n", " tools ", 5.0, "\tgarage").unwrap();
        assert_eq!(record, hammers());
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert_eq!(
            InventoryRecord::new("   ", "tools", 1.0, "garage"),
            Err(RecordError::MissingField(ITEM_NAME))
        );
        assert_eq!(
            InventoryRecord::new("hammers", "", 1.0, "garage"),
            Err(RecordError::MissingField(CATEGORY))
        );
        assert_eq!(
            InventoryRecord::new("hammers", "tools", 1.0, ""),
            Err(RecordError::MissingField(LOCATION))
        );
    }

    #[test]
    fn test_non_finite_quantity_rejected() {
        assert_eq!(
            InventoryRecord::new("hammers", "tools", f64::NAN, "garage"),
            Err(RecordError::NonFiniteQuantity)
        );
        assert_eq!(
            InventoryRecord::new("hammers", "tools", f64::INFINITY, "garage"),
            Err(RecordError::NonFiniteQuantity)
        );
    }

    #[test]
    fn test_quantity_text() {
        assert_eq!(hammers().quantity_text(), "5");

        let flour = InventoryRecord::new("flour", "baking", 2.5, "pantry").unwrap();
        assert_eq!(flour.quantity_text(), "2.5");
    }

    #[test]
    fn test_text_fields_order() {
        let fields = hammers().text_fields();
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["itemName", "category", "quantity", "location"]);
        assert_eq!(fields[2].1, "5");
    }

    #[test]
    fn test_display() {
        assert_eq!(hammers().to_string(), "5 hammers (tools) in garage");
    }
}
