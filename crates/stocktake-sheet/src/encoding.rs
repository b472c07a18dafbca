//! How a record is put on the wire

use serde::{Deserialize, Serialize};
use stocktake_domain::record::{CATEGORY, ITEM_NAME, LOCATION, QUANTITY};
use stocktake_domain::InventoryRecord;

/// Body encoding for the logging endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Fields as URL query parameters, empty body
    #[default]
    Query,
    /// `application/x-www-form-urlencoded` body
    Form,
    /// `application/json` body
    Json,
    /// `text/plain` body holding the JSON document
    Text,
}

impl Encoding {
    /// Content type of the body, if the encoding has one
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Encoding::Query => None,
            Encoding::Form => Some("application/x-www-form-urlencoded"),
            Encoding::Json => Some("application/json"),
            Encoding::Text => Some("text/plain;charset=UTF-8"),
        }
    }

    /// Encoding actually used with `method`; GET requests carry no body
    pub fn effective(self, method: HttpMethod) -> Encoding {
        match method {
            HttpMethod::Get => Encoding::Query,
            HttpMethod::Post => self,
        }
    }

    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Query => "query",
            Encoding::Form => "form",
            Encoding::Json => "json",
            Encoding::Text => "text",
        }
    }
}

/// HTTP method for the logging endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// POST (the endpoint's usual entry point)
    #[default]
    Post,
    /// GET, fields in the query string
    Get,
}

impl HttpMethod {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "post",
            HttpMethod::Get => "get",
        }
    }
}

/// JSON document for the `Json` and `Text` encodings
///
/// Quantity stays a JSON number here (an integer when whole, so `5`
/// rather than `5.0`); query and form encodings carry it as text.
pub fn json_document(record: &InventoryRecord) -> serde_json::Value {
    serde_json::json!({
        ITEM_NAME: record.item_name,
        CATEGORY: record.category,
        QUANTITY: quantity_number(record.quantity),
        LOCATION: record.location,
    })
}

fn quantity_number(quantity: f64) -> serde_json::Value {
    let whole = quantity.fract() == 0.0 && quantity.abs() < i64::MAX as f64;
    if whole {
        serde_json::Value::from(quantity as i64)
    } else {
        serde_json::Value::from(quantity)
    }
}
