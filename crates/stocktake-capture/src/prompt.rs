//! Extraction instruction

/// JSON shape the model is asked to answer with
pub const TARGET_SHAPE: &str =
    r#"{"itemName": "string", "category": "string", "quantity": number, "location": "string"}"#;

/// Builds the single-turn instruction sent to the provider
pub struct PromptBuilder {
    text: String,
}

impl PromptBuilder {
    /// Create a builder for the user's free text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Build the instruction
    ///
    /// The user's text is embedded verbatim (trimmed); interior quotes are
    /// escaped so the quoted span stays unambiguous.
    pub fn build(&self) -> String {
        format!(
            "Extract inventory data from: \"{}\". Respond ONLY with JSON: {}",
            self.text.trim().replace('"', "\\\""),
            TARGET_SHAPE
        )
    }
}
