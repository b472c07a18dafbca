//! Error types for the capture workflow

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can end a submission
///
/// Every variant is turned into a `WorkflowStatus::Error` by
/// `CaptureSession`. Whether the logging endpoint stored the record is never
/// known, so there is no variant for it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// Required configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider rejected the request or could not be reached
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Provider answered without any candidate
    #[error("The AI returned no completion")]
    EmptyResponse,

    /// Completion is not a valid inventory record after fence removal
    #[error("Could not read an inventory record from the AI response: {reason}")]
    MalformedExtraction {
        /// Why parsing failed
        reason: String,
        /// Completion text as received
        completion: String,
    },

    /// Record could not be handed to the logging endpoint
    #[error("Could not dispatch record to the sheet: {0}")]
    Dispatch(String),
}

impl CaptureError {
    /// Raw completion text, for errors that have one
    pub fn completion(&self) -> Option<&str> {
        match self {
            CaptureError::MalformedExtraction { completion, .. } => Some(completion),
            _ => None,
        }
    }
}

impl From<ConfigError> for CaptureError {
    fn from(e: ConfigError) -> Self {
        CaptureError::Configuration(e.to_string())
    }
}
