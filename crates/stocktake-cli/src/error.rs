//! Error types for the CLI application.

use stocktake_capture::{CaptureError, ConfigError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file could not be read, parsed or written
    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    /// Submission failed
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Line editor failure
    #[error("Line editor error: {0}")]
    Readline(String),
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(e: rustyline::error::ReadlineError) -> Self {
        CliError::Readline(e.to_string())
    }
}
