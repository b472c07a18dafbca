//! Stocktake Capture
//!
//! Turns a free-text inventory note into a structured record and hands it to
//! a spreadsheet logging endpoint.
//!
//! # Architecture
//!
//! ```text
//! Text → Prompt → Provider → Fence removal → Parser → Sink
//! ```
//!
//! `CaptureWorkflow` runs one submission and returns a typed result.
//! `CaptureSession` wraps it with the state a front end needs (input text,
//! status, loading flag) and never fails: errors end up in the status.
//!
//! # Example Usage
//!
//! ```no_run
//! use stocktake_capture::{CaptureConfig, CaptureSession, CaptureWorkflow};
//! use stocktake_llm::MockProvider;
//! use stocktake_sheet::RecordingSink;
//!
//! # async fn example() {
//! let mut config = CaptureConfig::default();
//! config.provider.api_key = Some("key".to_string());
//!
//! let provider = MockProvider::new(
//!     r#"{"itemName":"hammers","category":"tools","quantity":5,"location":"garage"}"#,
//! );
//! let workflow = CaptureWorkflow::new(provider, RecordingSink::new(), config);
//! let mut session = CaptureSession::new(workflow);
//!
//! session.set_input("I put 5 hammers in the garage");
//! println!("{}", session.submit().await);
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod parser;
mod prompt;
mod session;
mod types;
mod workflow;


pub use config::{
    CaptureConfig, ConfigError, ProviderConfig, SheetConfig, ENV_API_BASE, ENV_API_KEY,
    ENV_GEMINI_API_KEY, ENV_MODEL, ENV_SHEET_URL,
};
pub use error::CaptureError;
pub use parser::{parse_completion, strip_fences};
pub use prompt::{PromptBuilder, TARGET_SHAPE};
pub use session::CaptureSession;
pub use types::Capture;
pub use workflow::CaptureWorkflow;
