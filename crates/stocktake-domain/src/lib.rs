//! Stocktake Domain Layer
//!
//! Core types and collaborator interfaces for capturing inventory entries
//! from free text. This crate has no I/O and a single external dependency
//! (`uuid`); HTTP implementations of the collaborators live in
//! `stocktake-llm` and `stocktake-sheet`.
//!
//! ## Key Concepts
//!
//! - **InventoryRecord**: the four fields extracted from one submission
//! - **WorkflowStatus**: what the front end shows while a submission runs
//! - **CompletionProvider**: turns an instruction into raw completion text
//! - **RecordSink**: hands a record to the logging endpoint and reports
//!   only that it was dispatched, never that it was stored

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod status;
pub mod submission;
pub mod traits;

// Re-exports for convenience
pub use record::{InventoryRecord, RecordError};
pub use status::WorkflowStatus;
pub use submission::SubmissionId;
pub use traits::{CompletionProvider, Delivery, RecordSink};
