//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the capture workflow and the
//! two remote services it talks to. HTTP implementations live in other
//! crates.

use crate::InventoryRecord;
use std::future::Future;

/// Trait for the generative-language extraction provider
///
/// Implemented by the infrastructure layer (stocktake-llm)
pub trait CompletionProvider {
    /// Error type for provider operations
    type Error;

    /// Send a single-turn instruction and return the raw completion text
    ///
    /// `Ok(None)` means the provider answered but returned no candidate.
    /// A candidate without text is `Ok(Some(String::new()))`.
    fn complete(
        &self,
        instruction: &str,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;
}

/// What a sink can say about a submitted record
///
/// The logging endpoint's response is opaque, so neither variant means the
/// record was stored. Delivery is at-most-once and unconfirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Request handed to a background task; its completion is not awaited
    Dispatched,

    /// Request was awaited until the endpoint answered; the answer was not read
    Settled,
}

impl Delivery {
    /// Short label for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Delivery::Dispatched => "dispatched",
            Delivery::Settled => "settled",
        }
    }
}

/// Trait for the spreadsheet-backed logging endpoint
///
/// Implemented by the infrastructure layer (stocktake-sheet)
pub trait RecordSink {
    /// Error type for sink operations
    type Error;

    /// Submit a record; never reports that it was stored
    fn submit(
        &self,
        record: &InventoryRecord,
    ) -> impl Future<Output = Result<Delivery, Self::Error>> + Send;
}
