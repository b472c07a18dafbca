//! Stocktake Sheet Layer
//!
//! Implementations of the `RecordSink` trait from `stocktake-domain` for a
//! spreadsheet-backed logging endpoint.
//!
//! # Sinks
//!
//! - `HttpSink`: submits over HTTP using one of four encodings, either
//!   fire-and-forget or awaited
//! - `RecordingSink`: keeps submitted records in memory for tests
//!
//! Neither sink can confirm that a record was stored. The logging
//! endpoint's answer is opaque, so delivery is at-most-once and
//! unconfirmed; see [`stocktake_domain::Delivery`].

#![warn(missing_docs)]

pub mod encoding;
pub mod http;

use std::sync::{Arc, Mutex};
use stocktake_domain::{Delivery, InventoryRecord, RecordSink};
use thiserror::Error;

pub use encoding::{Encoding, HttpMethod};
pub use http::{DeliveryMode, HttpSink};

/// Errors that can occur before a record leaves the process
///
/// There is no "rejected by endpoint" variant: the endpoint's
/// answer is never read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    /// Endpoint URL is missing or unusable
    #[error("Invalid sheet endpoint: {0}")]
    InvalidEndpoint(String),

    /// Record could not be encoded
    #[error("Failed to encode record: {0}")]
    Encode(String),

    /// Request could not be sent at all (awaited delivery only)
    #[error("Failed to reach sheet endpoint: {0}")]
    Transport(String),

    /// Sink could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// In-memory sink for tests
///
/// # Examples
///
/// ```
/// use stocktake_sheet::RecordingSink;
///
/// let sink = RecordingSink::new();
/// assert_eq!(sink.call_count(), 0);
/// assert!(sink.records().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<InventoryRecord>>>,
    delivery: Delivery,
    failure: Option<SinkError>,
}

impl RecordingSink {
    /// Sink that reports every record as dispatched
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            delivery: Delivery::Dispatched,
            failure: None,
        }
    }

    /// Sink that reports every record as settled
    pub fn awaited() -> Self {
        Self {
            delivery: Delivery::Settled,
            ..Self::new()
        }
    }

    /// Sink that fails every submission with `error` (still counting the call)
    pub fn failing(error: SinkError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    /// Records submitted so far, oldest first
    pub fn records(&self) -> Vec<InventoryRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Number of submissions
    pub fn call_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSink for RecordingSink {
    type Error = SinkError;

    async fn submit(&self, record: &InventoryRecord) -> Result<Delivery, Self::Error> {
        self.records.lock().unwrap().push(record.clone());
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.delivery),
        }
    }
}
