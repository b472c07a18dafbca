//! Result types for a submission

use stocktake_domain::{Delivery, InventoryRecord, SubmissionId};

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    /// Identifier used in log lines for this submission
    pub id: SubmissionId,

    /// Record extracted from the completion
    pub record: InventoryRecord,

    /// What the sink could say about delivery
    pub delivery: Delivery,

    /// Completion text as received, before fence removal
    pub raw_completion: String,
}

impl Capture {
    /// Message shown to the user, e.g. "Added 5 hammers to garage"
    pub fn success_message(&self) -> String {
        format!(
            "Added {} {} to {}",
            self.record.quantity_text(),
            self.record.item_name,
            self.record.location
        )
    }
}
