//! Submission identifiers

use std::fmt;

/// Identifier for one submission, based on UUIDv7
///
/// Only used to correlate log lines for a submission; nothing is stored
/// under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(u128);

impl SubmissionId {
    /// Generate a new time-ordered identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use stocktake_domain::SubmissionId;
    ///
    /// let id = SubmissionId::new();
    /// assert_eq!(id.to_string().len(), 36);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Wrap a raw value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Milliseconds since the Unix epoch at which the id was generated
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are the Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_chronological() {
        let id1 = SubmissionId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = SubmissionId::new();

        assert!(id1 < id2);
        assert!(id1.timestamp() <= id2.timestamp());
    }

    #[test]
    fn test_timestamp_is_recent() {
        // 2020-01-01 in milliseconds
        assert!(SubmissionId::new().timestamp() > 1_577_836_800_000);
    }
}
