//! Workflow status - what the front end shows for a submission

use std::fmt;

/// Presentation state of the capture workflow
///
/// Per submission the status moves through
/// `Idle → Extracting → (Persisting | Error) → (Success | Error)`.
/// A submission rejected before any network call (missing API key) goes
/// straight to `Error`. `Success` and `Error` are terminal for that
/// submission; the next submission starts again from `Extracting`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowStatus {
    /// Nothing submitted yet
    #[default]
    Idle,

    /// Waiting on the extraction provider
    Extracting,

    /// Handing the record to the logging endpoint
    Persisting,

    /// Submission finished; message is shown to the user
    Success(String),

    /// Submission failed; message is shown to the user
    Error(String),
}

impl WorkflowStatus {
    /// True while a submission is in flight (the trigger stays disabled)
    pub fn is_pending(&self) -> bool {
        matches!(self, WorkflowStatus::Extracting | WorkflowStatus::Persisting)
    }

    /// True once a submission has finished either way
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Success(_) | WorkflowStatus::Error(_))
    }

    /// Whether `next` is a legal successor of this status
    pub fn can_transition_to(&self, next: &WorkflowStatus) -> bool {
        use WorkflowStatus::*;
        match (self, next) {
            (Idle | Success(_) | Error(_), Extracting) => true,
            // Configuration errors fail before extraction starts
            (Idle | Success(_) | Error(_), Error(_)) => true,
            (Extracting, Persisting | Error(_)) => true,
            (Persisting, Success(_) | Error(_)) => true,
            _ => false,
        }
    }

    /// Short label for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Idle => "idle",
            WorkflowStatus::Extracting => "extracting",
            WorkflowStatus::Persisting => "persisting",
            WorkflowStatus::Success(_) => "success",
            WorkflowStatus::Error(_) => "error",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStatus::Idle => write!(f, "Ready"),
            WorkflowStatus::Extracting => write!(f, "AI is parsing..."),
            WorkflowStatus::Persisting => write!(f, "Saving to sheet..."),
            WorkflowStatus::Success(msg) => write!(f, "Success! {}", msg),
            WorkflowStatus::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}
