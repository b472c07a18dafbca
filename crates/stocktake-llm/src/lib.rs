//! Stocktake Extraction Provider Layer
//!
//! Implementations of the `CompletionProvider` trait from `stocktake-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google generative-language `generateContent` API
//!
//! # Examples
//!
//! ```
//! use stocktake_llm::MockProvider;
//! use stocktake_domain::CompletionProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new("{\"itemName\": \"hammers\"}");
//! let text = provider.complete("any instruction").await.unwrap();
//! assert_eq!(text.as_deref(), Some("{\"itemName\": \"hammers\"}"));
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;

use std::sync::{Arc, Mutex};
use stocktake_domain::CompletionProvider;
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur while talking to the extraction provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Provider answered with a non-success status or an error object
    #[error("Provider rejected request (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider's error message, or the status text if it sent none
        message: String,
    },

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Scripted reply for the mock provider
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    NoCandidate,
    Fail(LlmError),
}

/// Mock provider for deterministic testing
///
/// Returns pre-configured completions without making network calls.
/// Replies can be keyed on a fragment of the instruction; the first
/// matching fragment wins, otherwise the default reply is used.
///
/// # Examples
///
/// ```
/// use stocktake_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("hammers", "{}");
/// provider.add_error("drills", 500, "backend unavailable");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    replies: Arc<Mutex<Vec<(String, MockReply)>>>,
    instructions: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a mock that answers every instruction with `completion`
    pub fn new(completion: impl Into<String>) -> Self {
        Self::with_default(MockReply::Text(completion.into()))
    }

    /// Create a mock whose every answer has no candidate
    pub fn no_candidate() -> Self {
        Self::with_default(MockReply::NoCandidate)
    }

    /// Create a mock that rejects every instruction with an HTTP status
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self::with_default(MockReply::Fail(LlmError::Api {
            status,
            message: message.into(),
        }))
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            replies: Arc::new(Mutex::new(Vec::new())),
            instructions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer instructions containing `fragment` with `completion`
    pub fn add_response(&mut self, fragment: impl Into<String>, completion: impl Into<String>) {
        self.push(fragment.into(), MockReply::Text(completion.into()));
    }

    /// Reject instructions containing `fragment` with an HTTP status
    pub fn add_error(&mut self, fragment: impl Into<String>, status: u16, message: impl Into<String>) {
        let error = LlmError::Api {
            status,
            message: message.into(),
        };
        self.push(fragment.into(), MockReply::Fail(error));
    }

    fn push(&mut self, fragment: String, reply: MockReply) {
        self.replies
            .lock()
            .unwrap()
            .push((fragment, reply));
    }

    /// Number of times `complete` was called
    pub fn call_count(&self) -> usize {
        self.instructions.lock().unwrap().len()
    }

    /// Instructions received so far, oldest first
    pub fn instructions(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }

    /// Forget recorded instructions
    pub fn reset_call_count(&self) {
        self.instructions.lock().unwrap().clear();
    }

    fn reply_for(&self, instruction: &str) -> MockReply {
        let replies = self.replies.lock().unwrap();
        replies
            .iter()
            .find(|(fragment, _)| instruction.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, instruction: &str) -> Result<Option<String>, Self::Error> {
        self.instructions
            .lock()
            .unwrap()
            .push(instruction.to_string());

        match self.reply_for(instruction) {
            MockReply::Text(text) => Ok(Some(text)),
            MockReply::NoCandidate => Ok(None),
            MockReply::Fail(error) => Err(error),
        }
    }
}
