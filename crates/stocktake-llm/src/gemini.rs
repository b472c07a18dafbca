//! Gemini Provider Implementation
//!
//! Calls the generative-language `generateContent` endpoint:
//!
//! ```text
//! POST <api_base>/models/<model>:generateContent?key=<api_key>
//! { "contents": [{ "parts": [{ "text": <instruction> }] }] }
//! ```
//!
//! The completion text is read from `candidates[0].content.parts[0].text`.
//! No retries and, unless configured, no timeout beyond the transport's own.
//!
//! # Examples
//!
//! ```no_run
//! use stocktake_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("my-api-key", "gemini-2.0-flash").unwrap();
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stocktake_domain::CompletionProvider;
use tracing::debug;

/// Default generative-language API base
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini API provider
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    api_base: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

/// Request body for generateContent
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response from generateContent
#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Error envelope returned alongside non-success statuses
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: Option<u16>,
    message: Option<String>,
    status: Option<String>,
}

impl ApiErrorBody {
    fn describe(&self) -> Option<String> {
        self.message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.status.clone())
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the API key is blank or the HTTP
    /// client cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is missing".to_string()));
        }

        Ok(Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: model.into(),
            api_key,
            client: build_client(None)?,
        })
    }

    /// Point the provider at a different API base (e.g. a proxy)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(Some(timeout))?;
        Ok(self)
    }

    /// Model name requests are sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint URL without the key query parameter
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Send an instruction and return the first candidate's text
    ///
    /// # Errors
    ///
    /// - `LlmError::Api` for a non-success status or an error object in the body
    /// - `LlmError::Communication` if the request could not be sent
    /// - `LlmError::InvalidResponse` if the body is not JSON
    pub async fn generate(&self, instruction: &str) -> Result<Option<String>, LlmError> {
        let url = self.endpoint();
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: instruction }],
            }],
        };

        debug!("POST {} ({} char instruction)", url, instruction.len());

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", redact(&e.to_string(), &self.api_key))))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_message(&text).unwrap_or_else(|| status.to_string()),
            });
        }

        debug!("Provider answered {} with {} bytes", status, text.len());
        parse_completion(status.as_u16(), &text)
    }
}

impl CompletionProvider for GeminiProvider {
    type Error = LlmError;

    async fn complete(&self, instruction: &str) -> Result<Option<String>, Self::Error> {
        self.generate(instruction).await
    }
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Pull the provider's error message out of an error body, if it has one
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.describe())
}

/// Read the first candidate's text out of a success body
///
/// No candidate at all is `Ok(None)`; a candidate without text is an
/// empty string.
fn parse_completion(status: u16, body: &str) -> Result<Option<String>, LlmError> {
    let response: GenerateContentResponse = if body.trim().is_empty() {
        GenerateContentResponse::default()
    } else {
        serde_json::from_str(body)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?
    };

    if let Some(error) = response.error {
        return Err(LlmError::Api {
            status: error.code.unwrap_or(status),
            message: error.describe().unwrap_or_else(|| "unknown provider error".to_string()),
        });
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(None);
    };

    let text = candidate
        .content
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .unwrap_or_default();

    Ok(Some(text))
}

fn redact(message: &str, secret: &str) -> String {
    if secret.is_empty() {
        return message.to_string();
    }
    message.replace(secret, "***")
}
