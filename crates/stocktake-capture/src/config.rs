//! Configuration for the capture workflow
//!
//! Loaded once at start-up (defaults, then TOML file, then environment,
//! then command-line overrides) and immutable once handed to the workflow.

use crate::error::CaptureError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use stocktake_llm::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};
use stocktake_llm::GeminiProvider;
use stocktake_sheet::{DeliveryMode, Encoding, HttpMethod, HttpSink};
use thiserror::Error;

/// Environment variable holding the provider API key
pub const ENV_API_KEY: &str = "STOCKTAKE_API_KEY";
/// Fallback environment variable for the provider API key
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable holding the logging endpoint URL
pub const ENV_SHEET_URL: &str = "STOCKTAKE_SHEET_URL";
/// Environment variable overriding the model
pub const ENV_MODEL: &str = "STOCKTAKE_MODEL";
/// Environment variable overriding the provider API base
pub const ENV_API_BASE: &str = "STOCKTAKE_API_BASE";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write TOML
    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Extraction provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Logging endpoint settings
    #[serde(default)]
    pub sheet: SheetConfig,
}

/// Extraction provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key, passed as the `key` query parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Request timeout; unset means the transport default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

/// Logging endpoint settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// How the record is encoded
    #[serde(default)]
    pub encoding: Encoding,

    /// HTTP method
    #[serde(default)]
    pub method: HttpMethod,

    /// Whether submissions wait for the endpoint
    #[serde(default)]
    pub delivery: DeliveryMode,

    /// Request timeout; unset means the transport default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_base: default_api_base(),
            request_timeout_secs: None,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

/// Treat blank strings as absent
fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl CaptureConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write configuration to a TOML file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Overlay values from an environment lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY).or_else(|| get(ENV_GEMINI_API_KEY)) {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = get(ENV_SHEET_URL) {
            self.sheet.url = Some(url);
        }
        if let Some(model) = get(ENV_MODEL) {
            self.provider.model = model;
        }
        if let Some(base) = get(ENV_API_BASE) {
            self.provider.api_base = base;
        }
    }

    /// API key, or `MissingField` if absent or blank
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        non_blank(self.provider.api_key.as_ref())
            .ok_or_else(|| ConfigError::MissingField(format!("provider.api_key (or {})", ENV_API_KEY)))
    }

    /// Logging endpoint URL, or `MissingField` if absent or blank
    pub fn sheet_url(&self) -> Result<&str, ConfigError> {
        non_blank(self.sheet.url.as_ref())
            .ok_or_else(|| ConfigError::MissingField(format!("sheet.url (or {})", ENV_SHEET_URL)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_key()?;
        self.sheet_url()?;
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::MissingField("provider.model".to_string()));
        }
        if self.provider.api_base.trim().is_empty() {
            return Err(ConfigError::MissingField("provider.api_base".to_string()));
        }
        Ok(())
    }

    /// Copy with the API key masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(key) = copy.provider.api_key.as_mut() {
            let len = key.chars().count();
            let tail: String = key.chars().skip(len.saturating_sub(4)).collect();
            *key = if len > 8 {
                format!("****{}", tail)
            } else {
                "****".to_string()
            };
        }
        copy
    }

    /// Build the extraction provider described by this configuration
    pub fn build_provider(&self) -> Result<GeminiProvider, CaptureError> {
        let provider = GeminiProvider::new(self.api_key()?, self.provider.model.clone())
            .map_err(|e| CaptureError::Configuration(e.to_string()))?
            .with_api_base(self.provider.api_base.clone());

        match self.provider.request_timeout_secs {
            Some(secs) => provider
                .with_timeout(Duration::from_secs(secs))
                .map_err(|e| CaptureError::Configuration(e.to_string())),
            None => Ok(provider),
        }
    }

    /// Build the logging endpoint sink described by this configuration
    pub fn build_sink(&self) -> Result<HttpSink, CaptureError> {
        let sink = HttpSink::new(self.sheet_url()?)
            .map_err(|e| CaptureError::Configuration(e.to_string()))?
            .with_encoding(self.sheet.encoding)
            .with_method(self.sheet.method)
            .with_delivery(self.sheet.delivery);

        match self.sheet.request_timeout_secs {
            Some(secs) => sink
                .with_timeout(Duration::from_secs(secs))
                .map_err(|e| CaptureError::Configuration(e.to_string())),
            None => Ok(sink),
        }
    }
}
