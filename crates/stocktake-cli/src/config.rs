//! Configuration loading for the CLI.
//!
//! Layers, lowest precedence first: built-in defaults, the TOML file,
//! environment variables, command-line flags.

use crate::cli::Overrides;
use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use stocktake_capture::CaptureConfig;

/// Directory holding the config file and form history.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".stocktake"))
}

/// Default configuration file path.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Form history file path.
pub fn history_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("history.txt"))
}

/// Resolve the config file path from the `--config` flag.
pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    }
}

/// Load the effective configuration from the process environment.
pub fn load(path: &Path, explicit: bool, overrides: &Overrides) -> Result<CaptureConfig> {
    load_with(path, explicit, overrides, |name| std::env::var(name).ok())
}

/// Load the effective configuration with an environment lookup.
///
/// A missing file is fine at the default location but an error when the
/// path was given explicitly.
pub fn load_with<F>(path: &Path, explicit: bool, overrides: &Overrides, lookup: F) -> Result<CaptureConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if path.exists() {
        CaptureConfig::from_file(path)?
    } else if explicit {
        return Err(CliError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    } else {
        CaptureConfig::default()
    };

    config.apply_env_with(lookup);
    apply_overrides(&mut config, overrides);
    Ok(config)
}

/// Apply command-line flags on top of everything else.
pub fn apply_overrides(config: &mut CaptureConfig, overrides: &Overrides) {
    if let Some(model) = &overrides.model {
        config.provider.model = model.clone();
    }
    if let Some(url) = &overrides.sheet_url {
        config.sheet.url = Some(url.clone());
    }
    if let Some(encoding) = overrides.encoding {
        config.sheet.encoding = encoding.into();
    }
    if let Some(delivery) = overrides.delivery {
        config.sheet.delivery = delivery.into();
    }
}
