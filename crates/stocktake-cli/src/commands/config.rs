//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs, Overrides};
use crate::config::load;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;
use stocktake_capture::CaptureConfig;

/// Execute the config command.
///
/// `path` is where the file lives or would live. Only `show` reads it, so
/// `path` and `init --force` still work when the file does not parse.
pub async fn execute_config(
    args: ConfigArgs,
    path: &Path,
    explicit: bool,
    overrides: &Overrides,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let config = load(path, explicit, overrides)?;
            show_config(&config, formatter)
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Init { force } => init_config(path, force, formatter),
    }
}

/// Print the effective configuration with the API key masked.
fn show_config(config: &CaptureConfig, formatter: &Formatter) -> Result<()> {
    print!("{}", config.redacted().to_toml()?);
    if let Err(e) = config.validate() {
        eprintln!("{}", formatter.warning(&e.to_string()));
    }
    Ok(())
}

/// Write a starter file with default settings.
fn init_config(path: &Path, force: bool, formatter: &Formatter) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    CaptureConfig::default().save(path)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote {}", path.display()))
    );
    println!(
        "{}",
        formatter.info("Set provider.api_key and sheet.url, or export STOCKTAKE_API_KEY and STOCKTAKE_SHEET_URL")
    );
    Ok(())
}
