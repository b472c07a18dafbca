//! Stocktake CLI - log inventory to a spreadsheet from plain sentences.

use clap::Parser;
use stocktake_cli::commands;
use stocktake_cli::config;
use stocktake_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> stocktake_cli::Result<()> {
    let path = config::resolve_path(cli.config.as_deref())?;
    let explicit = cli.config.is_some();

    let format = cli.format.map(Into::into).unwrap_or_default();
    let formatter = Formatter::new(format, !cli.no_color);

    match cli.command {
        None | Some(Command::Form) => {
            let capture_config = config::load(&path, explicit, &cli.overrides)?;
            commands::execute_form(capture_config, &formatter).await?;
        }
        Some(Command::Add(args)) => {
            let capture_config = config::load(&path, explicit, &cli.overrides)?;
            commands::execute_add(args, capture_config, &formatter).await?;
        }
        // Loads the file itself: `path` and `init` must work on a broken one
        Some(Command::Config(args)) => {
            commands::execute_config(args, &path, explicit, &cli.overrides, &formatter).await?;
        }
    }

    Ok(())
}
