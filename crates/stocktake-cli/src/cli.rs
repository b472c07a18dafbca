//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stocktake_sheet::{DeliveryMode, Encoding};

/// Stocktake - Log inventory to a spreadsheet from plain sentences.
#[derive(Debug, Parser)]
#[command(name = "stocktake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Settings that take precedence over the config file and environment.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Logging endpoint URL
    #[arg(long, global = true)]
    pub sheet_url: Option<String>,

    /// How records are encoded for the logging endpoint
    #[arg(long, value_enum, global = true)]
    pub encoding: Option<EncodingArg>,

    /// Whether submissions wait for the logging endpoint
    #[arg(long, value_enum, global = true)]
    pub delivery: Option<DeliveryArg>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// Record encoding argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EncodingArg {
    /// Query-string parameters
    Query,
    /// URL-encoded form body
    Form,
    /// JSON body
    Json,
    /// JSON document sent as text/plain
    Text,
}

/// Delivery mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DeliveryArg {
    /// Send in the background and report success immediately
    FireAndForget,
    /// Wait until the endpoint answers (the answer is still not read)
    Awaited,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture one entry from a sentence
    Add(AddArgs),

    /// Enter the interactive capture form
    Form,

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the add command.
#[derive(Debug, Parser)]
pub struct AddArgs {
    /// What was stocked, e.g. "I put 5 hammers in the garage"
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

impl AddArgs {
    /// Words joined back into one sentence
    pub fn sentence(&self) -> String {
        self.text.join(" ")
    }
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (API key redacted)
    Show,

    /// Print the configuration file path
    Path,

    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::output::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::output::OutputFormat::Table,
            CliFormat::Json => crate::output::OutputFormat::Json,
        }
    }
}

impl From<EncodingArg> for Encoding {
    fn from(encoding: EncodingArg) -> Self {
        match encoding {
            EncodingArg::Query => Encoding::Query,
            EncodingArg::Form => Encoding::Form,
            EncodingArg::Json => Encoding::Json,
            EncodingArg::Text => Encoding::Text,
        }
    }
}

impl From<DeliveryArg> for DeliveryMode {
    fn from(delivery: DeliveryArg) -> Self {
        match delivery {
            DeliveryArg::FireAndForget => DeliveryMode::FireAndForget,
            DeliveryArg::Awaited => DeliveryMode::Awaited,
        }
    }
}
