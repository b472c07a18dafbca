//! Stocktake CLI library.
//!
//! Command-line front end for inventory capture: argument parsing,
//! configuration layering, command execution and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use output::{Formatter, OutputFormat};
