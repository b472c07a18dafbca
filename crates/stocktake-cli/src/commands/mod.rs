//! Command implementations.

pub mod add;
pub mod config;
pub mod form;

pub use self::add::execute_add;
pub use self::config::execute_config;
pub use self::form::execute_form;

use std::time::Duration;

/// How long to wait for background dispatches before the process exits.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
