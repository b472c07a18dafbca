//! Add command implementation.

use super::DRAIN_TIMEOUT;
use crate::cli::AddArgs;
use crate::error::Result;
use crate::output::{Formatter, OutputFormat};
use stocktake_capture::{CaptureConfig, CaptureWorkflow};
use stocktake_domain::WorkflowStatus;
use tracing::warn;

/// Execute the add command.
///
/// Progress lines go to stderr so `--format json` leaves stdout parseable.
/// A failed submission is returned as an error for `main` to report.
pub async fn execute_add(args: AddArgs, config: CaptureConfig, formatter: &Formatter) -> Result<()> {
    let sentence = args.sentence();
    if sentence.trim().is_empty() {
        println!("{}", formatter.info("Nothing to capture"));
        return Ok(());
    }

    let provider = config.build_provider()?;
    let sink = config.build_sink()?;
    let workflow = CaptureWorkflow::new(provider, sink, config);

    let result = workflow
        .capture_with(&sentence, |status| eprintln!("{}", formatter.status(status)))
        .await;

    // Fire-and-forget requests must leave before the runtime shuts down
    let unfinished = workflow.sink().drain(DRAIN_TIMEOUT).await;
    if unfinished > 0 {
        warn!("{} sheet dispatch(es) still in flight at exit", unfinished);
    }

    let Some(capture) = result? else {
        return Ok(());
    };

    let done = WorkflowStatus::Success(capture.success_message());
    match formatter.format() {
        OutputFormat::Json => eprintln!("{}", formatter.status(&done)),
        OutputFormat::Table => println!("{}", formatter.status(&done)),
    }
    println!("{}", formatter.format_capture(&capture)?);

    Ok(())
}
