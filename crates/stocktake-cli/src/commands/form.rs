//! Interactive capture form.
//!
//! Each line typed is one submission. Lines starting with `:` are form
//! commands.

use super::DRAIN_TIMEOUT;
use crate::config::history_path;
use crate::error::Result;
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use stocktake_capture::{CaptureConfig, CaptureSession, CaptureWorkflow};
use stocktake_domain::{CompletionProvider, RecordSink, WorkflowStatus};
use tracing::warn;

/// One line of form input.
#[derive(Debug, PartialEq, Eq)]
enum FormInput<'a> {
    Empty,
    Quit,
    Help,
    ToggleDebug,
    Submit(&'a str),
    Unknown(&'a str),
}

/// Classify a line of form input.
fn parse_form_line(line: &str) -> FormInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return FormInput::Empty;
    }

    match line {
        ":quit" | ":q" | ":exit" => FormInput::Quit,
        ":help" | ":h" | ":?" => FormInput::Help,
        ":debug" => FormInput::ToggleDebug,
        _ if line.starts_with(':') => FormInput::Unknown(line),
        _ => FormInput::Submit(line),
    }
}

/// Run the interactive form.
pub async fn execute_form(config: CaptureConfig, formatter: &Formatter) -> Result<()> {
    let provider = config.build_provider()?;
    let sink = config.build_sink()?;
    let mut session = CaptureSession::new(CaptureWorkflow::new(provider, sink, config));

    println!(
        "{}",
        formatter.info("Stocktake - describe what you stocked, ':help' for commands, ':quit' to exit")
    );
    println!("{}", formatter.status(session.status()));
    println!();

    let mut editor = DefaultEditor::new()?;

    let history_path = history_path()?;
    let _ = editor.load_history(&history_path);

    let mut debug = false;

    loop {
        match editor.readline("stocktake> ") {
            Ok(line) => match parse_form_line(&line) {
                FormInput::Empty => continue,
                FormInput::Quit => {
                    println!("{}", formatter.info("Goodbye!"));
                    break;
                }
                FormInput::Help => print_help(formatter),
                FormInput::ToggleDebug => {
                    debug = !debug;
                    let state = if debug { "on" } else { "off" };
                    println!("{}", formatter.info(&format!("Raw AI response display {}", state)));
                }
                FormInput::Unknown(command) => {
                    eprintln!(
                        "{}",
                        formatter.error(&format!("Unknown command: {}. Type ':help' for commands.", command))
                    );
                }
                FormInput::Submit(text) => {
                    editor.add_history_entry(text).ok();
                    session.set_input(text);
                    submit(&mut session, formatter, debug).await;
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use ':quit' to exit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    editor.save_history(&history_path).ok();

    let unfinished = session.workflow().sink().drain(DRAIN_TIMEOUT).await;
    if unfinished > 0 {
        warn!("{} sheet dispatch(es) still in flight at exit", unfinished);
    }

    Ok(())
}

/// Submit the session's input and print progress, result and debug view.
async fn submit<P, S>(session: &mut CaptureSession<P, S>, formatter: &Formatter, debug: bool)
where
    P: CompletionProvider,
    S: RecordSink,
    P::Error: Display,
    S::Error: Display,
{
    let status = session
        .submit_with(|next| {
            if next.is_pending() {
                println!("{}", formatter.status(next));
            }
        })
        .await;
    println!("{}", formatter.status(status));

    if debug {
        match session.last_completion() {
            Some(text) => println!("{}", formatter.completion(text)),
            None => println!("{}", formatter.info("No AI response for this submission")),
        }
    }

    if let (WorkflowStatus::Success(_), Some(capture)) = (session.status(), session.last_capture()) {
        match formatter.format_capture(capture) {
            Ok(output) => println!("{}", output),
            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
        }
    }
    println!();
}

/// Print form help.
fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Type a sentence to log it, e.g. 'I put 5 hammers in the garage'"));
    println!();
    println!("Commands:");
    println!("  :debug    Toggle display of the raw AI response");
    println!("  :help     Show this help");
    println!("  :quit     Exit the form");
    println!();
}
