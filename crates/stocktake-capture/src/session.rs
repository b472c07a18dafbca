//! Front-end state around the workflow: input, status, loading

use crate::types::Capture;
use crate::workflow::CaptureWorkflow;
use std::fmt::Display;
use stocktake_domain::{CompletionProvider, RecordSink, WorkflowStatus};

/// UI-local state for one user
///
/// `submit` never fails: every error becomes `WorkflowStatus::Error`. It
/// takes `&mut self`, so a second submission cannot start while one is
/// pending.
pub struct CaptureSession<P, S>
where
    P: CompletionProvider,
    S: RecordSink,
{
    workflow: CaptureWorkflow<P, S>,
    input: String,
    status: WorkflowStatus,
    last_capture: Option<Capture>,
    last_completion: Option<String>,
}

impl<P, S> CaptureSession<P, S>
where
    P: CompletionProvider,
    S: RecordSink,
    P::Error: Display,
    S::Error: Display,
{
    /// Create a session with empty input and `Idle` status
    pub fn new(workflow: CaptureWorkflow<P, S>) -> Self {
        Self {
            workflow,
            input: String::new(),
            status: WorkflowStatus::Idle,
            last_capture: None,
            last_completion: None,
        }
    }

    /// Replace the input text
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Current input text
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Current status
    pub fn status(&self) -> &WorkflowStatus {
        &self.status
    }

    /// Whether a submission is in flight
    pub fn is_loading(&self) -> bool {
        self.status.is_pending()
    }

    /// Most recent successful capture
    pub fn last_capture(&self) -> Option<&Capture> {
        self.last_capture.as_ref()
    }

    /// Raw completion of the latest submission, if it got that far
    pub fn last_completion(&self) -> Option<&str> {
        self.last_completion.as_deref()
    }

    /// Underlying workflow
    pub fn workflow(&self) -> &CaptureWorkflow<P, S> {
        &self.workflow
    }

    /// Submit the current input
    pub async fn submit(&mut self) -> &WorkflowStatus {
        self.submit_with(|_| {}).await
    }

    /// Submit the current input, calling `on_status` on every status change
    ///
    /// Blank input leaves the status untouched and makes no calls.
    pub async fn submit_with<F>(&mut self, mut on_status: F) -> &WorkflowStatus
    where
        F: FnMut(&WorkflowStatus),
    {
        if self.input.trim().is_empty() {
            return &self.status;
        }

        let prompt = self.input.clone();
        self.last_completion = None;
        let status = &mut self.status;
        let result = self
            .workflow
            .capture_with(&prompt, |next| {
                *status = next.clone();
                on_status(next);
            })
            .await;

        let next = match result {
            Ok(Some(capture)) => {
                let message = capture.success_message();
                self.input.clear();
                self.last_completion = Some(capture.raw_completion.clone());
                self.last_capture = Some(capture);
                WorkflowStatus::Success(message)
            }
            Ok(None) => return &self.status,
            Err(e) => {
                if let Some(completion) = e.completion() {
                    self.last_completion = Some(completion.to_string());
                }
                WorkflowStatus::Error(e.to_string())
            }
        };

        self.status = next;
        on_status(&self.status);
        &self.status
    }
}
