//! Core capture workflow

use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::parser::parse_completion;
use crate::prompt::PromptBuilder;
use crate::types::Capture;
use std::fmt::Display;
use stocktake_domain::{CompletionProvider, RecordSink, SubmissionId, WorkflowStatus};
use tracing::{debug, info, info_span, warn, Instrument};

/// Runs one submission: extract with the provider, then hand the record to the sink
pub struct CaptureWorkflow<P, S>
where
    P: CompletionProvider,
    S: RecordSink,
{
    provider: P,
    sink: S,
    config: CaptureConfig,
}

impl<P, S> CaptureWorkflow<P, S>
where
    P: CompletionProvider,
    S: RecordSink,
    P::Error: Display,
    S::Error: Display,
{
    /// Create a new workflow
    ///
    /// The configuration is fixed for the lifetime of the workflow.
    pub fn new(provider: P, sink: S, config: CaptureConfig) -> Self {
        Self {
            provider,
            sink,
            config,
        }
    }

    /// Configuration the workflow was built with
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Extraction provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Record sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Capture one entry from free text
    ///
    /// Returns `Ok(None)` for blank input without touching the network.
    pub async fn capture(&self, prompt: &str) -> Result<Option<Capture>, CaptureError> {
        self.capture_with(prompt, |_| {}).await
    }

    /// Capture one entry, reporting `Extracting` and `Persisting` as they start
    ///
    /// Terminal statuses are left to the caller, which knows how it wants
    /// to present the result.
    pub async fn capture_with<F>(
        &self,
        prompt: &str,
        on_status: F,
    ) -> Result<Option<Capture>, CaptureError>
    where
        F: FnMut(&WorkflowStatus),
    {
        if prompt.trim().is_empty() {
            debug!("Ignoring blank submission");
            return Ok(None);
        }

        // Fail before any network call if the provider cannot be used
        self.config.api_key()?;

        let id = SubmissionId::new();
        let span = info_span!("submission", id = %id);
        self.run(id, prompt, on_status).instrument(span).await.map(Some)
    }

    async fn run<F>(
        &self,
        id: SubmissionId,
        prompt: &str,
        mut on_status: F,
    ) -> Result<Capture, CaptureError>
    where
        F: FnMut(&WorkflowStatus),
    {
        on_status(&WorkflowStatus::Extracting);
        info!("Extracting inventory data from {} char prompt", prompt.len());

        let instruction = PromptBuilder::new(prompt).build();
        let completion = self
            .provider
            .complete(&instruction)
            .await
            .map_err(|e| {
                warn!("Extraction provider failed: {}", e);
                CaptureError::Extraction(e.to_string())
            })?
            .ok_or_else(|| {
                warn!("Extraction provider returned no candidate");
                CaptureError::EmptyResponse
            })?;

        debug!("Completion length: {} chars", completion.len());

        let record = parse_completion(&completion).inspect_err(|e| warn!("{}", e))?;
        info!("Extracted {}", record);

        on_status(&WorkflowStatus::Persisting);
        let delivery = self.sink.submit(&record).await.map_err(|e| {
            warn!("Dispatch to sheet failed: {}", e);
            CaptureError::Dispatch(e.to_string())
        })?;

        info!("Record {}", delivery.as_str());

        Ok(Capture {
            id,
            record,
            delivery,
            raw_completion: completion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocktake_llm::MockProvider;
    use stocktake_sheet::RecordingSink;

    fn configured() -> CaptureConfig {
        let mut config = CaptureConfig::default();
        config.provider.api_key = Some("test-key".to_string());
        config
    }

    #[tokio::test]
    async fn test_blank_prompt_is_noop() {
        let workflow = CaptureWorkflow::new(MockProvider::default(), RecordingSink::new(), configured());

        assert_eq!(workflow.capture("").await, Ok(None));
        assert_eq!(workflow.capture("   \n").await, Ok(None));
        assert_eq!(workflow.provider().call_count(), 0);
        assert_eq!(workflow.sink().call_count(), 0);
    }

    #[tokio::test]
    async fn test_statuses_reported_in_order() {
        let provider = MockProvider::new(
            r#"{"itemName":"hammers","category":"tools","quantity":5,"location":"garage"}"#,
        );
        let workflow = CaptureWorkflow::new(provider, RecordingSink::new(), configured());

        let mut seen = Vec::new();
        workflow
            .capture_with("5 hammers in the garage", |s| seen.push(s.clone()))
            .await
            .unwrap();

        assert_eq!(seen, vec![WorkflowStatus::Extracting, WorkflowStatus::Persisting]);
    }

    #[tokio::test]
    async fn test_statuses_stop_at_extracting_on_failure() {
        let workflow = CaptureWorkflow::new(MockProvider::new("nope"), RecordingSink::new(), configured());

        let mut seen = Vec::new();
        let result = workflow.capture_with("anything", |s| seen.push(s.clone())).await;

        assert!(result.is_err());
        assert_eq!(seen, vec![WorkflowStatus::Extracting]);
    }
}
