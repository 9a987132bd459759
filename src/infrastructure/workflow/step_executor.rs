//! Single-step execution

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::domain::{
    CompletionClient, ExecutionContext, PromptStep, StepAction, StepError, StepStatus, StepTrace,
    WorkflowStep,
};
use crate::infrastructure::observability::record_step;

/// What one step left behind
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub trace: StepTrace,
    /// Present only when the step succeeded
    pub output: Option<String>,
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        self.output.is_some()
    }
}

/// Runs one step against the shared context.
///
/// On success the result is written to the context under the step's output key.
/// On failure the context is left untouched.
#[derive(Clone)]
pub struct StepExecutor {
    client: Arc<dyn CompletionClient>,
}

impl StepExecutor {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, step: &WorkflowStep, context: &mut ExecutionContext) -> StepOutcome {
        let start = Instant::now();
        let result = self.run_action(step.action(), context).await;
        let elapsed = start.elapsed();
        let latency_ms = millis(elapsed);

        match result {
            Ok(output) => {
                debug!(
                    step_id = step.id(),
                    output_key = step.output_key(),
                    latency_ms,
                    output_chars = output.len(),
                    "Step succeeded"
                );
                record_step(step.action().type_name(), StepStatus::Success, elapsed);

                context.insert(step.output_key(), output.clone());

                StepOutcome {
                    trace: StepTrace::success(step.id(), step.output_key(), latency_ms),
                    output: Some(output),
                }
            }
            Err(e) => {
                warn!(
                    step_id = step.id(),
                    output_key = step.output_key(),
                    latency_ms,
                    kind = e.kind(),
                    error = %e,
                    "Step failed"
                );
                record_step(step.action().type_name(), StepStatus::Failed, elapsed);

                StepOutcome {
                    trace: StepTrace::failure(step.id(), step.output_key(), e.to_string(), latency_ms),
                    output: None,
                }
            }
        }
    }

    async fn run_action(
        &self,
        action: &StepAction,
        context: &ExecutionContext,
    ) -> Result<String, StepError> {
        match action {
            StepAction::Prompt(prompt_step) => self.execute_prompt(prompt_step, context).await,
        }
    }

    async fn execute_prompt(
        &self,
        step: &PromptStep,
        context: &ExecutionContext,
    ) -> Result<String, StepError> {
        let prompt = context.render(&step.template)?;

        let output = self
            .client
            .complete(&prompt, &step.completion_options())
            .await?;

        Ok(output)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockCompletionClient;
    use crate::domain::{CompletionError, CompletionOptions};
    use indexmap::IndexMap;

    fn context_with(pairs: &[(&str, &str)]) -> ExecutionContext {
        let inputs: IndexMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ExecutionContext::new(inputs)
    }

    #[tokio::test]
    async fn test_success_writes_context() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|prompt, _| prompt == "Summarize: raw text")
            .times(1)
            .returning(|_, _| Ok("short".to_string()));

        let executor = StepExecutor::new(Arc::new(client));
        let step = WorkflowStep::prompt("s1", "Summarize: {{input}}", "summary");
        let mut context = context_with(&[("input", "raw text")]);

        let outcome = executor.execute(&step, &mut context).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.output.as_deref(), Some("short"));
        assert_eq!(outcome.trace.step_id, "s1");
        assert_eq!(outcome.trace.status, StepStatus::Success);
        assert!(outcome.trace.error.is_none());
        assert_eq!(context.get("summary"), Some("short"));
    }

    #[tokio::test]
    async fn test_step_overrides_are_forwarded() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|_, options: &CompletionOptions| {
                options.model.as_deref() == Some("claude-haiku")
                    && options.temperature == Some(0.2)
                    && options.max_tokens == Some(64)
            })
            .times(1)
            .returning(|_, _| Ok("ok".to_string()));

        let executor = StepExecutor::new(Arc::new(client));
        let step = WorkflowStep::new(
            "s1",
            "out",
            StepAction::Prompt(
                PromptStep::new("hello")
                    .with_model("claude-haiku")
                    .with_temperature(0.2)
                    .with_max_tokens(64),
            ),
        );

        let outcome = executor.execute(&step, &mut ExecutionContext::default()).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_template_failure_skips_completion() {
        let mut client = MockCompletionClient::new();
        client.expect_complete().never();

        let executor = StepExecutor::new(Arc::new(client));
        let step = WorkflowStep::prompt("s1", "{{missing_var}}", "out");
        let mut context = context_with(&[("input", "x")]);

        let outcome = executor.execute(&step, &mut context).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.trace.status, StepStatus::Failed);
        let error = outcome.trace.error.unwrap();
        assert!(error.contains("missing_var"));
        assert!(error.contains("Available keys: input"));
        assert!(!context.contains("out"));
    }

    #[tokio::test]
    async fn test_completion_failure_leaves_context_untouched() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .times(1)
            .returning(|_, _| Err(CompletionError::status("Anthropic", 529, "overloaded")));

        let executor = StepExecutor::new(Arc::new(client));
        let step = WorkflowStep::prompt("s2", "Improve: {{summary}}", "improvements");
        let mut context = context_with(&[("summary", "short")]);

        let outcome = executor.execute(&step, &mut context).await;

        assert!(outcome.output.is_none());
        assert_eq!(
            outcome.trace.error.as_deref(),
            Some("Anthropic API error: 529 - overloaded")
        );
        assert_eq!(context.len(), 1);
    }
}
