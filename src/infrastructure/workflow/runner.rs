//! Sequential, fail-fast workflow runner

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::step_executor::StepExecutor;
use crate::domain::{
    CompletionClient, ExecutionContext, RunReport, RunState, WorkflowDefinition, WorkflowExecutor,
};
use crate::infrastructure::observability::record_workflow_run;

/// Runs steps strictly in definition order and stops at the first failure.
///
/// Every run owns a fresh context; nothing is shared between runs.
#[derive(Clone)]
pub struct WorkflowRunner {
    steps: StepExecutor,
}

impl WorkflowRunner {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            steps: StepExecutor::new(client),
        }
    }
}

#[async_trait]
impl WorkflowExecutor for WorkflowRunner {
    async fn execute(
        &self,
        workflow: &WorkflowDefinition,
        inputs: IndexMap<String, String>,
    ) -> RunReport {
        let start = Instant::now();
        let mut report = RunReport::pending();
        let mut context = ExecutionContext::new(inputs);

        debug!(
            workflow_id = workflow.id(),
            steps = workflow.len(),
            inputs = context.len(),
            state = ?report.state,
            "Workflow run created"
        );

        report.state = RunState::Running;

        for (index, step) in workflow.steps().iter().enumerate() {
            debug!(
                workflow_id = workflow.id(),
                step_id = step.id(),
                step_type = step.action().type_name(),
                index,
                "Executing step"
            );

            let outcome = self.steps.execute(step, &mut context).await;
            report.trace.push(outcome.trace);

            match outcome.output {
                Some(output) => {
                    report.outputs.insert(step.output_key().to_string(), output);
                }
                None => {
                    report.state = RunState::Failed;
                    warn!(
                        workflow_id = workflow.id(),
                        step_id = step.id(),
                        index,
                        skipped = workflow.len() - index - 1,
                        "Workflow stopped at failed step"
                    );
                    break;
                }
            }
        }

        if report.state == RunState::Running {
            report.state = RunState::Completed;
        }

        let elapsed = start.elapsed();
        record_workflow_run(report.state, report.trace.len(), elapsed);

        info!(
            workflow_id = workflow.id(),
            state = ?report.state,
            steps_executed = report.trace.len(),
            steps_total = workflow.len(),
            duration_ms = elapsed.as_millis() as u64,
            "Workflow run finished"
        );

        report
    }
}
