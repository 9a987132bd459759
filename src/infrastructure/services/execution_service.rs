//! Execution gateway - validates requests and runs workflows

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{
    CompletionClient, DomainError, ExecutionRequest, ExecutionResult, WorkflowExecutor,
};
use crate::infrastructure::workflow::WorkflowRunner;

pub const API_KEY_NOT_CONFIGURED: &str = "ANTHROPIC_API_KEY not configured";

/// Request boundary of the engine.
///
/// Holds no executor when the provider credential is missing; every execution
/// then fails with a configuration error before any validation or step runs.
#[derive(Clone)]
pub struct ExecutionService {
    executor: Option<Arc<dyn WorkflowExecutor>>,
}

impl ExecutionService {
    pub fn new(executor: Arc<dyn WorkflowExecutor>) -> Self {
        Self {
            executor: Some(executor),
        }
    }

    /// A service that refuses to execute anything
    pub fn unconfigured() -> Self {
        Self { executor: None }
    }

    /// Runner over `client`, or unconfigured when there is none
    pub fn from_client(client: Option<Arc<dyn CompletionClient>>) -> Self {
        match client {
            Some(client) => Self::new(Arc::new(WorkflowRunner::new(client))),
            None => Self::unconfigured(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.executor.is_some()
    }

    /// Fail fast when the provider credential is absent
    pub fn ensure_configured(&self) -> Result<&Arc<dyn WorkflowExecutor>, DomainError> {
        self.executor
            .as_ref()
            .ok_or_else(|| DomainError::configuration(API_KEY_NOT_CONFIGURED))
    }

    /// Validate a raw JSON body and execute it
    pub async fn execute_json(&self, body: &Value) -> Result<ExecutionResult, DomainError> {
        self.ensure_configured()?;
        let request = ExecutionRequest::from_json(body)?;
        self.execute(request).await
    }

    pub async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionResult, DomainError> {
        let executor = self.ensure_configured()?;
        let ExecutionRequest { workflow, inputs } = request;

        let duplicates = workflow.duplicate_output_keys();
        if !duplicates.is_empty() {
            warn!(
                workflow_id = workflow.id(),
                keys = ?duplicates,
                "Duplicate output keys, later steps overwrite earlier results"
            );
        }

        info!(
            workflow_id = workflow.id(),
            steps = workflow.len(),
            inputs = inputs.len(),
            "Executing workflow"
        );

        let start = Instant::now();
        let report = executor.execute(&workflow, inputs).await;
        let total_latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let result = ExecutionResult::from_report(&workflow, report, total_latency_ms);

        if let Some(failed) = result.failed_step() {
            warn!(
                workflow_id = %result.workflow_id,
                step_id = %failed.step_id,
                error = failed.error.as_deref().unwrap_or_default(),
                total_latency_ms,
                "Workflow failed"
            );
        } else {
            info!(
                workflow_id = %result.workflow_id,
                success = result.success,
                total_latency_ms,
                "Workflow executed"
            );
        }

        Ok(result)
    }
}
