//! Workflow executor trait and result types

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::entity::WorkflowDefinition;

/// Outcome of a single step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// Trace record of one attempted step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepTrace {
    pub step_id: String,
    pub status: StepStatus,
    pub output_key: String,
    /// Wall-clock duration of this step alone
    pub latency_ms: u64,
    /// Null on success
    pub error: Option<String>,
}

impl StepTrace {
    pub fn success(step_id: impl Into<String>, output_key: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            step_id: step_id.into(),
            status: StepStatus::Success,
            output_key: output_key.into(),
            latency_ms,
            error: None,
        }
    }

    pub fn failure(
        step_id: impl Into<String>,
        output_key: impl Into<String>,
        error: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            status: StepStatus::Failed,
            output_key: output_key.into(),
            latency_ms,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// Lifecycle of one run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Pending,
    Running,
    Completed,
    Failed,
}

/// What a run produced, before the gateway adds timing and the workflow id
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub state: RunState,
    /// Results of successful steps, in step order
    pub outputs: IndexMap<String, String>,
    /// One entry per attempted step
    pub trace: Vec<StepTrace>,
}

impl RunReport {
    pub fn pending() -> Self {
        Self {
            state: RunState::Pending,
            outputs: IndexMap::new(),
            trace: Vec::new(),
        }
    }

    /// True only if every one of `step_count` steps left a successful trace entry
    pub fn all_succeeded(&self, step_count: usize) -> bool {
        self.trace.len() == step_count && self.trace.iter().all(StepTrace::is_success)
    }
}

/// Response envelope of one execution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionResult {
    pub success: bool,
    pub workflow_id: String,
    pub outputs: IndexMap<String, String>,
    pub trace: Vec<StepTrace>,
    pub total_latency_ms: u64,
}

impl ExecutionResult {
    pub fn from_report(workflow: &WorkflowDefinition, report: RunReport, total_latency_ms: u64) -> Self {
        Self {
            success: report.all_succeeded(workflow.len()),
            workflow_id: workflow.id().to_string(),
            outputs: report.outputs,
            trace: report.trace,
            total_latency_ms,
        }
    }

    /// The first failed trace entry, if any
    pub fn failed_step(&self) -> Option<&StepTrace> {
        self.trace.iter().find(|t| !t.is_success())
    }
}

/// Trait for workflow execution
#[async_trait]
pub trait WorkflowExecutor: Send + Sync {
    /// Run every step of `workflow` in order against a fresh context seeded with `inputs`
    async fn execute(&self, workflow: &WorkflowDefinition, inputs: IndexMap<String, String>) -> RunReport;
}
