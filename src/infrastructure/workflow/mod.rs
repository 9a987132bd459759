//! Workflow execution

mod runner;
mod step_executor;

pub use runner::WorkflowRunner;
pub use step_executor::{StepExecutor, StepOutcome};
