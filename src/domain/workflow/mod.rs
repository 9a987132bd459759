//! Workflow domain module
//!
//! A workflow is an ordered list of steps run one after another against a
//! shared context. Each step renders a template and stores the completion
//! under its `output_key`, where later steps can reference it.
//!
//! ## Variable References
//!
//! Templates reference context values with `{{name}}`, where `name` is made
//! of letters, digits and underscores. The context starts with the caller's
//! inputs and grows by one entry per successful step.

mod context;
mod entity;
mod error;
mod executor;
mod request;
mod step_types;
pub mod template;

pub use context::ExecutionContext;
pub use entity::{WorkflowDefinition, WorkflowStep};
pub use error::StepError;
pub use executor::{
    ExecutionResult, RunReport, RunState, StepStatus, StepTrace, WorkflowExecutor,
};
pub use request::{ExecutionRequest, INPUTS_MUST_BE_OBJECT, WORKFLOW_REQUIRED};
pub use step_types::{PromptStep, StepAction};
pub use template::TemplateError;
