//! Execution request decoding and validation

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::entity::{WorkflowDefinition, WorkflowStep};
use crate::domain::DomainError;

pub const WORKFLOW_REQUIRED: &str = "workflow.id and non-empty workflow.steps are required";

pub const INPUTS_MUST_BE_OBJECT: &str = "inputs must be an object";

/// A validated request to run a workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRequest {
    pub workflow: WorkflowDefinition,
    pub inputs: IndexMap<String, String>,
}

impl ExecutionRequest {
    pub fn new(workflow: WorkflowDefinition, inputs: IndexMap<String, String>) -> Self {
        Self { workflow, inputs }
    }

    /// Decode and validate a raw JSON body.
    ///
    /// Shape problems are reported with a fixed client-facing message; a step
    /// that does not decode reports its index and the decoder message.
    pub fn from_json(body: &Value) -> Result<Self, DomainError> {
        let workflow = body.get("workflow");

        let id = workflow
            .and_then(|w| w.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DomainError::validation(WORKFLOW_REQUIRED))?;

        let raw_steps = workflow
            .and_then(|w| w.get("steps"))
            .and_then(Value::as_array)
            .filter(|steps| !steps.is_empty())
            .ok_or_else(|| DomainError::validation(WORKFLOW_REQUIRED))?;

        let inputs = parse_inputs(body.get("inputs"))?;

        let steps = raw_steps
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                WorkflowStep::deserialize(raw).map_err(|e| {
                    DomainError::validation(format!("invalid step at index {}: {}", index, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(WorkflowDefinition::new(id, steps), inputs))
    }
}

fn parse_inputs(raw: Option<&Value>) -> Result<IndexMap<String, String>, DomainError> {
    let object = raw
        .and_then(Value::as_object)
        .ok_or_else(|| DomainError::validation(INPUTS_MUST_BE_OBJECT))?;

    object
        .iter()
        .map(|(name, value)| match value {
            Value::String(s) => Ok((name.clone(), s.clone())),
            _ => Err(DomainError::validation(format!(
                "input '{}' must be a string",
                name
            ))),
        })
        .collect()
}
