//! Workflow definition entities

use serde::{Deserialize, Serialize};

use super::step_types::{PromptStep, StepAction};

/// A step within a workflow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowStep {
    /// Identifier used for trace correlation
    id: String,

    /// Name under which the step result is stored
    output_key: String,

    /// The step type and configuration
    #[serde(flatten)]
    action: StepAction,
}

impl WorkflowStep {
    pub fn new(id: impl Into<String>, output_key: impl Into<String>, action: StepAction) -> Self {
        Self {
            id: id.into(),
            output_key: output_key.into(),
            action,
        }
    }

    /// Shorthand for a prompt step with no overrides
    pub fn prompt(
        id: impl Into<String>,
        template: impl Into<String>,
        output_key: impl Into<String>,
    ) -> Self {
        Self::new(id, output_key, StepAction::Prompt(PromptStep::new(template)))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn output_key(&self) -> &str {
        &self.output_key
    }

    pub fn action(&self) -> &StepAction {
        &self.action
    }
}

/// An ordered list of steps plus an id echoed back in the result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowDefinition {
    id: String,
    steps: Vec<WorkflowStep>,
}

impl WorkflowDefinition {
    pub fn new(id: impl Into<String>, steps: Vec<WorkflowStep>) -> Self {
        Self {
            id: id.into(),
            steps,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Output keys written by more than one step, in first-seen order
    pub fn duplicate_output_keys(&self) -> Vec<&str> {
        let mut duplicates: Vec<&str> = Vec::new();

        for (index, step) in self.steps.iter().enumerate() {
            let key = step.output_key();
            let seen_before = self.steps[..index].iter().any(|s| s.output_key() == key);

            if seen_before && !duplicates.contains(&key) {
                duplicates.push(key);
            }
        }

        duplicates
    }
}
