//! Per-run execution context

use indexmap::IndexMap;

use super::template::{self, TemplateError};

/// Variables visible to step templates during one run.
///
/// Seeded from the caller inputs and extended by each successful step. Values
/// are never removed; writing an existing key overwrites it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionContext {
    values: IndexMap<String, String>,
}

impl ExecutionContext {
    pub fn new(inputs: IndexMap<String, String>) -> Self {
        Self { values: inputs }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render a step template against the current values
    pub fn render(&self, template: &str) -> Result<String, TemplateError> {
        template::render(template, &self.values)
    }
}
