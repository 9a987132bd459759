//! Template interpolation
//!
//! Placeholders have the form `{{name}}` where `name` is one or more ASCII
//! letters, digits or underscores. There is no escape syntax: any text that
//! matches the pattern is a placeholder.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

/// Regex to match placeholders: {{name}}
static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").unwrap());

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error(
        "Template references unknown variable: \"{{{{{name}}}}}\". Available keys: {}",
        .available.join(", ")
    )]
    MissingVariable {
        name: String,
        available: Vec<String>,
    },
}

/// Render `template` against `context` in a single pass.
///
/// Substituted values are inserted verbatim and never re-scanned. If any
/// placeholder is absent from `context` the whole call fails and nothing is
/// substituted.
pub fn render(template: &str, context: &IndexMap<String, String>) -> Result<String, TemplateError> {
    let missing = placeholders(template)
        .into_iter()
        .find(|name| !context.contains_key(*name));

    if let Some(name) = missing {
        return Err(TemplateError::MissingVariable {
            name: name.to_string(),
            available: context.keys().cloned().collect(),
        });
    }

    let rendered = PLACEHOLDER_PATTERN.replace_all(template, |caps: &Captures<'_>| {
        context.get(&caps[1]).cloned().unwrap_or_default()
    });

    Ok(rendered.into_owned())
}

/// Placeholder names in order of appearance, duplicates included
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER_PATTERN
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}
