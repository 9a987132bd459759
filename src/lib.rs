//! Prompt workflow engine
//!
//! Runs inline workflow definitions, ordered lists of templated prompts, against
//! an LLM provider. Each step renders its `{{variable}}` template from the
//! caller inputs plus earlier step outputs, and the run stops at the first
//! failed step. Results come back with a per-step trace.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::router::validate_metrics_path;
use api::state::AppState;
use infrastructure::llm::LlmProviderFactory;
use infrastructure::observability::init_metrics;
use infrastructure::services::ExecutionService;
use tracing::info;

/// Build application state from configuration.
///
/// A missing credential is not an error here; the service starts and refuses
/// executions instead. An unusable metrics path is.
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    if config.metrics.enabled {
        validate_metrics_path(&config.metrics.path)?;
    }

    let client = LlmProviderFactory::create_completion_client(&config.provider)?;

    info!(
        provider_configured = client.is_some(),
        model = %config.provider.model,
        base_url = %config.provider.base_url,
        timeout_secs = config.provider.timeout_secs,
        "Completion provider resolved"
    );

    let mut state = AppState::new(ExecutionService::from_client(client));

    if let Some(metrics) = init_metrics(&config.metrics) {
        state = state.with_metrics(metrics, config.metrics.path.as_str());
    }

    Ok(state)
}
