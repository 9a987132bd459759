//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::observability::PrometheusMetrics;
use crate::infrastructure::services::ExecutionService;

/// Shared by every handler; cloning is cheap
#[derive(Clone)]
pub struct AppState {
    pub execution_service: Arc<ExecutionService>,
    pub metrics: Option<PrometheusMetrics>,
    pub metrics_path: String,
}

impl AppState {
    pub fn new(execution_service: ExecutionService) -> Self {
        Self {
            execution_service: Arc::new(execution_service),
            metrics: None,
            metrics_path: "/metrics".to_string(),
        }
    }

    /// Serve `metrics` at `path`
    pub fn with_metrics(mut self, metrics: PrometheusMetrics, path: impl Into<String>) -> Self {
        self.metrics = Some(metrics);
        self.metrics_path = path.into();
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("metrics_enabled", &self.metrics.is_some())
            .field("metrics_path", &self.metrics_path)
            .finish_non_exhaustive()
    }
}
