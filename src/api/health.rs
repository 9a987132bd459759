//! Health and liveness endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub checks: Vec<HealthCheck>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Reports degraded, still with 200, when no provider credential is configured
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let provider = if state.execution_service.is_configured() {
        HealthCheck {
            name: "completion_provider".to_string(),
            status: HealthStatus::Healthy,
            message: None,
        }
    } else {
        HealthCheck {
            name: "completion_provider".to_string(),
            status: HealthStatus::Degraded,
            message: Some("credential not configured".to_string()),
        }
    };

    let response = HealthResponse {
        status: provider.status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: vec![provider],
    };

    (StatusCode::OK, Json(response))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
