//! Workflow engine endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, JsonRejection};
use crate::domain::ExecutionResult;

pub const SERVICE_NAME: &str = "workflow-engine";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub service: String,
}

pub fn create_workflow_engine_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(service_health))
        .route("/execute", post(execute_workflow))
}

pub async fn service_health() -> Json<ServiceHealth> {
    Json(ServiceHealth {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// Execute an inline workflow definition.
///
/// The credential check comes before body parsing. Step failures are reported
/// in the 200 envelope, not as HTTP errors.
pub async fn execute_workflow(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ExecutionResult>, ApiError> {
    if let Err(e) = state.execution_service.ensure_configured() {
        error!(error = %e, "Workflow execution refused");
        return Err(e.into());
    }

    let Json(body) = payload?;

    let result = state.execution_service.execute_json(&body).await?;

    Ok(Json(result))
}
