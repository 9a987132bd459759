//! JSON extractor whose rejections render as API errors

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;

pub const INVALID_JSON_BODY: &str = "Invalid JSON body";

/// Wrapper around `axum::Json`.
///
/// The body is decoded whatever the `Content-Type` says, so browser clients
/// posting `text/plain` need no preflight. Any failure to read or decode the
/// body becomes a 400 with a fixed message; the detail only goes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection produced by [`Json`]
#[derive(Debug)]
pub struct JsonRejection {
    detail: String,
}

impl JsonRejection {
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<JsonRejection> for ApiError {
    fn from(_: JsonRejection) -> Self {
        ApiError::bad_request(INVALID_JSON_BODY)
    }
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            let detail = rejection.body_text();
            debug!(status = rejection.status().as_u16(), detail = %detail, "Unreadable request body");
            JsonRejection { detail }
        })?;

        serde_json::from_slice(&bytes).map(Json).map_err(|e| {
            let detail = e.to_string();
            debug!(detail = %detail, "Rejected JSON body");
            JsonRejection { detail }
        })
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
