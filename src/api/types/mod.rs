//! Shared HTTP types

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse};
pub use json::{Json, JsonRejection, INVALID_JSON_BODY};
