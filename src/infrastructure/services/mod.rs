//! Application services

mod execution_service;

pub use execution_service::{ExecutionService, API_KEY_NOT_CONFIGURED};
