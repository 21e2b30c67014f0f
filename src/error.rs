//! Crate-level error type.
//!
//! Only configuration loading and input validation can fail outright.
//! Placement failures are never errors at this level: they are recorded
//! as [`UnscheduledComponent`](crate::models::UnscheduledComponent)s.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised while preparing a generation run.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read.
    #[error("file not found or could not be read: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or record JSON is malformed.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration values are inconsistent (e.g., overlapping slots).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input records failed validation.
    #[error("invalid input: {} problem(s), first: {}", .0.len(), first_message(.0))]
    InvalidInput(Vec<ValidationError>),
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("none")
}

/// Result alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, Error>;
