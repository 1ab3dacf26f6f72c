//! The single error value every failed call is normalized into.

use crate::error_code::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalized API error.
///
/// Constructed once per failed call by the classifier and never mutated
/// afterwards. `status` is the HTTP status, `0` for a pure network failure,
/// or `408` for a timeout. `details` carries the raw response body only when
/// the status fell outside the mapped set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{code}: {message} (status {status})")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create an error with the given code, status, and message.
    pub fn new(code: ErrorCode, status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            code,
            details: None,
        }
    }

    /// Attach the raw payload that produced this error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Error for faults that never reached the transport: credential store
    /// I/O, client construction, lock poisoning. Always `UNKNOWN`/`0`; the
    /// classifier's table only covers transport outcomes.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unknown, 0, message)
    }
}
