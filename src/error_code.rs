//! Closed error taxonomy for the API client.
//!
//! Every failed call resolves to exactly one of these codes. The set is
//! closed: the classifier (see [`crate::classify`]) maps every transport
//! outcome to one code, with [`ErrorCode::Unknown`] as the only catch-all.
//!
//! ## Codes
//!
//! | Code             | Status | Source                               |
//! |------------------|--------|--------------------------------------|
//! | TIMEOUT          | 408    | transport-level timeout, or HTTP 408 |
//! | NETWORK_ERROR    | 0      | no response received at all          |
//! | VALIDATION_ERROR | 400    | HTTP 400                             |
//! | UNAUTHORIZED     | 401    | HTTP 401 (invalidates the session)   |
//! | FORBIDDEN        | 403    | HTTP 403                             |
//! | NOT_FOUND        | 404    | HTTP 404                             |
//! | SERVER_ERROR     | 500    | HTTP 500                             |
//! | UNKNOWN          | any    | every other status                   |
//!
//! ## Example
//!
//! ```rust
//! use lumora_client::error_code::ErrorCode;
//!
//! let code = ErrorCode::from_http_status(404);
//! assert_eq!(code, ErrorCode::NotFound);
//! assert_eq!(code.name(), "NOT_FOUND");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code attached to every [`crate::ApiError`].
///
/// Serialized in wire form (`"VALIDATION_ERROR"` etc.) so envelope consumers
/// see the same strings the backend contract names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The transport gave up waiting, or the server answered HTTP 408.
    Timeout,
    /// No response was received at all (DNS failure, refused connection, dropped link).
    NetworkError,
    /// HTTP 400: the server rejected the request payload.
    ValidationError,
    /// HTTP 401: missing, expired, or revoked credential.
    Unauthorized,
    /// HTTP 403: authenticated but not allowed.
    Forbidden,
    /// HTTP 404: the resource does not exist.
    NotFound,
    /// HTTP 500: the server failed internally.
    ServerError,
    /// Any status outside the mapped set; the raw body travels in `details`.
    Unknown,
}

impl ErrorCode {
    /// Returns the wire name (e.g. `"NETWORK_ERROR"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Timeout => "TIMEOUT",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::ServerError => "SERVER_ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns the fixed fallback message for this code.
    ///
    /// Codes whose table row allows a server-supplied message
    /// (`ValidationError`, `Forbidden`, `Unknown`) only fall back to this
    /// text when the response body carries no `message` field.
    #[inline]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Timeout => "Request timed out. Please try again.",
            Self::NetworkError => "Network error. Please check your connection.",
            Self::ValidationError => "The request was invalid.",
            Self::Unauthorized => "Your session has expired. Please log in again.",
            Self::Forbidden => "You do not have permission to perform this action.",
            Self::NotFound => "The requested resource was not found.",
            Self::ServerError => "Something went wrong on our end. Please try again later.",
            Self::Unknown => "An unexpected error occurred.",
        }
    }

    /// Maps an HTTP status code to its `ErrorCode`.
    ///
    /// Only the statuses the backend contract names are mapped; everything
    /// else is `Unknown` and keeps its original status on the error value.
    /// An HTTP 408 answered by the server classifies the same as a
    /// transport-level timeout.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::ValidationError,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            408 => Self::Timeout,
            500 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_contract_rows() {
        assert_eq!(ErrorCode::from_http_status(400), ErrorCode::ValidationError);
        assert_eq!(ErrorCode::from_http_status(401), ErrorCode::Unauthorized);
        assert_eq!(ErrorCode::from_http_status(403), ErrorCode::Forbidden);
        assert_eq!(ErrorCode::from_http_status(404), ErrorCode::NotFound);
        assert_eq!(ErrorCode::from_http_status(408), ErrorCode::Timeout);
        assert_eq!(ErrorCode::from_http_status(500), ErrorCode::ServerError);
    }

    #[test]
    fn unmapped_statuses_are_unknown() {
        for status in [402, 409, 418, 429, 502, 503, 504] {
            assert_eq!(
                ErrorCode::from_http_status(status),
                ErrorCode::Unknown,
                "status {} should be UNKNOWN",
                status
            );
        }
    }

    #[test]
    fn wire_names_round_trip_through_serde() {
        let json = serde_json::to_string(&ErrorCode::ValidationError).unwrap();
        assert_eq!(json, "\"VALIDATION_ERROR\"");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::ValidationError);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(ErrorCode::NetworkError.to_string(), "NETWORK_ERROR");
    }
}
