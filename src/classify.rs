//! Pure classification of transport failures.
//!
//! The decision table, evaluated in order:
//!
//! 1. transport timeout          -> 408 `TIMEOUT`, fixed message
//! 2. no response at all         -> 0 `NETWORK_ERROR`, fixed message
//! 3. HTTP 400                   -> `VALIDATION_ERROR`, server message wins
//! 4. HTTP 401                   -> `UNAUTHORIZED`, fixed message
//! 5. HTTP 403                   -> `FORBIDDEN`, server message wins
//! 6. HTTP 404                   -> `NOT_FOUND`, fixed message
//! 7. HTTP 500                   -> `SERVER_ERROR`, fixed message
//! 8. anything else              -> that status, `UNKNOWN`, raw body in details
//!
//! [`classify`] is a pure function: no I/O, no side effects. The 401
//! session-invalidation side effect belongs to the orchestrator
//! ([`crate::ApiClient`]), which keeps classification testable in isolation.

use crate::error::ApiError;
use crate::error_code::ErrorCode;
use serde_json::Value;

/// A transport outcome that did not produce a usable success response.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// The configured timeout elapsed before a response arrived.
    Timeout,
    /// No response was received at all.
    NoResponse {
        /// Transport-level diagnostic, kept out of the user-facing message.
        detail: String,
    },
    /// The server answered with a non-success status.
    Status {
        status: u16,
        /// Parsed response body, if the server sent one.
        body: Option<Value>,
    },
}

impl TransportFailure {
    /// Folds a `reqwest` send error into the two non-HTTP rows.
    ///
    /// Timeout is checked first; every other sendless failure (DNS, refused
    /// connection, TLS, dropped link) is a pure network failure. Status
    /// failures never take this path; the client builds those from the
    /// response itself.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportFailure::Timeout
        } else {
            TransportFailure::NoResponse {
                detail: err.to_string(),
            }
        }
    }
}

/// Maps a transport failure to exactly one [`ApiError`].
pub fn classify(failure: &TransportFailure) -> ApiError {
    match failure {
        TransportFailure::Timeout => {
            let code = ErrorCode::Timeout;
            ApiError::new(code, 408, code.default_message())
        }
        TransportFailure::NoResponse { detail } => {
            let code = ErrorCode::NetworkError;
            ApiError::new(code, 0, code.default_message())
                .with_details(Value::String(detail.clone()))
        }
        TransportFailure::Status { status, body } => {
            let code = ErrorCode::from_http_status(*status);
            let message = match code {
                // Rows where the server's own wording is surfaced.
                ErrorCode::ValidationError | ErrorCode::Forbidden | ErrorCode::Unknown => {
                    server_message(body.as_ref())
                        .unwrap_or_else(|| code.default_message().to_string())
                }
                // Rows with fixed wording.
                _ => code.default_message().to_string(),
            };
            let error = ApiError::new(code, *status, message);
            match (code, body) {
                (ErrorCode::Unknown, Some(raw)) => error.with_details(raw.clone()),
                _ => error,
            }
        }
    }
}

/// Extracts the server-supplied `message` field, if the body has one.
fn server_message(body: Option<&Value>) -> Option<String> {
    body.and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timeout_row() {
        let err = classify(&TransportFailure::Timeout);
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(err.status, 408);
    }

    #[test]
    fn network_row_carries_detail() {
        let err = classify(&TransportFailure::NoResponse {
            detail: "connection refused".into(),
        });
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert_eq!(err.status, 0);
        assert_eq!(err.details, Some(json!("connection refused")));
    }

    #[test]
    fn validation_row_prefers_server_message() {
        let err = classify(&TransportFailure::Status {
            status: 400,
            body: Some(json!({"message": "Invalid phone"})),
        });
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Invalid phone");
    }

    #[test]
    fn unauthorized_row_ignores_server_message() {
        let err = classify(&TransportFailure::Status {
            status: 401,
            body: Some(json!({"message": "token expired at 12:01"})),
        });
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, ErrorCode::Unauthorized.default_message());
    }

    #[test]
    fn unknown_row_keeps_status_and_body() {
        let body = json!({"message": "teapot", "hint": 42});
        let err = classify(&TransportFailure::Status {
            status: 418,
            body: Some(body.clone()),
        });
        assert_eq!(err.code, ErrorCode::Unknown);
        assert_eq!(err.status, 418);
        assert_eq!(err.message, "teapot");
        assert_eq!(err.details, Some(body));
    }
}
