//! The uniform response envelope.
//!
//! Every enveloped call resolves to an [`ApiResponse`]. Success and failure
//! are separate variants, so `data`-without-`error` and `error`-without-`data`
//! hold by construction rather than by convention. Callers branch on the
//! variant instead of catching exceptions; nothing above the client ever sees
//! a raw transport fault.

use crate::error::ApiError;
use serde_json::Value;

/// Outcome of one API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    /// The server answered with a success status and a decodable payload.
    Success {
        data: T,
        status: u16,
        message: String,
    },
    /// Everything else, already classified.
    Failure {
        error: ApiError,
        status: u16,
        message: String,
        /// Raw failing body, when the server sent one. Some consumers read
        /// partial payloads off error responses; kept until proven unused.
        data: Option<Value>,
        /// Set when this failure caused the stored credential to be cleared.
        /// The auth layer observes this instead of re-checking the store.
        session_invalidated: bool,
    },
}

impl<T> ApiResponse<T> {
    /// Success envelope.
    pub fn success(data: T, status: u16, message: impl Into<String>) -> Self {
        ApiResponse::Success {
            data,
            status,
            message: message.into(),
        }
    }

    /// Failure envelope; status and message are taken from the error.
    pub fn failure(error: ApiError) -> Self {
        Self::failure_with_body(error, None)
    }

    /// Failure envelope that keeps the raw failing body.
    pub fn failure_with_body(error: ApiError, body: Option<Value>) -> Self {
        ApiResponse::Failure {
            status: error.status,
            message: error.message.clone(),
            data: body,
            session_invalidated: false,
            error,
        }
    }

    /// Marks this failure as having invalidated the session. No-op on success.
    pub(crate) fn with_session_invalidated(mut self, invalidated: bool) -> Self {
        if let ApiResponse::Failure {
            session_invalidated,
            ..
        } = &mut self
        {
            *session_invalidated = invalidated;
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }

    /// HTTP status; `0` for pure network failures, `408` for timeouts.
    pub fn status(&self) -> u16 {
        match self {
            ApiResponse::Success { status, .. } | ApiResponse::Failure { status, .. } => *status,
        }
    }

    /// Human-readable summary: the server's message, `"Success"`, or the
    /// classified error message.
    pub fn message(&self) -> &str {
        match self {
            ApiResponse::Success { message, .. } | ApiResponse::Failure { message, .. } => message,
        }
    }

    /// Typed payload, present only on success.
    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResponse::Success { data, .. } => Some(data),
            ApiResponse::Failure { .. } => None,
        }
    }

    /// Consumes the envelope, yielding the payload on success.
    pub fn into_data(self) -> Option<T> {
        match self {
            ApiResponse::Success { data, .. } => Some(data),
            ApiResponse::Failure { .. } => None,
        }
    }

    /// Classified error, present only on failure.
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            ApiResponse::Success { .. } => None,
            ApiResponse::Failure { error, .. } => Some(error),
        }
    }

    /// Converts into a `Result` for callers that prefer `?`-style flow.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            ApiResponse::Success { data, .. } => Ok(data),
            ApiResponse::Failure { error, .. } => Err(error),
        }
    }

    /// Whether this call cleared the stored credential (401 path).
    pub fn session_invalidated(&self) -> bool {
        match self {
            ApiResponse::Success { .. } => false,
            ApiResponse::Failure {
                session_invalidated,
                ..
            } => *session_invalidated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_code::ErrorCode;

    #[test]
    fn success_and_error_are_mutually_exclusive() {
        let ok: ApiResponse<u32> = ApiResponse::success(7, 200, "Success");
        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&7));
        assert!(ok.error().is_none());
        assert!(!ok.session_invalidated());

        let err: ApiResponse<u32> =
            ApiResponse::failure(ApiError::new(ErrorCode::NotFound, 404, "missing"));
        assert!(!err.is_success());
        assert!(err.data().is_none());
        assert_eq!(err.error().map(|e| e.code), Some(ErrorCode::NotFound));
    }

    #[test]
    fn failure_copies_status_and_message_from_error() {
        let resp: ApiResponse<()> =
            ApiResponse::failure(ApiError::new(ErrorCode::ServerError, 500, "boom"));
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.message(), "boom");
    }

    #[test]
    fn into_result_maps_variants() {
        let ok: ApiResponse<&str> = ApiResponse::success("payload", 200, "Success");
        assert_eq!(ok.into_result().unwrap(), "payload");

        let err: ApiResponse<&str> =
            ApiResponse::failure(ApiError::new(ErrorCode::Forbidden, 403, "nope"));
        assert_eq!(err.into_result().unwrap_err().code, ErrorCode::Forbidden);
    }

    #[test]
    fn session_flag_only_applies_to_failures() {
        let ok: ApiResponse<u8> = ApiResponse::success(1, 200, "Success");
        assert!(!ok.with_session_invalidated(true).session_invalidated());

        let err: ApiResponse<u8> =
            ApiResponse::failure(ApiError::new(ErrorCode::Unauthorized, 401, "expired"));
        assert!(err.with_session_invalidated(true).session_invalidated());
    }
}
