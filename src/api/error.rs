//! API error taxonomy.
//!
//! Errors are decided once here, at the HTTP boundary, and consumed
//! uniformly afterwards: the retry loop asks `is_retryable`, the 401 path
//! asks `is_session_timeout`, callers display `Display`.

use serde::Deserialize;
use thiserror::Error;

use crate::config::RetryConfig;

/// Structured error code the backend uses for expired sessions.
pub const SESSION_TIMEOUT_CODE: &str = "SESSION_TIMEOUT";

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Structured error body (`{"errorCode": ..., "message": ...}`) the backend
/// attaches to failures when it can.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, rename = "errorCode")]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {}", message.as_deref().unwrap_or("token may be expired"))]
    Unauthorized {
        /// Backend error code, notably `SESSION_TIMEOUT`.
        code: Option<String>,
        message: Option<String>,
    },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|b| b.message.clone())
            .unwrap_or_else(|| Self::truncate_body(body));

        match status.as_u16() {
            401 => ApiError::Unauthorized {
                code: parsed.and_then(|b| b.error_code),
                message: (!message.is_empty()).then_some(message),
            },
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            s @ 500..=599 => ApiError::ServerError { status: s, message },
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    /// Whether the backend flagged this as an expired session rather than a
    /// generic auth failure.
    pub fn is_session_timeout(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { code: Some(c), .. } if c == SESSION_TIMEOUT_CODE
        )
    }

    /// Classify for the retry loop. Transient transport failures, 5xx and
    /// 429 are retryable; 401 only when the policy explicitly opts in.
    pub fn is_retryable(&self, retry: &RetryConfig) -> bool {
        match self {
            ApiError::RateLimited | ApiError::ServerError { .. } => true,
            // Send-level failures (refused connection, timeout) are worth a
            // retry; builder and decode errors are ours and are not.
            ApiError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ApiError::Unauthorized { .. } => retry.retry_unauthorized,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_parses_structured_body() {
        let err = ApiError::from_status(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"errorCode":"SESSION_TIMEOUT","message":"session expired"}"#,
        );
        match &err {
            ApiError::Unauthorized { code, message } => {
                assert_eq!(code.as_deref(), Some(SESSION_TIMEOUT_CODE));
                assert_eq!(message.as_deref(), Some("session expired"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_session_timeout());
    }

    #[test]
    fn test_plain_401_is_not_session_timeout() {
        let err = ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED, "");
        assert!(!err.is_session_timeout());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::SERVICE_UNAVAILABLE, "down"),
            ApiError::ServerError { status: 503, .. }
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::BAD_REQUEST, "bad"),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_retry_classification() {
        let policy = RetryConfig::default();
        assert!(ApiError::RateLimited.is_retryable(&policy));
        assert!(ApiError::ServerError {
            status: 503,
            message: String::new()
        }
        .is_retryable(&policy));
        assert!(!ApiError::NotFound(String::new()).is_retryable(&policy));
        assert!(!ApiError::InvalidResponse(String::new()).is_retryable(&policy));

        let unauthorized = ApiError::Unauthorized {
            code: None,
            message: None,
        };
        assert!(!unauthorized.is_retryable(&policy));

        let permissive = RetryConfig {
            retry_unauthorized: true,
            ..Default::default()
        };
        assert!(unauthorized.is_retryable(&permissive));
    }

    #[test]
    fn test_long_body_truncated() {
        let body = "x".repeat(2000);
        match ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body) {
            ApiError::ServerError { message, .. } => {
                assert!(message.len() < 600);
                assert!(message.contains("truncated"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
