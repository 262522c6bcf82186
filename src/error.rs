//! Error types for Poof API operations

use std::time::Duration;
use thiserror::Error;

/// Result type alias for Poof API operations
pub type Result<T> = std::result::Result<T, PoofError>;

/// All failures surfaced by the Poof client.
///
/// Transport-level failures (`Transport`, `Timeout`) are always distinct
/// from API-level rejections (`Api`), so callers can branch on the failure
/// kind rather than on message text.
#[derive(Error, Debug)]
pub enum PoofError {
    /// Local input/output errors (reading an image file, saving a result)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network-level failure: connection refused, DNS resolution, TLS,
    /// protocol errors. Never raised for a response the server produced.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The configured request timeout elapsed before a response arrived
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// A successful (2xx) response that could not be decoded: missing or
    /// non-numeric metadata headers, malformed JSON body
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The API rejected the request with a structured error response
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PoofError {
    /// Create a new transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {operation} '{path_display}': {error}"),
        ))
    }

    /// Return the API error payload when this is an API-level failure
    #[must_use]
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Category of an API rejection, selected from the HTTP status code at the
/// response-decoding boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401: the API key is invalid, missing, or revoked
    Auth,
    /// 402: the account has insufficient credits
    PaymentRequired,
    /// 403: the account is suspended or the key lacks permissions
    PermissionDenied,
    /// 429: rate limit exceeded
    RateLimit,
    /// 400 or 422: the request parameters or image failed validation
    Validation,
    /// 5xx: server-side error
    Server,
    /// Any other non-2xx status
    Other,
}

impl ApiErrorKind {
    /// Map an HTTP status code to its error category.
    pub(crate) fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Auth,
            402 => Self::PaymentRequired,
            403 => Self::PermissionDenied,
            429 => Self::RateLimit,
            400 | 422 => Self::Validation,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }
}

/// Structured error returned by the Poof API for a non-2xx response.
///
/// Every variant of [`ApiErrorKind`] shares this field set; the kind is the
/// programmatic branching point, `message`/`details` are for humans, and
/// `request_id` identifies the call for support.
#[derive(Error, Debug)]
#[error("API error {status_code}: {message}")]
pub struct ApiError {
    /// Error category derived from the HTTP status code
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Machine-readable error code (e.g. `"auth_failed"`)
    pub code: Option<String>,
    /// Additional structured details or troubleshooting steps
    pub details: Option<serde_json::Value>,
    /// Unique request identifier for support
    pub request_id: Option<String>,
    /// HTTP status code of the response
    pub status_code: u16,
}
