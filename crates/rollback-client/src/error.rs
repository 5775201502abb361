//! Error types for the CircleCI API client.

use thiserror::Error;

/// Errors produced by API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection-level failure (DNS, connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The client could not be constructed from the given settings.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// The caller cancelled the invocation.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Whether a retry might succeed. Client errors and cancellations never
    /// qualify; 429 and 5xx responses and connection-level faults do.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(e) => e.is_timeout() || e.is_connect(),
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            ApiError::Decode(_) | ApiError::Config(_) | ApiError::Cancelled => false,
        }
    }
}
