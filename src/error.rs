// error.rs
use thiserror::Error;

/// Transport-level failures from the order API, mirroring how the backend
/// reports them: connectivity problems, rejected credentials, and
/// endpoint-specific rejections with a server-provided message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Api { status, .. } => Some(*status),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Whether a user-initiated retry (pull-to-refresh, re-tap send) makes
    /// sense: connectivity failures and server faults do, rejected input and
    /// rejected credentials do not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Unauthorized(_) => false,
            ApiError::Api { status, .. } => *status >= 500,
        }
    }
}
