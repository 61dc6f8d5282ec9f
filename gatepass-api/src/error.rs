//! Error types for the backend client.

use thiserror::Error;

/// Result type for backend operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur talking to the redemption backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the redemption with a structured error code.
    #[error("redemption rejected: {code} (status {status})")]
    Rejected { status: u16, code: String },

    /// The backend answered with a status or body outside the contract.
    #[error("unexpected response from backend (status {status})")]
    BadResponse { status: u16 },

    /// The content endpoint refused or failed the authorized fetch.
    #[error("content fetch failed (status {0})")]
    ContentStatus(u16),

    /// The decode endpoint rejected the uploaded image.
    #[error("server decode rejected: {code} (status {status})")]
    DecodeRejected { status: u16, code: String },

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// True if the backend reported the code as unknown or already spent.
    pub fn is_invalid_code(&self) -> bool {
        matches!(self, ApiError::Rejected { code, .. } if code == "invalid_code")
    }

    /// True if the code was already bound to a different device.
    pub fn is_device_mismatch(&self) -> bool {
        matches!(self, ApiError::Rejected { code, .. } if code == "device_mismatch")
    }

    /// Returns true if this error represents a 429 rate-limit response.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            ApiError::Rejected { status, code } => *status == 429 || code == "rate_limited",
            ApiError::BadResponse { status } => *status == 429,
            ApiError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 429),
            _ => false,
        }
    }
}
