//! Error types for acquisition sources.

use thiserror::Error;

/// Result type for acquisition operations.
pub type AcquireResult<T> = Result<T, AcquireError>;

/// Errors that can occur while acquiring a payload.
///
/// All of these are non-fatal to the overall flow: they disable one source
/// or trigger the next fallback, never the whole page.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Camera permission denied, missing hardware, or a dead stream.
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    /// The input bytes are not a decodable image.
    #[error("image decode failed: {0}")]
    BadImage(String),

    /// The scan was cancelled via its handle.
    #[error("scan stopped")]
    Stopped,
}
