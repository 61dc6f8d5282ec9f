//! Client configuration for the redemption backend endpoints.

use crate::error::{ApiError, ApiResult};
use gatepass_types::ContentId;
use std::time::Duration;
use url::Url;

/// Configuration for [`crate::ApiClient`].
///
/// Endpoint paths are absolute and joined against `base_url` at request
/// time, so a misconfigured base surfaces as [`ApiError::Config`] on the
/// first call rather than a panic at construction.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the redemption backend.
    pub base_url: String,
    /// Path of the redemption endpoint.
    pub redeem_path: String,
    /// Path prefix of the content endpoint; the content id is appended.
    pub content_path: String,
    /// Path of the server-side decode endpoint.
    pub decode_path: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            redeem_path: "/api/redeem".to_string(),
            content_path: "/api/content".to_string(),
            decode_path: "/api/decode".to_string(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl ApiConfig {
    /// Builds a config pointing at `base`, with default paths.
    #[must_use]
    pub fn with_base_url(base: impl Into<String>) -> Self {
        Self {
            base_url: base.into(),
            ..Self::default()
        }
    }

    /// The redemption endpoint URL.
    pub fn redeem_url(&self) -> ApiResult<Url> {
        self.join(&self.redeem_path)
    }

    /// The content endpoint URL for a specific content id.
    pub fn content_url(&self, id: &ContentId) -> ApiResult<Url> {
        self.join(&format!("{}/{}", self.content_path.trim_end_matches('/'), id))
    }

    /// The server-side decode endpoint URL.
    pub fn decode_url(&self) -> ApiResult<Url> {
        self.join(&self.decode_path)
    }

    fn join(&self, path: &str) -> ApiResult<Url> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        base.join(path)
            .map_err(|e| ApiError::Config(format!("invalid endpoint path {path:?}: {e}")))
    }
}
