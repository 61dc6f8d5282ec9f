//! The backend client: redeem, content fetch, server-side decode.

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use gatepass_types::{AccessGrant, DeviceId, OpaqueToken};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Wire shape of a redemption submission.
#[derive(Debug, Serialize)]
struct RedeemRequest<'a> {
    opaque: &'a str,
    device_id: &'a str,
}

/// Structured error body the backend attaches to rejections.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Wire shape of a decode endpoint response.
#[derive(Debug, Deserialize)]
struct DecodeBody {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    raw: Option<String>,
}

/// Typed client for the three backend endpoints.
///
/// Holds a single connection-pooling `reqwest::Client`; cheap to share by
/// reference across acquisition sources.
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Builds a client from the given configuration.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Exchanges an opaque code and device id for an access grant.
    ///
    /// Single shot: a non-success status or an off-contract body is final
    /// for this attempt. The caller must not resubmit; the backend may have
    /// consumed the code even when the outcome is unknown here.
    pub async fn redeem(&self, opaque: &OpaqueToken, device: &DeviceId) -> ApiResult<AccessGrant> {
        let url = self.config.redeem_url()?;
        debug!(code = %opaque.preview(), device = %device, "submitting redemption");

        let response = self
            .http
            .post(url)
            .json(&RedeemRequest {
                opaque: opaque.as_str(),
                device_id: device.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(match parse_error_code(&body) {
                Some(code) => {
                    warn!(status = status.as_u16(), code = %code, "redemption rejected");
                    ApiError::Rejected {
                        status: status.as_u16(),
                        code,
                    }
                }
                None => {
                    warn!(status = status.as_u16(), "redemption failed without diagnostic");
                    ApiError::BadResponse {
                        status: status.as_u16(),
                    }
                }
            });
        }

        let grant: AccessGrant = serde_json::from_slice(&body).map_err(|e| {
            warn!(status = status.as_u16(), "redeem response did not parse: {e}");
            ApiError::BadResponse {
                status: status.as_u16(),
            }
        })?;
        info!(content_id = %grant.content_id, "redemption accepted");
        Ok(grant)
    }

    /// Fetches the gated content unlocked by `grant`, presenting its bearer
    /// token. Consumes the grant: one redemption funds at most one fetch.
    pub async fn fetch_content(&self, grant: AccessGrant) -> ApiResult<String> {
        let url = self.config.content_url(&grant.content_id)?;
        debug!(content_id = %grant.content_id, "fetching gated content");

        let response = self
            .http
            .get(url)
            .bearer_auth(grant.token.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                content_id = %grant.content_id,
                "content fetch failed"
            );
            return Err(ApiError::ContentStatus(status.as_u16()));
        }
        Ok(response.text().await?)
    }

    /// Uploads an image for server-side QR decoding.
    ///
    /// `Ok(None)` means the server inspected the image and found no code:
    /// an outcome, not an error. Callers issue at most one decode per image.
    pub async fn decode_image(&self, image: Vec<u8>, filename: &str) -> ApiResult<Option<String>> {
        let url = self.config.decode_url()?;
        debug!(filename, bytes = image.len(), "uploading image for server decode");

        let part = reqwest::multipart::Part::bytes(image).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(match parse_error_code(&body) {
                Some(code) => {
                    warn!(status = status.as_u16(), code = %code, "server decode rejected");
                    ApiError::DecodeRejected {
                        status: status.as_u16(),
                        code,
                    }
                }
                None => ApiError::BadResponse {
                    status: status.as_u16(),
                },
            });
        }

        let decoded: DecodeBody = serde_json::from_slice(&body).map_err(|_| {
            ApiError::BadResponse {
                status: status.as_u16(),
            }
        })?;

        match decoded {
            DecodeBody {
                ok: true,
                raw: Some(raw),
            } if !raw.trim().is_empty() => {
                debug!("server decoded a payload");
                Ok(Some(raw))
            }
            _ => {
                debug!("server found no code in the image");
                Ok(None)
            }
        }
    }
}

fn parse_error_code(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.error)
        .ok()
}
