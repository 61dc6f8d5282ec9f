//! The redemption flow: every acquisition channel funnels in here.
//!
//! One entry point serves all four channels (URL parameter, camera scan,
//! local image decode, server-side decode), so a code is handled
//! identically no matter how it arrived. The flow also holds the
//! one-attempt-at-a-time invariant: sources halt themselves before
//! submitting, and anything still racing is turned away with
//! [`FlowError::Busy`] instead of double-spending a code.

use crate::render::{ContentSurface, RenderError};
use crate::status::StatusSink;
use gatepass_acquire::{AcquireError, CameraScanner, QrDetector};
use gatepass_api::{ApiClient, ApiError};
use gatepass_types::{ContentId, DeviceId, OpaqueToken};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::debug;

/// Result type for flow operations.
pub type FlowResult<T> = Result<T, FlowError>;

/// Errors that end one redemption attempt.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Normalization produced an empty code.
    #[error("no redeemable code in payload")]
    EmptyCode,

    /// Another redemption attempt is already in flight.
    #[error("a redemption is already in flight")]
    Busy,

    /// Neither local nor server-side decoding found a code in the image.
    #[error("no code detected in image")]
    NoCodeDetected,

    /// Acquisition failed before producing a payload.
    #[error(transparent)]
    Acquire(#[from] AcquireError),

    /// The backend refused or failed the attempt.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Content was unlocked but could not be shown.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Orchestrates acquisition, normalization, redemption and rendering.
pub struct RedeemFlow {
    api: ApiClient,
    device: DeviceId,
    sink: Arc<dyn StatusSink>,
    in_flight: AtomicBool,
}

impl RedeemFlow {
    /// Builds a flow bound to one device id for the session.
    pub fn new(api: ApiClient, device: DeviceId, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            api,
            device,
            sink,
            in_flight: AtomicBool::new(false),
        }
    }

    /// The device id every redemption is bound to.
    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    /// The single redemption entry point.
    ///
    /// Normalizes `raw`, exchanges the code for a grant, fetches the
    /// unlocked content and swaps it onto the surface. Returns the unlocked
    /// content id. Every failure is logged to the status sink and ends the
    /// attempt: no retry, and a failed redeem never triggers a content
    /// fetch.
    pub async fn redeem_raw(
        &self,
        raw: &str,
        surface: &mut dyn ContentSurface,
    ) -> FlowResult<ContentId> {
        self.redeem_token(OpaqueToken::extract(raw), surface).await
    }

    /// Redeems a page-supplied value (the URL-parameter channel). Already
    /// the literal token slot, but it goes through the same path as every
    /// other source.
    pub async fn redeem_param(
        &self,
        value: &str,
        surface: &mut dyn ContentSurface,
    ) -> FlowResult<ContentId> {
        self.redeem_token(OpaqueToken::from_literal(value), surface)
            .await
    }

    /// Camera channel: scan until a code is found, then redeem it.
    ///
    /// A camera failure disables only this source; the scan loop has
    /// already stopped and released the stream before redemption begins.
    pub async fn scan_camera(
        &self,
        scanner: &mut CameraScanner,
        surface: &mut dyn ContentSurface,
    ) -> FlowResult<ContentId> {
        let raw = match scanner.scan().await {
            Ok(raw) => {
                self.sink.append("QR code detected.");
                raw
            }
            Err(AcquireError::Stopped) => {
                self.sink.append("Scan stopped.");
                return Err(AcquireError::Stopped.into());
            }
            Err(e) => {
                self.sink.append(&format!("Camera scan failed: {e}"));
                return Err(e.into());
            }
        };
        self.redeem_raw(&raw, surface).await
    }

    /// Image channel: local detection when the capability exists, with a
    /// single server decode call as the authoritative fallback.
    pub async fn redeem_image(
        &self,
        image: &[u8],
        filename: &str,
        detector: Option<&dyn QrDetector>,
        surface: &mut dyn ContentSurface,
    ) -> FlowResult<ContentId> {
        if let Some(detector) = detector {
            match detector.detect_bytes(image) {
                Ok(Some(raw)) => {
                    self.sink.append("QR code detected in image.");
                    return self.redeem_raw(&raw, surface).await;
                }
                Ok(None) => debug!("no local detection, deferring to server decode"),
                Err(e) => debug!("local decode failed ({e}), deferring to server decode"),
            }
        }

        match self.api.decode_image(image.to_vec(), filename).await {
            Ok(Some(raw)) => {
                self.sink.append("QR code decoded by server.");
                self.redeem_raw(&raw, surface).await
            }
            Ok(None) => {
                self.sink.append("No code detected in image.");
                Err(FlowError::NoCodeDetected)
            }
            Err(e) => {
                self.sink.append(&format!("Server decode failed: {e}"));
                Err(e.into())
            }
        }
    }

    async fn redeem_token(
        &self,
        opaque: OpaqueToken,
        surface: &mut dyn ContentSurface,
    ) -> FlowResult<ContentId> {
        if opaque.is_empty() {
            self.sink.append("No redeemable code in payload.");
            return Err(FlowError::EmptyCode);
        }
        let _guard = self.begin_attempt()?;

        self.sink
            .append(&format!("Redeeming code {}...", opaque.preview()));
        let grant = match self.api.redeem(&opaque, &self.device).await {
            Ok(grant) => grant,
            Err(e) => {
                self.sink.append(&format!("Redemption failed: {e}"));
                return Err(e.into());
            }
        };

        let content_id = grant.content_id.clone();
        self.sink
            .append(&format!("Code accepted, opening content {content_id}."));

        let document = match self.api.fetch_content(grant).await {
            Ok(document) => document,
            Err(e) => {
                // The grant is spent either way; it is never resubmitted.
                self.sink.append(&format!("Content fetch failed: {e}"));
                return Err(e.into());
            }
        };

        if let Err(e) = surface.replace(&document) {
            self.sink.append(&format!("Could not display content: {e}"));
            return Err(e.into());
        }
        self.sink.append("Content unlocked.");
        Ok(content_id)
    }

    fn begin_attempt(&self) -> FlowResult<AttemptGuard<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.sink.append("A redemption is already in progress.");
            return Err(FlowError::Busy);
        }
        Ok(AttemptGuard {
            flag: &self.in_flight,
        })
    }
}

/// Clears the in-flight flag when an attempt ends, however it ends.
struct AttemptGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
