//! The cooperative camera scan loop.

use crate::detect::QrDetector;
use crate::error::{AcquireError, AcquireResult};
use crate::frame::FrameSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time;
use tracing::{debug, trace};

/// Configuration for the scan loop.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Cadence between detection attempts, one per displayed frame.
    pub frame_interval: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            // ~30 fps
            frame_interval: Duration::from_millis(33),
        }
    }
}

/// Cancels an in-progress scan.
///
/// Cloneable and idempotent: `stop` is safe before the scan starts, after
/// it finishes naturally, or any number of times in between. It only
/// signals; the camera stream is released by the scan loop itself, exactly
/// once, so repeated stops can never double-release.
#[derive(Debug, Clone, Default)]
pub struct ScanHandle {
    stopped: Arc<AtomicBool>,
}

impl ScanHandle {
    /// Requests that the scan end at its next tick.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested (or the scan already ended).
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Runs QR detection against a frame source until a payload is found, the
/// handle is stopped, or the stream dies.
pub struct CameraScanner {
    source: Box<dyn FrameSource>,
    detector: Arc<dyn QrDetector>,
    config: ScanConfig,
    handle: ScanHandle,
}

impl CameraScanner {
    /// Builds a scanner over `source`, detecting with `detector`.
    #[must_use]
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Arc<dyn QrDetector>,
        config: ScanConfig,
    ) -> Self {
        Self {
            source,
            detector,
            config,
            handle: ScanHandle::default(),
        }
    }

    /// A handle that can stop this scan from anywhere.
    #[must_use]
    pub fn handle(&self) -> ScanHandle {
        self.handle.clone()
    }

    /// Opens the source and scans until a payload is detected or the scan
    /// is cancelled.
    ///
    /// Per-frame detector failures are expected (focus hunting, partial
    /// codes) and keep the loop alive; only a dead stream ends it early.
    /// The stream is released on every exit path after a successful open,
    /// exactly once. A stop issued before the first tick means the stream
    /// is never acquired at all.
    pub async fn scan(&mut self) -> AcquireResult<String> {
        if self.handle.is_stopped() {
            return Err(AcquireError::Stopped);
        }
        self.source.open().await?;
        debug!("camera stream open, scanning");

        let result = self.run_loop().await;

        // Sole release site: the loop owns the stream.
        self.source.release();
        self.handle.stop();
        debug!("camera stream released");
        result
    }

    async fn run_loop(&mut self) -> AcquireResult<String> {
        let mut ticker = time::interval(self.config.frame_interval);
        loop {
            ticker.tick().await;
            if self.handle.is_stopped() {
                debug!("scan cancelled");
                return Err(AcquireError::Stopped);
            }
            let frame = self.source.next_frame().await?;
            match self.detector.detect_frame(&frame) {
                Ok(Some(raw)) => {
                    debug!("payload detected, stopping scan");
                    return Ok(raw.trim().to_string());
                }
                Ok(None) => {}
                Err(e) => trace!("per-frame detection failed: {e}"),
            }
        }
    }
}
