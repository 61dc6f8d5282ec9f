//! QR detection: the detector trait, the optional in-process detector, and
//! the capability probe that selects between them at call time.

use crate::error::AcquireResult;
use crate::frame::Frame;
use std::sync::Arc;

/// Detects a QR payload in camera frames or encoded images.
///
/// `Ok(None)` means "no code in this input", a routine outcome. Errors are
/// reserved for undecodable input or a failing detector backend; the scan
/// loop downgrades them to no-detections to stay alive.
pub trait QrDetector: Send + Sync {
    /// Scans one grayscale frame.
    fn detect_frame(&self, frame: &Frame) -> AcquireResult<Option<String>>;

    /// Decodes encoded image bytes (PNG/JPEG) and scans the result.
    fn detect_bytes(&self, bytes: &[u8]) -> AcquireResult<Option<String>>;
}

/// Capability probe for in-process QR detection.
///
/// Returns the local detector when this build carries one, `None`
/// otherwise. Local detection is an optimization only; callers without it
/// fall through to the server-side decode endpoint, which remains the
/// authoritative fallback in all cases.
#[must_use]
pub fn local_detector() -> Option<Arc<dyn QrDetector>> {
    #[cfg(feature = "local-decode")]
    {
        Some(Arc::new(LocalDetector::new()))
    }
    #[cfg(not(feature = "local-decode"))]
    {
        None
    }
}

#[cfg(feature = "local-decode")]
pub use local::LocalDetector;

#[cfg(feature = "local-decode")]
mod local {
    use super::QrDetector;
    use crate::error::{AcquireError, AcquireResult};
    use crate::frame::Frame;
    use tracing::trace;

    /// In-process QR detector backed by `rqrr`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalDetector;

    impl LocalDetector {
        /// Creates a detector. Stateless; cheap to construct per call.
        #[must_use]
        pub fn new() -> Self {
            Self
        }

        fn detect_luma(&self, width: u32, height: u32, luma: &[u8]) -> AcquireResult<Option<String>> {
            let (w, h) = (width as usize, height as usize);
            if luma.len() != w * h {
                return Err(AcquireError::BadImage(
                    "luma buffer does not match frame dimensions".to_string(),
                ));
            }
            let mut prepared =
                rqrr::PreparedImage::prepare_from_greyscale(w, h, |x, y| luma[y * w + x]);
            for grid in prepared.detect_grids() {
                match grid.decode() {
                    Ok((_meta, content)) => return Ok(Some(content)),
                    Err(e) => {
                        // A grid can be located but undecodable (glare,
                        // blur); try any remaining grids.
                        trace!("grid decode failed: {e}");
                    }
                }
            }
            Ok(None)
        }
    }

    impl QrDetector for LocalDetector {
        fn detect_frame(&self, frame: &Frame) -> AcquireResult<Option<String>> {
            self.detect_luma(frame.width, frame.height, &frame.luma)
        }

        fn detect_bytes(&self, bytes: &[u8]) -> AcquireResult<Option<String>> {
            let img = image::load_from_memory(bytes)
                .map_err(|e| AcquireError::BadImage(e.to_string()))?
                .to_luma8();
            self.detect_luma(img.width(), img.height(), img.as_raw())
        }
    }
}

/// Scripted detector for tests.
pub mod mock {
    use super::QrDetector;
    use crate::error::AcquireResult;
    use crate::frame::Frame;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A detector that replays a script of results, then reports
    /// no-detection forever. Shared behind an `Arc`, so interior state is
    /// locked.
    #[derive(Debug, Default)]
    pub struct ScriptedDetector {
        script: Mutex<VecDeque<AcquireResult<Option<String>>>>,
        calls: AtomicUsize,
    }

    impl ScriptedDetector {
        /// A detector that never finds anything.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A detector replaying `script` in order.
        #[must_use]
        pub fn with_script(script: Vec<AcquireResult<Option<String>>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            }
        }

        /// How many detection attempts have been made.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn next(&self) -> AcquireResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .expect("detector script lock poisoned")
                .pop_front()
                .unwrap_or(Ok(None))
        }
    }

    impl QrDetector for ScriptedDetector {
        fn detect_frame(&self, _frame: &Frame) -> AcquireResult<Option<String>> {
            self.next()
        }

        fn detect_bytes(&self, _bytes: &[u8]) -> AcquireResult<Option<String>> {
            self.next()
        }
    }
}
