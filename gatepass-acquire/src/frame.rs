//! Camera frames and the frame source abstraction.

use crate::error::{AcquireError, AcquireResult};
use async_trait::async_trait;

/// One grayscale video frame: 8 bits per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height` luma bytes.
    pub luma: Vec<u8>,
}

impl Frame {
    /// Builds a frame from raw luma bytes.
    #[must_use]
    pub fn new(width: u32, height: u32, luma: Vec<u8>) -> Self {
        Self { width, height, luma }
    }

    /// An all-white frame, useful as filler when a source has nothing new.
    #[must_use]
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            luma: vec![0xFF; (width as usize) * (height as usize)],
        }
    }
}

/// A scoped, exclusive source of camera frames.
///
/// The underlying stream is an OS-level resource: `open` acquires it (and
/// may suspend on a permission prompt or fail outright), `release` gives it
/// back. `release` must be idempotent (callable before `open`, after an
/// `open` failure, or repeatedly) and must stop the underlying stream at
/// most once. Exactly one component holds the stream at a time.
#[async_trait]
pub trait FrameSource: Send {
    /// Acquires the stream. Failure (permission denial, unsupported
    /// hardware) disables this source; other sources are unaffected.
    async fn open(&mut self) -> AcquireResult<()>;

    /// Pulls the next frame. Only valid between `open` and `release`; an
    /// error here means the stream died.
    async fn next_frame(&mut self) -> AcquireResult<Frame>;

    /// Releases the stream. Idempotent; never errors.
    fn release(&mut self);

    /// Whether the stream is currently held.
    fn is_open(&self) -> bool;
}

/// Scripted frame source for tests and capture-less hosts.
pub mod mock {
    use super::{AcquireError, AcquireResult, Frame, FrameSource};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Observable acquisition counters, shared with the test that built the
    /// source so they survive the scanner taking ownership.
    #[derive(Debug, Default)]
    pub struct SourceStats {
        opens: AtomicUsize,
        releases: AtomicUsize,
    }

    impl SourceStats {
        /// How many times the stream was acquired.
        pub fn opens(&self) -> usize {
            self.opens.load(Ordering::SeqCst)
        }

        /// How many times the stream was actually stopped.
        pub fn releases(&self) -> usize {
            self.releases.load(Ordering::SeqCst)
        }
    }

    /// A frame source that serves queued frames, then blanks forever.
    pub struct MockFrameSource {
        frames: VecDeque<Frame>,
        open: bool,
        refuse_open: bool,
        die_when_drained: bool,
        stats: Arc<SourceStats>,
    }

    impl MockFrameSource {
        /// A source with no pre-queued frames; every pull yields a blank.
        #[must_use]
        pub fn new() -> Self {
            Self::with_frames(Vec::new())
        }

        /// A source that serves `frames` in order, then blanks.
        #[must_use]
        pub fn with_frames(frames: Vec<Frame>) -> Self {
            Self {
                frames: frames.into(),
                open: false,
                refuse_open: false,
                die_when_drained: false,
                stats: Arc::new(SourceStats::default()),
            }
        }

        /// Makes `open` fail, simulating a permission denial.
        #[must_use]
        pub fn refusing_open(mut self) -> Self {
            self.refuse_open = true;
            self
        }

        /// Makes the stream die once the queued frames run out, instead of
        /// serving blanks forever.
        #[must_use]
        pub fn dying_when_drained(mut self) -> Self {
            self.die_when_drained = true;
            self
        }

        /// Counters that outlive this source being moved into a scanner.
        #[must_use]
        pub fn stats(&self) -> Arc<SourceStats> {
            Arc::clone(&self.stats)
        }
    }

    impl Default for MockFrameSource {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl FrameSource for MockFrameSource {
        async fn open(&mut self) -> AcquireResult<()> {
            if self.refuse_open {
                return Err(AcquireError::CameraUnavailable(
                    "permission denied".to_string(),
                ));
            }
            self.open = true;
            self.stats.opens.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn next_frame(&mut self) -> AcquireResult<Frame> {
            if !self.open {
                return Err(AcquireError::CameraUnavailable(
                    "source not open".to_string(),
                ));
            }
            match self.frames.pop_front() {
                Some(frame) => Ok(frame),
                None if self.die_when_drained => Err(AcquireError::CameraUnavailable(
                    "stream ended".to_string(),
                )),
                None => Ok(Frame::blank(8, 8)),
            }
        }

        fn release(&mut self) {
            if self.open {
                self.open = false;
                self.stats.releases.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }
}
