//! Acquisition sources for Gatepass.
//!
//! Every way a redemption code can physically arrive lives here:
//! - **Camera**: a cooperative scan loop ([`CameraScanner`]) over an
//!   abstract, permission-gated [`FrameSource`]
//! - **Images**: in-process QR detection ([`QrDetector`]) with an optional
//!   `rqrr`-backed implementation behind the `local-decode` feature
//!
//! Sources produce raw payload strings only. Normalization and redemption
//! are the caller's job, so every channel funnels into the same entry
//! point downstream.
//!
//! The capability probe [`local_detector`] resolves the optional local
//! detector at call time; when it is absent, the server-side decode
//! endpoint is the authoritative fallback.

mod detect;
mod error;
mod frame;
mod scanner;

pub use detect::{QrDetector, local_detector};
pub use error::{AcquireError, AcquireResult};
pub use frame::{Frame, FrameSource};
pub use scanner::{CameraScanner, ScanConfig, ScanHandle};

#[cfg(feature = "local-decode")]
pub use detect::LocalDetector;

/// Scripted doubles for tests and hosts without real hardware.
pub mod mock {
    pub use crate::detect::mock::ScriptedDetector;
    pub use crate::frame::mock::{MockFrameSource, SourceStats};
}
