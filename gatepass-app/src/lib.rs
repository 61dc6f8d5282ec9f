//! Gatepass: redeem a single-use QR code for device-bound access to gated
//! content.
//!
//! This crate ties the pieces together:
//! - **Flow**: the single redemption entry point every acquisition channel
//!   funnels into (URL parameter, camera scan, image upload with local or
//!   server-side decoding)
//! - **Render**: the sandboxed surface the unlocked content lands on
//! - **Status**: the append-only status log shown to the user
//! - **Device**: stable device identity for redemption binding
//!
//! The `gatepass` binary wraps the flow in a CLI; embedding hosts use the
//! library pieces directly with their own `FrameSource` and
//! `ContentSurface` implementations.

pub mod device;
pub mod flow;
pub mod render;
pub mod status;

pub use device::{ephemeral_device_id, fingerprint_device};
pub use flow::{FlowError, FlowResult, RedeemFlow};
pub use render::{
    BufferSurface, ContentSurface, FileSurface, RenderError, RenderResult, SandboxPolicy,
    wrap_sandboxed,
};
pub use status::{ConsoleSink, MemorySink, StatusSink};
