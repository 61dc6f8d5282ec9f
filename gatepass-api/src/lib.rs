//! HTTP client for the Gatepass redemption backend.
//!
//! The backend exposes three black-box endpoints, consumed here and nowhere
//! else:
//! - **Redeem**: exchange an opaque code plus device id for an access grant
//! - **Content**: fetch gated HTML with the grant's bearer token
//! - **Decode**: server-side QR decoding of an uploaded image
//!
//! Every operation is a single request. There is no retry anywhere in this
//! crate: resubmitting a single-use code on an uncertain outcome risks
//! consuming it server-side without the client ever learning the result.

mod client;
mod config;
mod error;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
