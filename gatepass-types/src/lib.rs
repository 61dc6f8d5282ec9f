//! Core type definitions for Gatepass.
//!
//! This crate defines the fundamental types shared by every acquisition
//! channel and the redemption client:
//! - Credential newtypes (opaque codes, bearer tokens) with redacted `Debug`
//! - Device and content identifiers
//! - The access grant returned by a successful redemption
//! - Payload normalization (`OpaqueToken::extract`) turning any scanned or
//!   uploaded string into a canonical redemption code
//!
//! Anything that talks to the network belongs in `gatepass-api`, not here.

mod grant;
mod ids;

pub use grant::AccessGrant;
pub use ids::{BearerToken, ContentId, DeviceId, OpaqueToken};
