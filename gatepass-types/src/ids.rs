//! Identifier and credential types used throughout the Gatepass core.
//!
//! Opaque codes and bearer tokens are secret-adjacent: their `Debug`
//! representations are truncated so a full credential never lands in a log
//! line by accident. Wire serialization is transparent.

use percent_encoding::percent_decode_str;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use url::Url;

/// Base used to resolve relative QR payloads (`/redeem?c=...`). Only the
/// query string of the resolved URL is ever inspected; the host is a
/// placeholder and never appears in a token.
const RELATIVE_BASE: &str = "http://gatepass.local/";

/// How many leading characters of a credential appear in diagnostics.
const PREVIEW_CHARS: usize = 6;

fn preview_of(value: &str) -> String {
    if value.chars().count() <= PREVIEW_CHARS {
        value.to_string()
    } else {
        let head: String = value.chars().take(PREVIEW_CHARS).collect();
        format!("{head}…")
    }
}

/// The canonical single-use redemption code.
///
/// An `OpaqueToken` is derived from a raw scanned or uploaded payload via
/// [`OpaqueToken::extract`], which is total: every input maps to exactly one
/// token, falling back to the trimmed literal string when no structured
/// payload is recognized.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueToken(String);

impl OpaqueToken {
    /// Wraps an already-canonical code (e.g. a page-supplied value).
    /// The input is trimmed but otherwise taken verbatim.
    #[must_use]
    pub fn from_literal(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    /// Normalizes a raw payload into the canonical opaque code.
    ///
    /// Accepts absolute URLs, relative URLs (`/redeem?c=...`), loose text
    /// containing a `?c=`/`&c=` fragment, or a bare code. First match wins:
    ///
    /// 1. empty or whitespace input yields an empty token;
    /// 2. a `c` query parameter of the input parsed as a URL (absolute, or
    ///    relative against a fixed base);
    /// 3. a percent-encoded `c=` assignment introduced by `?` or `&`
    ///    anywhere in the text;
    /// 4. the trimmed input itself.
    ///
    /// Total and side-effect-free; malformed URLs fall through rather than
    /// fail.
    #[must_use]
    pub fn extract(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Self(String::new());
        }
        if let Some(code) = query_param(s) {
            return Self(code);
        }
        if let Some(code) = query_fragment(s) {
            return Self(code);
        }
        Self(s.to_string())
    }

    /// The canonical code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when normalization produced an empty token (empty input).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A truncated preview safe to echo in status messages.
    #[must_use]
    pub fn preview(&self) -> String {
        preview_of(&self.0)
    }
}

impl fmt::Debug for OpaqueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueToken({})", self.preview())
    }
}

/// Finds a non-empty `c` query parameter after parsing the input as a URL.
/// Absolute parse is attempted first, then a join against [`RELATIVE_BASE`]
/// to cover relative forms. Either parse failing is not an error.
fn query_param(s: &str) -> Option<String> {
    let url = match Url::parse(s) {
        Ok(url) => url,
        Err(_) => Url::parse(RELATIVE_BASE).ok()?.join(s).ok()?,
    };
    url.query_pairs()
        .find(|(key, value)| key == "c" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Scans loose text for a `c=` assignment introduced by `?` or `&` and
/// returns the percent-decoded value up to the next `&`.
fn query_fragment(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut from = 0;
    while let Some(pos) = s[from..].find("c=") {
        let at = from + pos;
        if at > 0 && matches!(bytes[at - 1], b'?' | b'&') {
            let value = s[at + 2..].split('&').next().unwrap_or("");
            if !value.is_empty() {
                return Some(percent_decode_str(value).decode_utf8_lossy().into_owned());
            }
        }
        from = at + 2;
    }
    None
}

/// Identifies the redeeming client. Constant for one session; supplied by
/// the host or generated from a device fingerprint at startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Wraps a device identifier string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the piece of gated content unlocked by a redemption.
///
/// Stored as a string; the backend has historically emitted numeric ids, so
/// deserialization accepts either form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Wraps a content identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ContentIdVisitor;

        impl Visitor<'_> for ContentIdVisitor {
            type Value = ContentId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer content id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ContentId, E> {
                Ok(ContentId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ContentId, E> {
                Ok(ContentId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ContentId, E> {
                Ok(ContentId(v.to_string()))
            }
        }

        deserializer.deserialize_any(ContentIdVisitor)
    }
}

/// A short-lived bearer credential scoped to one piece of content.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a bearer token string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The full token, for the `Authorization` header only.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A truncated preview safe to echo in status messages.
    #[must_use]
    pub fn preview(&self) -> String {
        preview_of(&self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken({})", self.preview())
    }
}
