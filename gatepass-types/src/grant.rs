//! The access grant produced by a successful redemption.

use crate::ids::{BearerToken, ContentId};
use serde::Deserialize;

/// A short-lived, device-bound credential pair returned by the redemption
/// endpoint: the content it unlocks plus the bearer token that unlocks it.
///
/// Deliberately not `Clone`: the content fetch consumes the grant by value,
/// so one redemption funds at most one fetch.
#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct AccessGrant {
    /// The content unlocked by this grant.
    pub content_id: ContentId,
    /// Bearer credential scoped to `content_id`.
    pub token: BearerToken,
    /// Expiry as seconds since the epoch, when the backend reports one.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl AccessGrant {
    /// Builds a grant without an expiry.
    #[must_use]
    pub fn new(content_id: ContentId, token: BearerToken) -> Self {
        Self {
            content_id,
            token,
            expires_at: None,
        }
    }

    /// Attaches an expiry timestamp (seconds since the epoch).
    #[must_use]
    pub fn with_expiry(mut self, epoch_secs: i64) -> Self {
        self.expires_at = Some(epoch_secs);
        self
    }

    /// Seconds until expiry; negative once expired, `None` when the backend
    /// reported no expiry.
    #[must_use]
    pub fn expires_in_secs(&self) -> Option<i64> {
        self.expires_at
            .map(|at| at - chrono::Utc::now().timestamp())
    }

    /// True when the grant carries an expiry that has already passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_in_secs().is_some_and(|left| left <= 0)
    }
}
