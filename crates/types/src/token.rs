//! Access-token representation and expiry logic.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Current wall-clock time as Unix seconds.
#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

/// Raw response of a client-credentials token request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    /// Lifetime in seconds, relative to the moment of issuance.
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// An access token together with the absolute instant it stops being usable.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedCredential {
    pub token: String,
    /// Unix seconds; the token is usable strictly before this instant.
    pub expires_at: u64,
}

impl CachedCredential {
    pub fn new(token: impl Into<String>, expires_at: u64) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Anchor an issued token's relative lifetime at `now`.
    #[must_use]
    pub fn from_issued(issued: IssuedToken, now: u64) -> Self {
        Self {
            token: issued.access_token,
            expires_at: now.saturating_add(issued.expires_in),
        }
    }

    #[must_use]
    pub fn is_valid_at(&self, now: u64) -> bool {
        now < self.expires_at
    }

    /// Return `true` if the token may still be used right now.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(unix_now())
    }

    /// Time left before expiry; zero once expired.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        Duration::from_secs(self.expires_at.saturating_sub(unix_now()))
    }

    /// First few characters of the token followed by an ellipsis, for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let prefix: String = self.token.chars().take(4).collect();
        format!("{prefix}…")
    }
}

impl std::fmt::Debug for CachedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedCredential")
            .field("token", &self.masked())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
