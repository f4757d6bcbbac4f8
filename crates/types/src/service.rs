//! Identifiers for the upstream services the proxy talks to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an upstream third-party service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceId {
    /// Twitch OAuth token issuer (`id.twitch.tv`).
    TwitchAuth,
    /// IGDB game database.
    Igdb,
    /// Twitch Helix REST API.
    Helix,
    /// Steam Web API.
    Steam,
    /// DecAPI follow-count fallback.
    DecApi,
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwitchAuth => write!(f, "Twitch auth"),
            Self::Igdb => write!(f, "IGDB"),
            Self::Helix => write!(f, "Twitch"),
            Self::Steam => write!(f, "Steam"),
            Self::DecApi => write!(f, "DecAPI"),
        }
    }
}
