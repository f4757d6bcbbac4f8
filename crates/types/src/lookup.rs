//! Upstream record shapes and the normalized payloads returned to the browser.

use serde::{Deserialize, Serialize};

/// Outcome of a single-value lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub found: bool,
    pub value: Option<String>,
}

impl LookupResult {
    pub fn found(value: impl Into<String>) -> Self {
        Self {
            found: true,
            value: Some(value.into()),
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self {
            found: false,
            value: None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<String> {
        if self.found { self.value } else { None }
    }
}

// ── IGDB ──────────────────────────────────────────────────────────────────────

/// A row of `POST /v4/games` with `fields name,cover`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgdbGame {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    /// Cover id; absent when the game has no artwork.
    #[serde(default)]
    pub cover: Option<u64>,
}

/// A row of `POST /v4/covers` with `fields url,image_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgdbCover {
    pub id: u64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_id: Option<String>,
}

// ── Steam ─────────────────────────────────────────────────────────────────────

/// A recently played game, normalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteamGame {
    pub appid: u64,
    pub name: String,
    /// Whole hours.
    pub playtime_forever: u64,
    /// Whole hours over the last two weeks.
    pub playtime_2weeks: u64,
    pub img_icon_url: String,
    pub img_logo_url: String,
}

// ── Twitch Helix ──────────────────────────────────────────────────────────────

/// A live broadcast, as returned by `GET /helix/streams`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamInfo {
    pub id: String,
    #[serde(default)]
    pub user_login: String,
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub viewer_count: u64,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub thumbnail_url: String,
}

/// A clip, as returned by `GET /helix/clips`, plus the resolved game name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub embed_url: String,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub game_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_name: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub duration: f64,
}

/// A past broadcast, as returned by `GET /helix/videos?type=archive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub view_count: u64,
    /// Helix duration string such as `"3h8m33s"`.
    #[serde(default)]
    pub duration: String,
}
