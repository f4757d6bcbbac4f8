//! Async traits shared across all goofer crates.
//!
//! Every cross-crate abstraction is defined here so that higher layers depend
//! only on `goofer-types`, not on each other.

use crate::{CachedCredential, Clip, IgdbCover, IgdbGame, IssuedToken, SteamGame, StreamInfo, Video};
use async_trait::async_trait;
use std::collections::HashMap;

pub use crate::error::Result;

/// Storage slot for the single cached credential of one client.
///
/// Writes are last-write-wins; implementations need not serialize
/// concurrent `save` calls.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the cached credential, expired or not.
    async fn load(&self) -> Result<Option<CachedCredential>>;
    /// Replace the cached credential.
    async fn save(&self, credential: &CachedCredential) -> Result<()>;
    /// Drop the cached credential.
    async fn clear(&self) -> Result<()>;
}

/// Performs one client-credentials grant against the upstream auth endpoint.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self) -> Result<IssuedToken>;
}

/// Hands out a currently valid bearer token for upstream requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a valid access token, issuing a new one if necessary.
    async fn get_token(&self) -> Result<String>;
    /// Client id to send alongside the bearer token (`Client-ID` header).
    fn client_id(&self) -> &str;
}

/// Game metadata search (IGDB).
#[async_trait]
pub trait GameCatalog: Send + Sync {
    /// Best single match for `name`, if any.
    async fn search_game(&self, name: &str) -> Result<Option<IgdbGame>>;
    /// Resolve a cover id to its image record.
    async fn cover(&self, cover_id: u64) -> Result<Option<IgdbCover>>;
}

/// Game library of the configured account (Steam).
#[async_trait]
pub trait GameLibrary: Send + Sync {
    async fn recently_played(&self) -> Result<Vec<SteamGame>>;
}

/// Channel data for a Twitch broadcaster (Helix).
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Resolve a login name to its numeric user id.
    async fn user_id(&self, login: &str) -> Result<Option<String>>;
    /// The live stream, or `None` when offline.
    async fn stream(&self, user_id: &str) -> Result<Option<StreamInfo>>;
    async fn clips(&self, user_id: &str) -> Result<Vec<Clip>>;
    async fn videos(&self, user_id: &str) -> Result<Vec<Video>>;
    /// Follower total for the broadcaster.
    async fn follower_total(&self, user_id: &str, login: &str) -> Result<u64>;
    /// Map game ids to names. Empty and duplicate ids are ignored.
    async fn game_names(&self, ids: &[String]) -> Result<HashMap<String, String>>;
}
