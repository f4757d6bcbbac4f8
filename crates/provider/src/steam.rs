//! Steam Web API client — recently played games of one account.

use crate::http_util::UpstreamHttp;
use async_trait::async_trait;
use goofer_types::{
    ServiceId, SteamGame,
    traits::{GameLibrary, Result},
};
use reqwest::Client;
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;

const ICON_BASE_URL: &str = "https://media.steampowered.com/steamcommunity/public/images/apps";
const HEADER_BASE_URL: &str = "https://cdn.cloudflare.steamstatic.com/steam/apps";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    response: RecentlyPlayed,
}

#[derive(Debug, Default, Deserialize)]
struct RecentlyPlayed {
    #[serde(default)]
    games: Vec<RawGame>,
}

/// Game entry as Steam returns it; playtimes in minutes.
#[derive(Debug, Deserialize)]
struct RawGame {
    appid: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    playtime_forever: u64,
    #[serde(default)]
    playtime_2weeks: Option<u64>,
    #[serde(default)]
    img_icon_url: String,
}

pub struct SteamClient {
    ph: UpstreamHttp,
    api_url: String,
    api_key: SecretString,
    steam_id: u64,
    count: u32,
}

impl SteamClient {
    pub fn new(
        http: Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        steam_id: u64,
        count: u32,
    ) -> Self {
        Self {
            ph: UpstreamHttp::new(http, ServiceId::Steam),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::from(api_key.into()),
            steam_id,
            count,
        }
    }
}

#[async_trait]
impl GameLibrary for SteamClient {
    async fn recently_played(&self) -> Result<Vec<SteamGame>> {
        let builder = self
            .ph
            .client()
            .get(format!(
                "{}/IPlayerService/GetRecentlyPlayedGames/v1/",
                self.api_url
            ))
            .query(&[
                ("key", self.api_key.expose_secret().to_string()),
                ("steamid", self.steam_id.to_string()),
                ("count", self.count.to_string()),
            ]);
        let envelope: Envelope = self.ph.json(builder).await?;
        tracing::debug!(service = %ServiceId::Steam, games = envelope.response.games.len(), "fetched recently played");
        Ok(envelope.response.games.into_iter().map(normalize).collect())
    }
}

fn normalize(raw: RawGame) -> SteamGame {
    SteamGame {
        appid: raw.appid,
        name: raw.name,
        playtime_forever: raw.playtime_forever / 60,
        playtime_2weeks: raw.playtime_2weeks.unwrap_or(0) / 60,
        img_icon_url: format!("{ICON_BASE_URL}/{}/{}.jpg", raw.appid, raw.img_icon_url),
        img_logo_url: format!("{HEADER_BASE_URL}/{}/header.jpg", raw.appid),
    }
}
