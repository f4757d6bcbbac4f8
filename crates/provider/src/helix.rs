//! Twitch Helix client — stream status, clips, VODs and follower count.
//!
//! Auth: the same app access token used for IGDB.
//! Follower totals fall back to DecAPI when Helix refuses the request.

use crate::http_util::UpstreamHttp;
use async_trait::async_trait;
use goofer_types::{
    Clip, ServiceId, StreamInfo, TokenProvider, Video,
    traits::{ChannelDirectory, Result},
};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

/// Page size for clip and video listings.
const PAGE_SIZE: &str = "20";

/// DecAPI's plain-text reply for an unknown login.
const DECAPI_UNKNOWN_USER: &str = "A user with the name could not be found.";

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Game {
    id: String,
    name: String,
}

pub struct HelixClient {
    ph: UpstreamHttp,
    decapi: UpstreamHttp,
    helix_url: String,
    decapi_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl HelixClient {
    pub fn new(
        http: Client,
        helix_url: impl Into<String>,
        decapi_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            ph: UpstreamHttp::new(http.clone(), ServiceId::Helix),
            decapi: UpstreamHttp::new(http, ServiceId::DecApi),
            helix_url: helix_url.into().trim_end_matches('/').to_string(),
            decapi_url: decapi_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<Page<T>> {
        let token = self.tokens.get_token().await?;
        let builder = self
            .ph
            .client()
            .get(format!("{}/{path}", self.helix_url))
            .query(query)
            .header("client-id", self.tokens.client_id())
            .bearer_auth(token);
        self.ph.json(builder).await
    }

    async fn decapi_follow_count(&self, login: &str) -> Result<u64> {
        let builder = self
            .decapi
            .client()
            .get(format!("{}/twitch/followcount/{login}", self.decapi_url));
        let text = self.decapi.text(builder).await?;
        Ok(parse_decapi_count(&text))
    }
}

#[async_trait]
impl ChannelDirectory for HelixClient {
    async fn user_id(&self, login: &str) -> Result<Option<String>> {
        let page: Page<User> = self.get("users", &[("login", login)]).await?;
        Ok(page.data.into_iter().next().map(|u| u.id))
    }

    async fn stream(&self, user_id: &str) -> Result<Option<StreamInfo>> {
        let page: Page<StreamInfo> = self.get("streams", &[("user_id", user_id)]).await?;
        Ok(page.data.into_iter().next())
    }

    async fn clips(&self, user_id: &str) -> Result<Vec<Clip>> {
        let page: Page<Clip> = self
            .get("clips", &[("broadcaster_id", user_id), ("first", PAGE_SIZE)])
            .await?;
        Ok(page.data)
    }

    async fn videos(&self, user_id: &str) -> Result<Vec<Video>> {
        let page: Page<Video> = self
            .get(
                "videos",
                &[("user_id", user_id), ("first", PAGE_SIZE), ("type", "archive")],
            )
            .await?;
        Ok(page.data)
    }

    async fn follower_total(&self, user_id: &str, login: &str) -> Result<u64> {
        let helix: Result<Page<serde_json::Value>> = self
            .get(
                "channels/followers",
                &[("broadcaster_id", user_id), ("first", "1")],
            )
            .await;
        match helix {
            Ok(page) => Ok(page.total.unwrap_or(0)),
            Err(err) => {
                tracing::warn!(error = %err, "helix follower count failed, trying DecAPI");
                match self.decapi_follow_count(login).await {
                    Ok(total) => Ok(total),
                    Err(err) => {
                        tracing::warn!(error = %err, "DecAPI follower count failed");
                        Ok(0)
                    }
                }
            }
        }
    }

    async fn game_names(&self, ids: &[String]) -> Result<HashMap<String, String>> {
        let unique = unique_ids(ids);
        if unique.is_empty() {
            return Ok(HashMap::new());
        }
        let query: Vec<(&str, &str)> = unique.iter().map(|id| ("id", *id)).collect();
        let page: Page<Game> = self.get("games", &query).await?;
        Ok(page.data.into_iter().map(|g| (g.id, g.name)).collect())
    }
}

/// Distinct, non-empty ids in a stable order.
fn unique_ids(ids: &[String]) -> Vec<&str> {
    ids.iter()
        .map(String::as_str)
        .filter(|id| !id.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn parse_decapi_count(text: &str) -> u64 {
    let text = text.trim();
    if text == DECAPI_UNKNOWN_USER {
        return 0;
    }
    text.replace(',', "").parse().unwrap_or(0)
}
