//! IGDB client — game search and cover art resolution.
//!
//! Auth: Twitch app access token as `Authorization: Bearer`, plus `Client-ID`.
//! Format: Apicalypse query text in a `POST` body, JSON array responses.

use crate::http_util::UpstreamHttp;
use async_trait::async_trait;
use goofer_types::{
    IgdbCover, IgdbGame, ServiceId, TokenProvider,
    traits::{GameCatalog, Result},
};
use reqwest::Client;
use std::sync::Arc;

/// IGDB image CDN prefix used when a cover carries only an `image_id`.
pub const IMAGE_BASE_URL: &str = "https://images.igdb.com/igdb/image/upload";

/// Size tag IGDB returns by default (90×128).
const THUMB_TAG: &str = "t_thumb";

/// Size tag served to the browser (264×374).
pub const COVER_TAG: &str = "t_cover_big";

pub struct IgdbClient {
    ph: UpstreamHttp,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl IgdbClient {
    pub fn new(http: Client, base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            ph: UpstreamHttp::new(http, ServiceId::Igdb),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    async fn query<T: serde::de::DeserializeOwned>(&self, endpoint: &str, body: String) -> Result<T> {
        let token = self.tokens.get_token().await?;
        let builder = self
            .ph
            .client()
            .post(format!("{}/{endpoint}", self.base_url))
            .header("client-id", self.tokens.client_id())
            .bearer_auth(token)
            .header("content-type", "text/plain")
            .body(body);
        self.ph.json(builder).await
    }
}

#[async_trait]
impl GameCatalog for IgdbClient {
    async fn search_game(&self, name: &str) -> Result<Option<IgdbGame>> {
        tracing::debug!(service = %ServiceId::Igdb, query = name, "searching game");
        let games: Vec<IgdbGame> = self.query("games", search_query(name)).await?;
        Ok(games.into_iter().next())
    }

    async fn cover(&self, cover_id: u64) -> Result<Option<IgdbCover>> {
        let covers: Vec<IgdbCover> = self.query("covers", cover_query(cover_id)).await?;
        Ok(covers.into_iter().next())
    }
}

/// Escape a user-supplied term for use inside an Apicalypse string literal.
#[must_use]
pub fn escape_search_term(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' | '\r' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

#[must_use]
pub fn search_query(name: &str) -> String {
    format!(
        "search \"{}\"; fields name,cover; limit 1;",
        escape_search_term(name)
    )
}

#[must_use]
pub fn cover_query(cover_id: u64) -> String {
    format!("fields url,image_id; where id = {cover_id};")
}

/// Browser-ready URL for a cover record, if it has enough to build one.
#[must_use]
pub fn cover_image_url(cover: &IgdbCover) -> Option<String> {
    let raw = match (&cover.url, &cover.image_id) {
        (Some(url), _) if !url.is_empty() => url.clone(),
        (_, Some(image_id)) if !image_id.is_empty() => {
            format!("{IMAGE_BASE_URL}/{COVER_TAG}/{image_id}.jpg")
        }
        _ => return None,
    };
    Some(high_res_url(&raw))
}

/// Swap the thumbnail size tag for the large cover tag and force `https`.
///
/// `http://img.example/t_thumb/abc.jpg` → `https://img.example/t_cover_big/abc.jpg`
#[must_use]
pub fn high_res_url(url: &str) -> String {
    let url = url.replacen(THUMB_TAG, COVER_TAG, 1);
    if url.starts_with("https://") {
        url
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("https://{rest}")
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use goofer_types::GooferError;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    struct StaticToken;

    #[async_trait]
    impl TokenProvider for StaticToken {
        async fn get_token(&self) -> Result<String> {
            Ok("app-token".into())
        }
        fn client_id(&self) -> &str {
            "cid"
        }
    }

    #[derive(Clone, Default)]
    struct Seen {
        bodies: Arc<Mutex<Vec<String>>>,
    }

    async fn spawn(games: Value, covers: Value, games_status: StatusCode) -> (String, Seen) {
        let seen = Seen::default();
        let router = Router::new()
            .route(
                "/games",
                post(move |State(seen): State<Seen>, headers: HeaderMap, body: String| {
                    let games = games.clone();
                    async move {
                        assert_eq!(headers["client-id"], "cid");
                        assert_eq!(headers["authorization"], "Bearer app-token");
                        seen.bodies.lock().unwrap().push(body);
                        (games_status, Json(games))
                    }
                }),
            )
            .route(
                "/covers",
                post(move |State(seen): State<Seen>, body: String| {
                    let covers = covers.clone();
                    async move {
                        seen.bodies.lock().unwrap().push(body);
                        Json(covers)
                    }
                }),
            )
            .with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        (format!("http://{addr}/"), seen)
    }

    fn client(base: &str) -> IgdbClient {
        IgdbClient::new(Client::new(), base, Arc::new(StaticToken))
    }

    #[test]
    fn test_high_res_url_insecure_thumb() {
        assert_eq!(
            high_res_url("http://img.example/t_thumb/abc.jpg"),
            "https://img.example/t_cover_big/abc.jpg"
        );
    }

    #[test]
    fn test_high_res_url_protocol_relative() {
        assert_eq!(
            high_res_url("//images.igdb.com/igdb/image/upload/t_thumb/co1r7f.jpg"),
            "https://images.igdb.com/igdb/image/upload/t_cover_big/co1r7f.jpg"
        );
    }

    #[test]
    fn test_high_res_url_already_https() {
        let url = "https://img.example/t_cover_big/abc.jpg";
        assert_eq!(high_res_url(url), url);
    }

    #[test]
    fn test_cover_image_url_from_image_id() {
        let cover = IgdbCover {
            id: 1,
            url: None,
            image_id: Some("co2xyz".into()),
        };
        assert_eq!(
            cover_image_url(&cover).as_deref(),
            Some("https://images.igdb.com/igdb/image/upload/t_cover_big/co2xyz.jpg")
        );
    }

    #[test]
    fn test_cover_image_url_empty_record() {
        let cover = IgdbCover {
            id: 1,
            url: None,
            image_id: None,
        };
        assert!(cover_image_url(&cover).is_none());
    }

    #[test]
    fn test_escape_search_term() {
        assert_eq!(escape_search_term(r#"Say "hi"\"#), r#"Say \"hi\"\\"#);
        assert_eq!(
            search_query("Half\"; fields *; limit 500"),
            "search \"Half\\\"; fields *; limit 500\"; fields name,cover; limit 1;"
        );
    }

    #[test]
    fn test_cover_query() {
        assert_eq!(cover_query(42), "fields url,image_id; where id = 42;");
    }

    #[tokio::test]
    async fn test_search_and_cover_roundtrip() {
        let (base, seen) = spawn(
            json!([{"id": 7, "name": "Celeste", "cover": 99}]),
            json!([{"id": 99, "url": "//images.igdb.com/t_thumb/c.jpg", "image_id": "c"}]),
            StatusCode::OK,
        )
        .await;
        let igdb = client(&base);

        let game = igdb.search_game("Celeste").await.unwrap().unwrap();
        assert_eq!(game.cover, Some(99));
        let cover = igdb.cover(99).await.unwrap().unwrap();
        assert_eq!(cover.image_id.as_deref(), Some("c"));

        let bodies = seen.bodies.lock().unwrap().clone();
        assert_eq!(
            bodies,
            vec![
                "search \"Celeste\"; fields name,cover; limit 1;".to_string(),
                "fields url,image_id; where id = 99;".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_search_empty_result() {
        let (base, _) = spawn(json!([]), json!([]), StatusCode::OK).await;
        assert!(client(&base).search_game("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_upstream_failure() {
        let (base, _) = spawn(json!({"message": "oops"}), json!([]), StatusCode::INTERNAL_SERVER_ERROR).await;
        let err = client(&base).search_game("x").await.unwrap_err();
        assert!(matches!(
            err,
            GooferError::Upstream {
                service: ServiceId::Igdb,
                status: 500,
                ..
            }
        ));
    }
}
