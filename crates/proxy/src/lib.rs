//! HTTP proxy layer — axum router, route handlers, and error mapping.
//!
//! Exposes the browser-facing `/api/*` lookups backed by IGDB, Steam and
//! Twitch Helix, plus a `/healthz` probe.

mod cover;
mod error;
mod steam;
mod twitch;

pub use cover::{CoverResponse, lookup_cover};
pub use error::ApiError;

use axum::{
    Json, Router,
    handler::Handler,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use goofer_config::Config;
use goofer_provider::Upstreams;
use goofer_types::GooferError;
use serde_json::{Value, json};
use std::{any::Any as PanicPayload, sync::Arc};
use tokio::sync::OnceCell;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state passed to all route handlers.
pub struct AppState {
    /// Upstream clients, all sharing one HTTP client and token cache.
    pub upstreams: Upstreams,
    /// Broadcaster login whose channel data is served.
    pub channel: String,
    broadcaster_id: OnceCell<String>,
}

impl AppState {
    /// Creates a new shared application state wrapped in an `Arc`.
    pub fn new(config: &Config, upstreams: Upstreams) -> Arc<Self> {
        Arc::new(Self {
            upstreams,
            channel: config.twitch.channel.clone(),
            broadcaster_id: OnceCell::new(),
        })
    }

    /// Numeric user id of the configured channel, resolved once per process.
    ///
    /// Failed lookups are not memoized.
    ///
    /// # Errors
    ///
    /// Returns [`GooferError::NotFound`] if Helix does not know the login, or
    /// the upstream error if the lookup fails.
    pub async fn broadcaster_id(&self) -> goofer_types::Result<&str> {
        self.broadcaster_id
            .get_or_try_init(|| async {
                let id = self.upstreams.channel.user_id(&self.channel).await?;
                id.ok_or_else(|| GooferError::NotFound(format!("twitch channel {}", self.channel)))
            })
            .await
            .map(String::as_str)
    }
}

/// Build the full axum router.
///
/// Routes:
/// - GET /api/game-cover?gameName=   IGDB cover lookup
/// - GET /api/steam-games            Steam recently played
/// - GET /api/twitch/stream          live status
/// - GET /api/twitch/clips           latest clips with game names
/// - GET /api/twitch/videos          past broadcasts
/// - GET /api/twitch/followers       follower total
/// - GET /healthz
///
/// `OPTIONS` on any path is answered by the CORS layer with an empty 200.
/// A panicking handler yields a JSON 500 instead of a dropped connection.
pub fn make_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/game-cover", api(cover::game_cover))
        .route("/api/steam-games", api(steam::steam_games))
        .route("/api/twitch/stream", api(twitch::stream))
        .route("/api/twitch/clips", api(twitch::clips))
        .route("/api/twitch/videos", api(twitch::videos))
        .route("/api/twitch/followers", api(twitch::followers))
        .route("/healthz", get(healthz))
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

/// GET-only route; other methods get a JSON 405.
fn api<H, T>(handler: H) -> MethodRouter<Arc<AppState>>
where
    H: Handler<T, Arc<AppState>>,
    T: 'static,
{
    get(handler).fallback(method_not_allowed)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "method not allowed" })),
    )
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

fn handle_panic(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
        .into_response()
}
