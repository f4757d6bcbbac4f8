//! `GET /api/steam-games` — recently played games of the configured account.

use crate::{AppState, error::ApiError};
use axum::{Json, extract::State};
use goofer_types::{GooferError, SteamGame};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<SteamGame>,
}

pub(crate) async fn steam_games(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GamesResponse>, ApiError> {
    let library = state
        .upstreams
        .library
        .as_ref()
        .ok_or(GooferError::NotConfigured("steam"))?;
    let games = library.recently_played().await?;
    Ok(Json(GamesResponse { games }))
}
