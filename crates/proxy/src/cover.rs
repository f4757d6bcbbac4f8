//! `GET /api/game-cover` — two-step IGDB search-then-resolve.

use crate::{AppState, error::ApiError};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use goofer_provider::igdb::cover_image_url;
use goofer_types::{GameCatalog, GooferError, LookupResult};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverResponse {
    pub cover_url: String,
}

/// Look up the high-resolution cover URL for `name`.
///
/// Makes at most two catalog calls: the search, then the cover record.
/// A missing game, a game without cover, or an empty cover record all
/// yield [`LookupResult::not_found`].
///
/// # Errors
///
/// Propagates catalog failures unchanged.
pub async fn lookup_cover(catalog: &dyn GameCatalog, name: &str) -> goofer_types::Result<LookupResult> {
    let Some(cover_id) = catalog.search_game(name).await?.and_then(|g| g.cover) else {
        return Ok(LookupResult::not_found());
    };
    let Some(cover) = catalog.cover(cover_id).await? else {
        return Ok(LookupResult::not_found());
    };
    Ok(cover_image_url(&cover).map_or_else(LookupResult::not_found, LookupResult::found))
}

pub(crate) async fn game_cover(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<CoverResponse>, ApiError> {
    let name = query
        .ok()
        .and_then(|Query(pairs)| game_name(&pairs))
        .ok_or(GooferError::MissingParameter("gameName"))?;

    let cover_url = lookup_cover(state.upstreams.catalog.as_ref(), &name)
        .await?
        .into_value()
        .ok_or_else(|| GooferError::NotFound("game cover".into()))?;
    Ok(Json(CoverResponse { cover_url }))
}

/// First non-blank `gameName` value; repeats after it are ignored.
fn game_name(pairs: &[(String, String)]) -> Option<String> {
    pairs
        .iter()
        .filter(|(key, _)| key == "gameName")
        .map(|(_, value)| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
