//! `/api/twitch/*` — channel data for the configured broadcaster.

use crate::{AppState, error::ApiError};
use axum::{Json, extract::State};
use goofer_types::{Clip, StreamInfo, Video};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct StreamResponse {
    pub live: bool,
    pub stream: Option<StreamInfo>,
}

#[derive(Debug, Serialize)]
pub struct ClipsResponse {
    pub clips: Vec<Clip>,
}

#[derive(Debug, Serialize)]
pub struct VideosResponse {
    pub videos: Vec<Video>,
}

#[derive(Debug, Serialize)]
pub struct FollowersResponse {
    pub total: u64,
}

pub(crate) async fn stream(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StreamResponse>, ApiError> {
    let user_id = state.broadcaster_id().await?;
    let stream = state.upstreams.channel.stream(user_id).await?;
    Ok(Json(StreamResponse {
        live: stream.is_some(),
        stream,
    }))
}

pub(crate) async fn clips(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClipsResponse>, ApiError> {
    let user_id = state.broadcaster_id().await?;
    let mut clips = state.upstreams.channel.clips(user_id).await?;

    let ids: Vec<String> = clips.iter().map(|c| c.game_id.clone()).collect();
    // Names are decoration; the clips are still useful without them.
    match state.upstreams.channel.game_names(&ids).await {
        Ok(names) => {
            for clip in &mut clips {
                clip.game_name = names.get(&clip.game_id).cloned();
            }
        }
        Err(err) => tracing::warn!(error = %err, "failed to resolve clip game names"),
    }
    Ok(Json(ClipsResponse { clips }))
}

pub(crate) async fn videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VideosResponse>, ApiError> {
    let user_id = state.broadcaster_id().await?;
    let videos = state.upstreams.channel.videos(user_id).await?;
    Ok(Json(VideosResponse { videos }))
}

pub(crate) async fn followers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FollowersResponse>, ApiError> {
    let user_id = state.broadcaster_id().await?;
    let total = state
        .upstreams
        .channel
        .follower_total(user_id, &state.channel)
        .await?;
    Ok(Json(FollowersResponse { total }))
}
