use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    Res,
    config::Config,
    management::{PlaylistManager, PlaylistMode},
    spotify::auth::Authenticator,
    types::{PlaylistOutcome, PlaylistRequest, PlaylistResponse, PlaylistStatus},
};

pub const CREATED_MESSAGE: &str = "Playlist created successfully";
pub const NEW_PLAYLIST_MESSAGE: &str = "New playlist created successfully";
pub const UPDATED_MESSAGE: &str = "Tracks added to existing playlist";

/// POST /create-playlist
pub async fn create_playlist(
    State(config): State<Arc<Config>>,
    Json(request): Json<PlaylistRequest>,
) -> Res<Json<PlaylistResponse>> {
    let outcome = handle(config, &request, PlaylistMode::Create).await?;

    Ok(Json(PlaylistResponse {
        message: CREATED_MESSAGE.to_string(),
        playlist_url: outcome.playlist_url,
    }))
}

/// POST /create-or-update-playlist
pub async fn create_or_update_playlist(
    State(config): State<Arc<Config>>,
    Json(request): Json<PlaylistRequest>,
) -> Res<Json<PlaylistResponse>> {
    let outcome = handle(config, &request, PlaylistMode::CreateOrUpdate).await?;

    let message = match outcome.status {
        PlaylistStatus::Created => NEW_PLAYLIST_MESSAGE,
        PlaylistStatus::Updated => UPDATED_MESSAGE,
    };

    Ok(Json(PlaylistResponse {
        message: message.to_string(),
        playlist_url: outcome.playlist_url,
    }))
}

async fn handle(
    config: Arc<Config>,
    request: &PlaylistRequest,
    mode: PlaylistMode,
) -> Res<PlaylistOutcome> {
    let client = Authenticator::new(config).authenticate().await?;
    PlaylistManager::new(client).build(request, mode).await
}
