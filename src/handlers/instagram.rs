use axum::extract::State;
use axum::response::Response;
use axum::Json;

use super::stream_response;
use crate::error::{AppError, AppResult};
use crate::extract::StreamKind;
use crate::models::{MediaInfo, MediaRequest};
use crate::state::AppState;
use crate::validate::is_valid_instagram_url;

fn require_valid(url: &str) -> AppResult<()> {
    if is_valid_instagram_url(url) {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid Instagram URL".into()))
    }
}

/// POST /api/instagram/info — metadata for a reel or post.
pub async fn info(
    State(state): State<AppState>,
    Json(req): Json<MediaRequest>,
) -> AppResult<Json<MediaInfo>> {
    require_valid(&req.url)?;
    let media_info = state.ytdlp.fetch_info(&req.url).await?;
    Ok(Json(media_info))
}

/// POST /api/instagram/download — stream the best MP4-compatible format.
pub async fn download(
    State(state): State<AppState>,
    Json(req): Json<MediaRequest>,
) -> AppResult<Response> {
    require_valid(&req.url)?;
    let stream = state.ytdlp.open_stream(&req.url, StreamKind::Reel).await?;
    stream_response(stream)
}
