use axum::extract::State;
use axum::response::Response;
use axum::Json;

use super::stream_response;
use crate::error::{AppError, AppResult};
use crate::extract::StreamKind;
use crate::models::{MediaInfo, MediaRequest};
use crate::state::AppState;
use crate::validate::is_valid_youtube_url;

fn require_valid(url: &str) -> AppResult<()> {
    if is_valid_youtube_url(url) {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid YouTube URL".into()))
    }
}

/// POST /api/info — fetch title/duration/thumbnail/author for a video.
pub async fn info(
    State(state): State<AppState>,
    Json(req): Json<MediaRequest>,
) -> AppResult<Json<MediaInfo>> {
    require_valid(&req.url)?;
    let media_info = state.ytdlp.fetch_info(&req.url).await?;
    Ok(Json(media_info))
}

/// POST /api/download/video — stream best video+audio remuxed to MP4.
pub async fn download_video(
    State(state): State<AppState>,
    Json(req): Json<MediaRequest>,
) -> AppResult<Response> {
    require_valid(&req.url)?;
    let stream = state.ytdlp.open_stream(&req.url, StreamKind::Video).await?;
    stream_response(stream)
}

/// POST /api/download/audio — stream the best audio-only format.
pub async fn download_audio(
    State(state): State<AppState>,
    Json(req): Json<MediaRequest>,
) -> AppResult<Response> {
    require_valid(&req.url)?;
    let stream = state.ytdlp.open_stream(&req.url, StreamKind::Audio).await?;
    stream_response(stream)
}
