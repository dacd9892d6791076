pub mod instagram;
pub mod youtube;

use axum::body::Body;
use axum::http::header;
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};
use crate::extract::{attachment_disposition, MediaStream};

/// GET / — liveness probe.
pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": format!("vidfetch-server {} is running", env!("CARGO_PKG_VERSION")),
    }))
}

/// Wraps an open media stream in a download response. The subprocess is
/// already running at this point, so any later failure truncates the body
/// rather than producing a JSON error.
pub(crate) fn stream_response(stream: MediaStream) -> AppResult<Response> {
    Response::builder()
        .header(header::CONTENT_TYPE, stream.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&stream.filename),
        )
        .body(Body::from_stream(ReaderStream::new(stream.stdout)))
        .map_err(|_| AppError::Internal)
}
