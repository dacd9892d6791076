// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use vidfetch_server::{extract::YtDlp, state::AppState};

pub const VALID_YOUTUBE_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
pub const VALID_INSTAGRAM_URL: &str = "https://www.instagram.com/reel/Cabc123xyz/";

/// Bytes the fake tool writes on a download invocation.
pub const FAKE_MEDIA_BYTES: &[u8] = b"FAKE MEDIA BYTES";

/// Fake yt-dlp that answers all three invocation shapes: JSON dump, title
/// print, and streaming download.
pub const OK_SCRIPT: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --dump-json)
      echo '{"title":"Test Video","duration":65,"thumbnail":"https://i.ytimg.com/vi/abc/hq.jpg","uploader":"Test Channel"}'
      exit 0
      ;;
    --print)
      echo 'Test Video'
      exit 0
      ;;
  esac
done
printf 'FAKE MEDIA BYTES'
"#;

/// Fake yt-dlp that fails every invocation.
pub const FAIL_SCRIPT: &str = r#"#!/bin/sh
echo 'ERROR: This video is unavailable' >&2
exit 1
"#;

/// Fake yt-dlp whose title lookup fails but whose download succeeds, to
/// exercise the generic-filename fallback.
pub const NO_TITLE_SCRIPT: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --print)
      echo 'ERROR: no title' >&2
      exit 1
      ;;
  esac
done
printf 'FAKE MEDIA BYTES'
"#;

/// Writes `script` as an executable `yt-dlp` inside `dir` and returns its
/// path. The TempDir must outlive the app using the script.
pub fn write_fake_ytdlp(dir: &TempDir, script: &str) -> String {
    let path = dir.path().join("yt-dlp");
    std::fs::write(&path, script).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    path.to_string_lossy().into_owned()
}

/// Build the served application router wired to the given yt-dlp binary, so
/// tests exercise the same routes and middleware as `main`.
pub fn create_test_app(ytdlp_bin: &str) -> Router {
    vidfetch_server::app(AppState {
        ytdlp: YtDlp::new(ytdlp_bin),
    })
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = post_raw(app, uri, body).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// POST returning the raw response so download tests can inspect headers and
/// body bytes.
pub async fn post_raw(app: Router, uri: &str, body: Value) -> axum::response::Response {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(req).await.unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
