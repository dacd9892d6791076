use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStdout, Command};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{format_duration, MediaInfo};

/// Bound on the metadata calls so a hung tool cannot hang the request.
/// Streaming calls are bounded by the client connection instead: a closed
/// response drops the stdout pipe and the tool dies on its next write.
const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// Sanitized download names are capped at this many characters.
const MAX_NAME_CHARS: usize = 100;

/// Which flavor of stream a download endpoint requests from yt-dlp.
#[derive(Clone, Copy, Debug)]
pub enum StreamKind {
    /// Best video+audio remuxed into an MP4 container.
    Video,
    /// Best audio-only format, served as WebM.
    Audio,
    /// Best MP4-compatible single format (Instagram reels/posts).
    Reel,
}

impl StreamKind {
    fn format_args(self) -> &'static [&'static str] {
        match self {
            StreamKind::Video => &[
                "-f",
                "bestvideo+bestaudio/best",
                "--merge-output-format",
                "mp4",
            ],
            StreamKind::Audio => &["-f", "bestaudio"],
            StreamKind::Reel => &["-f", "best[ext=mp4]/best"],
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            StreamKind::Video | StreamKind::Reel => "video/mp4",
            StreamKind::Audio => "audio/webm",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            StreamKind::Video | StreamKind::Reel => "mp4",
            StreamKind::Audio => "webm",
        }
    }

    fn fallback_name(self) -> &'static str {
        match self {
            StreamKind::Video => "video",
            StreamKind::Audio => "audio",
            StreamKind::Reel => "reel",
        }
    }
}

/// A live download: the child's stdout plus the headers to tag it with.
pub struct MediaStream {
    pub filename: String,
    pub content_type: &'static str,
    pub stdout: ChildStdout,
}

/// Handle to the configured yt-dlp binary. Cheap to clone; each operation
/// spawns its own subprocess and owns it for the request's duration.
#[derive(Clone)]
pub struct YtDlp {
    bin: Arc<str>,
    metadata_timeout: Duration,
}

impl YtDlp {
    pub fn new(bin: impl Into<Arc<str>>) -> Self {
        Self {
            bin: bin.into(),
            metadata_timeout: METADATA_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_metadata_timeout(bin: impl Into<Arc<str>>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            metadata_timeout: timeout,
        }
    }

    /// Runs the tool in JSON-dump mode and maps the result to a `MediaInfo`.
    pub async fn fetch_info(&self, url: &str) -> AppResult<MediaInfo> {
        debug!(%url, "fetching media info");

        // kill_on_drop: a timeout drops the output future, and the hung
        // child must die with it instead of lingering.
        let output = tokio::time::timeout(
            self.metadata_timeout,
            Command::new(self.bin.as_ref())
                .args(["--dump-json", "--no-playlist", "--no-warnings"])
                .arg(url)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| {
            warn!(%url, "yt-dlp metadata fetch timed out");
            AppError::Extraction("Failed to fetch video info".into())
        })?
        .map_err(|e| {
            warn!(error = %e, "failed to launch yt-dlp");
            AppError::Extraction("Failed to fetch video info".into())
        })?;

        if !output.status.success() {
            warn!(
                code = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "yt-dlp metadata fetch failed"
            );
            return Err(AppError::Extraction("Failed to fetch video info".into()));
        }

        let json: Value = serde_json::from_slice(&output.stdout).map_err(|e| {
            warn!(error = %e, "yt-dlp produced unparsable JSON");
            AppError::Extraction("Failed to fetch video info".into())
        })?;

        let media_info = media_info_from_json(&json);
        info!(
            title = %media_info.title,
            duration = %format_duration(media_info.duration),
            "fetched media info"
        );
        Ok(media_info)
    }

    /// Best-effort title lookup used to name downloads. Failures and empty
    /// output both fall back to a generic per-kind name.
    async fn fetch_title(&self, url: &str) -> Option<String> {
        let output = tokio::time::timeout(
            self.metadata_timeout,
            Command::new(self.bin.as_ref())
                .args([
                    "--print",
                    "title",
                    "--skip-download",
                    "--no-playlist",
                    "--no-warnings",
                ])
                .arg(url)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .ok()?
        .ok()?;

        if !output.status.success() {
            debug!(
                stderr = %String::from_utf8_lossy(&output.stderr),
                "title fetch failed, falling back to generic name"
            );
            return None;
        }

        let title = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }

    /// Resolves a display name, then spawns the tool streaming to stdout.
    /// The returned stdout handle becomes the HTTP response body; a
    /// background task drains stderr into the log and reaps the child when
    /// it exits.
    pub async fn open_stream(&self, url: &str, kind: StreamKind) -> AppResult<MediaStream> {
        let title = self
            .fetch_title(url)
            .await
            .unwrap_or_else(|| kind.fallback_name().to_string());

        let mut name = sanitize_name(&title);
        if name.is_empty() {
            name = kind.fallback_name().to_string();
        }

        info!(%url, kind = ?kind, name = %name, "starting media stream");

        let mut child = Command::new(self.bin.as_ref())
            .args(kind.format_args())
            .args(["-o", "-", "--no-playlist", "--no-warnings"])
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                warn!(error = %e, "failed to launch yt-dlp for streaming");
                AppError::Extraction("Failed to start download".into())
            })?;

        let stdout = child.stdout.take().ok_or(AppError::Internal)?;
        let stderr = child.stderr.take();

        tokio::spawn(async move {
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!("yt-dlp: {line}");
                }
            }
            // Reap the child. If the client disconnected, the stdout pipe is
            // already closed and the tool exits on its next write.
            match child.wait().await {
                Ok(status) if status.success() => debug!("yt-dlp stream finished"),
                Ok(status) => {
                    warn!(code = ?status.code(), "yt-dlp exited with error during streaming")
                }
                Err(e) => warn!(error = %e, "failed to wait on yt-dlp"),
            }
        });

        Ok(MediaStream {
            filename: format!("{}.{}", name, kind.extension()),
            content_type: kind.content_type(),
            stdout,
        })
    }
}

/// Maps yt-dlp's JSON dump onto `MediaInfo` with the documented defaults.
pub fn media_info_from_json(json: &Value) -> MediaInfo {
    MediaInfo {
        title: json["title"].as_str().unwrap_or("Unknown Title").to_string(),
        duration: json["duration"].as_f64().map(|d| d as u64).unwrap_or(0),
        thumbnail: json["thumbnail"].as_str().unwrap_or("").to_string(),
        author: json["uploader"]
            .as_str()
            .or_else(|| json["channel"].as_str())
            .unwrap_or("")
            .to_string(),
    }
}

/// Strips everything outside ASCII word/space/hyphen characters and caps the
/// result at 100 characters. Callers substitute a generic name if nothing
/// survives.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .take(MAX_NAME_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Builds the `Content-Disposition` value for a download, percent-encoding
/// the filename so the client can read it back verbatim.
pub fn attachment_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", urlencoding::encode(filename))
}
