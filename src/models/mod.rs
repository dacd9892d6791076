use serde::{Deserialize, Serialize};

/// Body accepted by every POST endpoint.
#[derive(Debug, Deserialize)]
pub struct MediaRequest {
    pub url: String,
}

/// Metadata returned by the info endpoints, mapped from yt-dlp's JSON dump.
/// Missing duration defaults to 0; missing thumbnail/author to empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaInfo {
    pub title: String,
    pub duration: u64,
    pub thumbnail: String,
    pub author: String,
}

/// Renders a duration in seconds as `m:ss`, or `h:mm:ss` past the hour mark.
pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
