use url::Url;

/// Submitted URLs longer than this are rejected outright.
pub const MAX_URL_LEN: usize = 200;

const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com", "youtu.be"];
const INSTAGRAM_HOSTS: &[&str] = &["instagram.com", "www.instagram.com"];

/// Returns `true` only for well-formed http(s) URLs on an allow-listed
/// YouTube host. Query parameters are not inspected.
pub fn is_valid_youtube_url(raw: &str) -> bool {
    if raw.len() >= MAX_URL_LEN {
        return false;
    }
    let Ok(parsed) = Url::parse(raw) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    matches!(parsed.host_str(), Some(host) if YOUTUBE_HOSTS.contains(&host))
}

/// Returns `true` only for Instagram post or reel URLs on the apex or `www`
/// host.
pub fn is_valid_instagram_url(raw: &str) -> bool {
    if raw.len() >= MAX_URL_LEN {
        return false;
    }
    let Ok(parsed) = Url::parse(raw) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    if !matches!(parsed.host_str(), Some(host) if INSTAGRAM_HOSTS.contains(&host)) {
        return false;
    }
    let path = parsed.path();
    path.starts_with("/reel/") || path.starts_with("/p/")
}
