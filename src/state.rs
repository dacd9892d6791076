use crate::extract::YtDlp;

/// Shared application state passed to all handlers. The extractor handle is
/// resolved once at startup rather than re-reading the environment on every
/// request.
#[derive(Clone)]
pub struct AppState {
    pub ytdlp: YtDlp,
}
