use thiserror::Error;

/// Errors raised by the media, subtitle and config plumbing.
///
/// Only `MediaLoad` and `UnsupportedFormat` are ever shown to the user (as a
/// transient notice). `SubtitleParse` is logged and swallowed by the parser.
#[derive(Debug, Error)]
pub enum TvError {
    #[error("{0}")]
    MediaLoad(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("Subtitle parse error: {0}")]
    SubtitleParse(String),

    #[error("Error loading subtitles: {0}")]
    SubtitleFetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TvError {
    /// Whether this error should reach the notice board.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, TvError::SubtitleParse(_))
    }
}

pub type TvResult<T> = std::result::Result<T, TvError>;
