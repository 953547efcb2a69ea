use thiserror::Error;

/// Failures the tagging pipeline can classify.
///
/// Everything else (IO, tag container errors) travels as `anyhow::Error`
/// with context attached at the call site.
#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("Failed to find the song on Genius for query '{query}'")]
    SongNotFound { query: String },

    #[error("No song ID in page {url}")]
    NoSongId { url: String },

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Missing field in API response: {0}")]
    MissingField(&'static str),

    #[error("Unsupported audio container: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, TaggerError>;
