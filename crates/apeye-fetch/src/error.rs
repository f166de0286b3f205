use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url:    String,
        source: url::ParseError,
    },

    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("HTTP cache storage failed: {0}")]
    Storage(#[from] apeye_fs::Error),

    #[error("corrupt HTTP cache entry '{path}': {source}")]
    Corrupt {
        path:   PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Serializer(String),

    #[error("No serializer available for '{0}'.")]
    SerializerNotAvailable(String),

    #[error("Client Error 404: {url}")]
    HttpNotFound { url: String, content: Bytes },

    #[error("Client Error {status}: {url}")]
    HttpClient {
        status:  u16,
        url:     String,
        content: Bytes,
    },

    #[error("Server Error {status}: {url}")]
    HttpServer {
        status:  u16,
        url:     String,
        content: Bytes,
    },

    #[error("Could not resolve {url}: HTTP Status {status}")]
    Resolve { url: String, status: u16 },

    #[error("could not determine a user cache directory")]
    NoCacheDir,

    #[error("invalid cache name {0:?}")]
    InvalidName(String),
}

impl Error {
    /// Status code of an HTTP error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpNotFound { .. } => Some(404),
            Self::HttpClient { status, .. } | Self::HttpServer { status, .. } => Some(*status),
            Self::Resolve { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this is a 4xx reported by a [`SlumberUrl`](crate::SlumberUrl).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::HttpNotFound { .. } | Self::HttpClient { .. })
    }
}

impl From<apeye_platform::Error> for Error {
    fn from(err: apeye_platform::Error) -> Self {
        match err {
            apeye_platform::Error::NoCacheDir => Self::NoCacheDir,
            apeye_platform::Error::InvalidAppName(name) => Self::InvalidName(name),
        }
    }
}
