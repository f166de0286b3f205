use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot serialize the result of '{function}': {source}")]
    Serialization {
        function: String,
        source:   serde_json::Error,
    },

    #[error("cannot derive a cache key for '{function}': {source}")]
    KeyDerivation {
        function: String,
        source:   serde_json::Error,
    },

    #[error("cached value of '{function}' for {key} does not fit the return type: {source}")]
    Decode {
        function: String,
        key:      String,
        source:   serde_json::Error,
    },

    #[error("cache storage failed: {0}")]
    Storage(#[from] apeye_fs::Error),

    #[error("corrupt cache document '{path}': {source}")]
    Corrupt {
        path:   PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid cache name {0:?}")]
    InvalidName(String),

    #[error("could not determine a user cache directory")]
    NoCacheDir,
}

impl Error {
    /// Whether the backing file was unreadable, unwritable or corrupt.
    pub fn is_storage(&self) -> bool { matches!(self, Self::Storage(_) | Self::Corrupt { .. }) }
}

impl From<apeye_platform::Error> for Error {
    fn from(err: apeye_platform::Error) -> Self {
        match err {
            apeye_platform::Error::NoCacheDir => Self::NoCacheDir,
            apeye_platform::Error::InvalidAppName(name) => Self::InvalidName(name),
        }
    }
}
