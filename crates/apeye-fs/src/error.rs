use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("failed to lock '{path}': {source}")]
    Lock { path: PathBuf, source: io::Error },

    #[error("'{path}' has no parent directory")]
    NoParent { path: PathBuf },
}

impl Error {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Remove { path, .. }
            | Self::Lock { path, .. }
            | Self::NoParent { path } => path,
        }
    }

    /// The underlying I/O error, if there is one.
    pub fn io(&self) -> Option<&io::Error> {
        match self {
            Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Remove { source, .. }
            | Self::Lock { source, .. } => Some(source),
            Self::NoParent { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
