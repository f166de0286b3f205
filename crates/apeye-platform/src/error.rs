use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not determine a user cache directory")]
    NoCacheDir,

    #[error("invalid application name: {0:?}")]
    InvalidAppName(String),
}
