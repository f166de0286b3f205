use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Raised by `with_name`/`with_suffix` on a path without a final component.
    #[error("{0} has an empty name")]
    EmptyName(String),

    #[error("invalid name {0:?}")]
    InvalidName(String),

    #[error("invalid suffix {0:?}")]
    InvalidSuffix(String),

    #[error("{path} does not start with {base}")]
    NotRelative { path: String, base: String },

    #[error("'Url::relative_to' cannot be used with relative UrlPath objects")]
    RelativePath,
}
