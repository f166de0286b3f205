use crate::{Error, Result};
use std::env;
use std::path::{Component, Path, PathBuf};

/// Overrides the cache root for every apeye cache.
pub const CACHE_DIR_ENV: &str = "APEYE_CACHE_DIR";

pub fn user_home() -> Option<PathBuf> { home::home_dir() }

pub fn user_cache() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("LOCALAPPDATA").map(|p| PathBuf::from(p).join("Cache"))
    }
    #[cfg(target_os = "macos")]
    {
        user_home().map(|p| p.join("Library/Caches"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        env::var_os("XDG_CACHE_HOME")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| user_home().map(|p| p.join(".cache")))
    }
}

pub fn cache_root() -> Result<PathBuf> {
    env::var_os(CACHE_DIR_ENV)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(user_cache)
        .ok_or(Error::NoCacheDir)
}

/// An app name must be exactly one normal path component.
pub fn validate_app_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == name => Ok(()),
        _ => Err(Error::InvalidAppName(name.to_string())),
    }
}

pub fn app_cache_dir(app_name: &str) -> Result<PathBuf> {
    validate_app_name(app_name)?;
    Ok(cache_root()?.join(app_name))
}
