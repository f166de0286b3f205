//! Where apeye keeps its caches.
//!
//! The root is `APEYE_CACHE_DIR` when set, otherwise the platform's per-user
//! cache directory. Each application gets one subdirectory.

mod dir;
mod error;

pub use dir::{CACHE_DIR_ENV, app_cache_dir, cache_root, user_cache, user_home, validate_app_name};
pub use error::{Error, Result};
