use crate::cache::{CacheAdapter, CacheController, ExpiresAfter, FileCache};
use crate::http::{ReqwestTransport, Session, Transport};
use crate::rate::{DEFAULT_MIN_INTERVAL, RateLimiter};
use crate::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_EXPIRES_AFTER: Duration = Duration::from_secs(28 * 86_400);

#[derive(Clone, Debug)]
pub struct HttpCacheOptions {
    dir:           Option<PathBuf>,
    expires_after: Duration,
    min_interval:  Duration,
}

impl Default for HttpCacheOptions {
    fn default() -> Self {
        Self {
            dir:           None,
            expires_after: DEFAULT_EXPIRES_AFTER,
            min_interval:  DEFAULT_MIN_INTERVAL,
        }
    }
}

impl HttpCacheOptions {
    pub fn new() -> Self { Self::default() }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// How long responses are considered fresh, whatever the server says.
    pub fn expires_after(mut self, expires_after: Duration) -> Self {
        self.expires_after = expires_after;
        self
    }

    /// Minimum spacing between requests that reach the network.
    pub fn min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }
}

/// A rate-limited session whose responses are cached on disk for an application.
#[derive(Clone, Debug)]
pub struct HttpCache {
    app_name:  String,
    cache_dir: PathBuf,
    session:   Session,
}

impl HttpCache {
    /// Cache under `<user cache dir>/<app_name>`, expiring after 28 days.
    pub fn new(app_name: &str) -> Result<Self> { Self::with_options(app_name, HttpCacheOptions::new()) }

    pub fn with_options(app_name: &str, options: HttpCacheOptions) -> Result<Self> {
        Self::with_transport(app_name, options, ReqwestTransport::new()?)
    }

    /// Like [`with_options`](Self::with_options) over a caller-supplied transport.
    pub fn with_transport(
        app_name: &str,
        options: HttpCacheOptions,
        transport: impl Transport + 'static,
    ) -> Result<Self> {
        apeye_platform::validate_app_name(app_name)?;
        let cache_dir = match options.dir {
            Some(dir) => dir,
            None => apeye_platform::app_cache_dir(app_name)?,
        };

        let controller = CacheController::new(FileCache::new(&cache_dir));
        let limiter = RateLimiter::named(app_name, options.min_interval);
        let adapter = CacheAdapter::rate_limited(transport, limiter, controller)
            .heuristic(ExpiresAfter::new(options.expires_after));
        debug!(app = app_name, dir = %cache_dir.display(), "opened HTTP cache");

        Ok(Self {
            app_name: app_name.to_string(),
            cache_dir,
            session: Session::with_transport(adapter),
        })
    }

    pub fn app_name(&self) -> &str { &self.app_name }

    pub fn cache_dir(&self) -> &Path { &self.cache_dir }

    pub fn session(&self) -> &Session { &self.session }

    /// Remove every cached response. Returns whether the directory existed.
    pub fn clear(&self) -> Result<bool> {
        let removed = apeye_fs::remove_dir_all_if_exists(&self.cache_dir)?;
        debug!(dir = %self.cache_dir.display(), removed, "cleared HTTP cache");
        Ok(removed)
    }
}
