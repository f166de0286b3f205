//! Path-like URLs, disk memoization and a rate-limited HTTP cache.
//!
//! This crate re-exports the workspace members under one name:
//!
//! - [`url`] - [`Url`], [`UrlPath`], [`Query`] and [`Domain`]
//! - [`cache`] - [`Cache`], a per-application JSON memoization cache
//! - [`fetch`] - [`HttpCache`], [`RequestsUrl`], [`SlumberUrl`] and the
//!   [`RateLimiter`] they share
//!
//! ```no_run
//! use apeye::{HttpCache, RequestsUrl};
//!
//! # async fn run() -> apeye::fetch::Result<()> {
//! let cache = HttpCache::new("demo")?;
//! let api = RequestsUrl::with_session("https://api.github.com", cache.session().clone());
//! let user = (&api / "users" / "domdfcoding").get(None).await?;
//! println!("{}", user.text());
//! # Ok(())
//! # }
//! ```

pub use apeye_cache as cache;
pub use apeye_fetch as fetch;
pub use apeye_platform as platform;
pub use apeye_url as url;

pub use apeye_cache::{Cache, CacheOptions, Memoized};
pub use apeye_fetch::{
    HttpCache, HttpCacheOptions, RateLimiter, RequestsUrl, Session, SlumberOptions, SlumberUrl, rate_limit,
};
pub use apeye_url::{Domain, Query, Url, UrlPath};
