//! Rate-limited, caching HTTP for apeye.
//!
//! # Architecture
//!
//! - [`http`] - [`Request`], [`Response`], the [`Transport`] trait and [`Session`]
//! - [`rate`] - [`RateLimiter`] and the [`rate_limit`] function wrapper
//! - [`cache`] - [`CacheController`] over a [`CacheStorage`], wrapped as a
//!   transport by [`CacheAdapter`]; [`RateLimitAdapter`] limits only the
//!   requests that miss the cache
//! - [`HttpCache`] - a per-application on-disk cache with a ready-made session
//! - [`RequestsUrl`] and [`SlumberUrl`] - [`Url`](apeye_url::Url)s that send requests
//!
//! Transports are layered: `Session -> CacheAdapter -> RateLimitedTransport -> ReqwestTransport`.

pub mod cache;
mod error;
pub mod http;
mod http_cache;
pub mod rate;
mod requests_url;
pub mod slumber;

pub use cache::{
    CacheAdapter, CacheControl, CacheController, CacheStorage, CachedResponse, DictCache, ExpiresAfter,
    FileCache, Heuristic, RateLimitAdapter, RateLimitedTransport,
};
pub use error::{Error, Result};
pub use http::{Body, Method, ReqwestTransport, Request, Response, Session, StatusCode, Transport};
pub use http_cache::{DEFAULT_EXPIRES_AFTER, HttpCache, HttpCacheOptions};
pub use rate::{RateLimited, RateLimiter, rate_limit};
pub use requests_url::RequestsUrl;
pub use slumber::{SerializerRegistry, SlumberOptions, SlumberUrl};
