//! HTTP response caching: directive parsing, storage, heuristics and the
//! controller that ties them to a [`Transport`](crate::Transport).

mod adapter;
mod control;
mod controller;
mod entry;
mod heuristic;
pub(crate) mod httpdate;
mod storage;

pub use adapter::{CacheAdapter, RateLimitAdapter, RateLimitedTransport};
pub use control::CacheControl;
pub use controller::{CACHEABLE_STATUSES, CacheController};
pub use entry::CachedResponse;
pub use heuristic::{ExpiresAfter, Heuristic};
pub use storage::{CacheStorage, DictCache, FileCache};
