//! Disk-backed memoization of function results.
//!
//! A [`Cache`] belongs to one application and lives in
//! `<user cache dir>/<app name>/`. Each function registered with
//! [`Cache::function`] gets its own `<name>.json` document mapping the
//! JSON of its arguments to the JSON of its result.
//!
//! ```no_run
//! use apeye_cache::Cache;
//!
//! # fn main() -> apeye_cache::Result<()> {
//! let cache = Cache::new("demo")?;
//! let square = cache.function("square", |x: u64| x * x)?;
//! assert_eq!(square.call(12)?, 144);
//! assert_eq!(square.call(12)?, 144); // read from square.json
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`key`] - argument serialization into stable document keys
//! - `store` - reading, writing and lock-merging documents through `apeye-fs`
//! - [`Cache`] / [`Memoized`] - in-memory documents shared by clones, flushed on every miss
//!
//! Hits never touch the disk. Writers in different processes are
//! last-writer-wins unless [`CacheOptions::lock`] is set.

mod cache;
mod error;
pub mod key;
mod options;
mod store;

pub use cache::{Cache, Memoized};
pub use error::{Error, Result};
pub use key::derive_key;
pub use options::CacheOptions;
pub use store::Entries;
