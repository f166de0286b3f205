//! Filesystem primitives for apeye's on-disk caches.
//!
//! # Architecture
//!
//! - [`primitives`] - stateless helpers: atomic write, tolerant read and removal
//! - [`workflow`] - [`Transaction`], an advisory-locked read/modify/write scope
//!
//! Every error carries the path it concerns.

mod error;
pub mod primitives;
pub mod workflow;

pub use error::{Error, Result};
pub use primitives::{
    AtomicWriteOptions, atomic_write, ensure_dir, read_if_exists,
    remove_dir_all_if_exists, remove_file_if_exists,
};
pub use workflow::{Transaction, lock_path_for};
