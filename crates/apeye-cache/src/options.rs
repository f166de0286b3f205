use apeye_fs::AtomicWriteOptions;
use std::path::PathBuf;

#[derive(Clone, Debug, Default)]
pub struct CacheOptions {
    pub(crate) dir:  Option<PathBuf>,
    pub(crate) sync: bool,
    pub(crate) lock: bool,
}

impl CacheOptions {
    pub fn new() -> Self { Self::default() }

    /// Use `dir` as the cache directory instead of `<user cache>/<app name>`.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// fsync each document before it replaces the old one.
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Serialize writers across processes and merge their entries.
    ///
    /// Without this, concurrent writers to the same function's document are
    /// last-writer-wins: entries added by the other writer may be lost,
    /// though the file is never left half-written.
    pub fn lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub(crate) fn write_options(&self) -> AtomicWriteOptions {
        AtomicWriteOptions::new().create_dirs(true).sync(self.sync)
    }
}
