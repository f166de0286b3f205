use crate::primitives::{AtomicWriteOptions, atomic_write, read_if_exists};
use crate::{Error, Result};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Exclusive access to a file, coordinated through an advisory lock on a
/// sidecar `<file>.lock`.
///
/// [`atomic_write`] replaces the target's inode on every write, so the lock
/// never lives on the target itself. Only processes that also go through
/// `Transaction` are excluded.
pub struct Transaction {
    lock:      File,
    lock_path: PathBuf,
    path:      PathBuf,
    options:   AtomicWriteOptions,
}

pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

impl Transaction {
    fn open(lock_path: &Path) -> Result<File> {
        File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|e| Error::Lock {
                path: lock_path.to_path_buf(),
                source: e,
            })
    }

    /// Block until the lock for `path` is held.
    pub fn open_locked(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_path = lock_path_for(&path);
        let lock = Self::open(&lock_path)?;

        lock.lock_exclusive().map_err(|e| Error::Lock {
            path: lock_path.clone(),
            source: e,
        })?;
        tracing::trace!(path = %path.display(), "acquired lock");

        Ok(Self {
            lock,
            lock_path,
            path,
            options: AtomicWriteOptions::new(),
        })
    }

    pub fn with_options(mut self, options: AtomicWriteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn lock_path(&self) -> &Path { &self.lock_path }

    /// Current content of the guarded file, `None` if it does not exist yet.
    pub fn read(&self) -> Result<Option<Vec<u8>>> { read_if_exists(&self.path) }

    pub fn write(&self, data: &[u8]) -> Result<()> { atomic_write(&self.path, data, self.options) }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.lock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_transaction_lock() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let tx = Transaction::open_locked(&path).unwrap();
        assert!(tx.read().unwrap().is_none());
        tx.write(b"{}").unwrap();
        assert_eq!(tx.read().unwrap().as_deref(), Some(&b"{}"[..]));
        assert_eq!(tx.lock_path(), dir.path().join("store.json.lock"));
    }

    #[test]
    fn test_lock_is_released_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let held = Transaction::open_locked(&path).unwrap();

        let other = File::open(lock_path_for(&path)).unwrap();
        assert!(other.try_lock_exclusive().is_err());
        drop(held);
        other.try_lock_exclusive().unwrap();
        FileExt::unlock(&other).unwrap();
    }
}
