use super::CachedResponse;
use crate::{Error, Result};
use apeye_fs::AtomicWriteOptions;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Where the controller keeps responses, keyed by normalized URL.
pub trait CacheStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CachedResponse>>;

    fn set(&self, key: &str, entry: &CachedResponse) -> Result<()>;

    fn delete(&self, key: &str) -> Result<()>;
}

/// In-memory storage.
#[derive(Debug, Default)]
pub struct DictCache {
    entries: Mutex<HashMap<String, CachedResponse>>,
}

impl DictCache {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries().len() }

    pub fn is_empty(&self) -> bool { self.entries().is_empty() }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, CachedResponse>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheStorage for DictCache {
    fn get(&self, key: &str) -> Result<Option<CachedResponse>> { Ok(self.entries().get(key).cloned()) }

    fn set(&self, key: &str, entry: &CachedResponse) -> Result<()> {
        self.entries().insert(key.to_string(), entry.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

/// One JSON file per entry under `dir`, named by the SHA-256 of the key and
/// fanned out over five single-character directories.
///
/// Directories are created on first write.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir:     PathBuf,
    options: AtomicWriteOptions,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir:     dir.into(),
            options: AtomicWriteOptions::new().create_dirs(true),
        }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let digest = hex::encode(Sha256::digest(key.as_bytes()));
        let mut path = self.dir.clone();
        for c in digest.chars().take(5) {
            path.push(c.to_string());
        }
        path.push(digest);
        path
    }
}

impl CacheStorage for FileCache {
    fn get(&self, key: &str) -> Result<Option<CachedResponse>> {
        let path = self.path_for(key);
        let Some(bytes) = apeye_fs::read_if_exists(&path)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| Error::Corrupt { path, source })
    }

    fn set(&self, key: &str, entry: &CachedResponse) -> Result<()> {
        let bytes = serde_json::to_vec(entry)?;
        apeye_fs::atomic_write(self.path_for(key), &bytes, self.options)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        apeye_fs::remove_file_if_exists(self.path_for(key))?;
        Ok(())
    }
}
