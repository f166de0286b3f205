use crate::key::{derive_key, to_value};
use crate::options::CacheOptions;
use crate::store::{self, Entries};
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// A per-application cache of function results.
///
/// Each memoized function owns `<cache_dir>/<name>.json`, a JSON object
/// mapping serialized arguments to serialized results. Clones share the
/// same in-memory documents.
#[derive(Clone)]
pub struct Cache {
    inner: Arc<Inner>,
}

struct Inner {
    app_name:  String,
    cache_dir: PathBuf,
    options:   CacheOptions,
    documents: Mutex<HashMap<String, Entries>>,
}

impl Cache {
    /// A cache under `<user cache dir>/<app_name>`, creating the directory.
    pub fn new(app_name: &str) -> Result<Self> { Self::with_options(app_name, CacheOptions::new()) }

    pub fn with_options(app_name: &str, options: CacheOptions) -> Result<Self> {
        apeye_platform::validate_app_name(app_name)?;
        let cache_dir = match &options.dir {
            Some(dir) => dir.clone(),
            None => apeye_platform::app_cache_dir(app_name)?,
        };
        apeye_fs::ensure_dir(&cache_dir)?;
        debug!(app = app_name, dir = %cache_dir.display(), "opened cache");

        Ok(Self {
            inner: Arc::new(Inner {
                app_name: app_name.to_string(),
                cache_dir,
                options,
                documents: Mutex::new(HashMap::new()),
            }),
        })
    }

    pub fn app_name(&self) -> &str { &self.inner.app_name }

    pub fn cache_dir(&self) -> &Path { &self.inner.cache_dir }

    /// Path of the document backing function `name`.
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.inner.cache_dir.join(format!("{name}.json"))
    }

    /// Register `f` under `name`, loading any results already on disk.
    ///
    /// Registering the same name twice shares one document.
    pub fn function<A, R, F>(&self, name: &str, f: F) -> Result<Memoized<A, R, F>>
    where
        A: Serialize,
        R: Serialize + DeserializeOwned,
        F: Fn(A) -> R,
    {
        validate_name(name)?;
        let mut documents = self.documents();
        self.document(&mut documents, name)?;

        Ok(Memoized {
            cache: self.clone(),
            name: name.to_string(),
            f,
            _marker: PhantomData,
        })
    }

    /// Results stored on disk for `name`.
    pub fn entries(&self, name: &str) -> Result<Entries> {
        validate_name(name)?;
        store::load(&self.document_path(name))
    }

    /// Names of functions with a document in the cache directory.
    pub fn functions(&self) -> Result<Vec<String>> {
        let dir = &self.inner.cache_dir;
        let read_dir = match std::fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(apeye_fs::Error::Read {
                    path: dir.clone(),
                    source,
                }
                .into());
            }
        };

        let mut names: Vec<String> = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Drop every function's results, on disk and in memory.
    ///
    /// Returns whether the cache directory existed.
    pub fn clear(&self) -> Result<bool> {
        let mut documents = self.documents();
        documents.clear();
        let removed = apeye_fs::remove_dir_all_if_exists(&self.inner.cache_dir)?;
        debug!(dir = %self.inner.cache_dir.display(), removed, "cleared cache");
        Ok(removed)
    }

    /// Drop the results of function `name`. Returns whether a document existed.
    pub fn clear_function(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        let mut documents = self.documents();
        documents.remove(name);

        let path = self.document_path(name);
        let removed = apeye_fs::remove_file_if_exists(&path)?;
        apeye_fs::remove_file_if_exists(apeye_fs::lock_path_for(&path))?;
        debug!(function = name, removed, "cleared function");
        Ok(removed)
    }

    fn documents(&self) -> MutexGuard<'_, HashMap<String, Entries>> {
        self.inner
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The in-memory document for `name`, read from disk on first use.
    fn document<'a>(
        &self,
        documents: &'a mut HashMap<String, Entries>,
        name: &str,
    ) -> Result<&'a mut Entries> {
        match documents.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let entries = store::load(&self.document_path(name))?;
                debug!(function = name, entries = entries.len(), "loaded document");
                Ok(entry.insert(entries))
            }
        }
    }

    fn lookup(&self, name: &str, key: &str) -> Result<Option<Value>> {
        let mut documents = self.documents();
        let document = self.document(&mut documents, name)?;
        Ok(document.get(key).cloned())
    }

    /// Insert one result and persist the whole document. On failure the
    /// in-memory document is left as it was.
    fn store(&self, name: &str, key: String, value: Value) -> Result<()> {
        let path = self.document_path(name);
        let write_options = self.inner.options.write_options();

        let mut documents = self.documents();
        let document = self.document(&mut documents, name)?;
        let previous = document.insert(key.clone(), value);

        let flushed = if self.inner.options.lock {
            store::write_locked(&path, document, write_options).map(|merged| *document = merged)
        } else {
            store::write(&path, document, write_options)
        };

        if let Err(err) = flushed {
            warn!(function = name, %key, error = %err, "failed to persist result");
            match previous {
                Some(previous) => document.insert(key, previous),
                None => document.remove(&key),
            };
            return Err(err);
        }
        debug!(function = name, %key, entries = document.len(), "flushed document");
        Ok(())
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("app_name", &self.inner.app_name)
            .field("cache_dir", &self.inner.cache_dir)
            .finish_non_exhaustive()
    }
}

/// A function name is a single path component not starting with `.`.
fn validate_name(name: &str) -> Result<()> {
    if name.starts_with('.') {
        return Err(Error::InvalidName(name.to_string()));
    }
    apeye_platform::validate_app_name(name).map_err(|_| Error::InvalidName(name.to_string()))
}

/// A function whose results are read from and written to a [`Cache`].
pub struct Memoized<A, R, F> {
    cache:   Cache,
    name:    String,
    f:       F,
    _marker: PhantomData<fn(A) -> R>,
}

impl<A, R, F> Memoized<A, R, F>
where
    A: Serialize,
    R: Serialize + DeserializeOwned,
    F: Fn(A) -> R,
{
    pub fn name(&self) -> &str { &self.name }

    pub fn cache(&self) -> &Cache { &self.cache }

    /// Return the stored result for `args`, or run the function and store
    /// what it returns. A `null` result is returned but never stored.
    pub fn call(&self, args: A) -> Result<R> {
        let key = derive_key(&args).map_err(|source| Error::KeyDerivation {
            function: self.name.clone(),
            source,
        })?;

        if let Some(value) = self.cache.lookup(&self.name, &key)? {
            debug!(function = %self.name, %key, "cache hit");
            return serde_json::from_value(value).map_err(|source| Error::Decode {
                function: self.name.clone(),
                key,
                source,
            });
        }

        debug!(function = %self.name, %key, "cache miss");
        let result = (self.f)(args);
        let value = to_value(&result).map_err(|source| Error::Serialization {
            function: self.name.clone(),
            source,
        })?;

        if !value.is_null() {
            self.cache.store(&self.name, key, value)?;
        }
        Ok(result)
    }
}

impl<A, R, F> fmt::Debug for Memoized<A, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.name)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
