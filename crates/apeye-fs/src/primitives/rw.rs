use crate::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Debug, Default)]
pub struct AtomicWriteOptions {
    pub sync:        bool,
    pub create_dirs: bool,
}

impl AtomicWriteOptions {
    pub fn new() -> Self { Self::default() }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Create missing parent directories before writing.
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}

fn tmp_path_for(parent: &Path, path: &Path) -> PathBuf {
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    parent.join(format!(".{file_name}.{}.{n}.tmp", std::process::id()))
}

/// Write `content` to `path` through a sibling temporary file and a rename,
/// so readers see either the old or the new content, never a mix.
pub fn atomic_write(
    path: impl AsRef<Path>,
    content: &[u8],
    options: AtomicWriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => {
            return Err(Error::NoParent {
                path: path.to_path_buf(),
            });
        }
    };

    if options.create_dirs {
        fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let tmp_path = tmp_path_for(parent, path);

    let write_tmp = || -> io::Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content)?;
        if options.sync {
            file.sync_all()?;
        }
        Ok(())
    };

    if let Err(e) = write_tmp() {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::Write {
            path: tmp_path,
            source: e,
        });
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    Ok(())
}

/// Read `path` whole. A missing file is `Ok(None)`.
pub fn read_if_exists(path: impl AsRef<Path>) -> Result<Option<Vec<u8>>> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
