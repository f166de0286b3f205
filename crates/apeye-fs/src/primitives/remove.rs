use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Remove a file. Returns `false` if it did not exist.
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Remove a directory tree. Returns `false` if it did not exist.
pub fn remove_dir_all_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
