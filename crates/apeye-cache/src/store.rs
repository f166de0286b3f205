use crate::{Error, Result};
use apeye_fs::{AtomicWriteOptions, Transaction};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// One function's cached results, keyed by serialized arguments.
pub type Entries = BTreeMap<String, Value>;

/// Read a document. A missing or blank file is an empty document.
pub(crate) fn load(path: &Path) -> Result<Entries> {
    match apeye_fs::read_if_exists(path)? {
        Some(bytes) => parse(path, &bytes),
        None => Ok(Entries::new()),
    }
}

fn parse(path: &Path, bytes: &[u8]) -> Result<Entries> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Entries::new());
    }
    serde_json::from_slice(bytes).map_err(|source| Error::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn render(path: &Path, entries: &Entries) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(entries).map_err(|source| Error::Serialization {
        function: path.file_stem().unwrap_or_default().to_string_lossy().into_owned(),
        source,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Replace the document with `entries`.
pub(crate) fn write(path: &Path, entries: &Entries, options: AtomicWriteOptions) -> Result<()> {
    apeye_fs::atomic_write(path, &render(path, entries)?, options)?;
    Ok(())
}

/// Under the document's lock, fold in entries another writer added since
/// we loaded it, then write. Returns what was written.
pub(crate) fn write_locked(
    path: &Path,
    entries: &Entries,
    options: AtomicWriteOptions,
) -> Result<Entries> {
    if let Some(parent) = path.parent() {
        apeye_fs::ensure_dir(parent)?;
    }
    let tx = Transaction::open_locked(path)?.with_options(options);

    let mut merged = entries.clone();
    if let Some(bytes) = tx.read()? {
        for (key, value) in parse(path, &bytes)? {
            merged.entry(key).or_insert(value);
        }
    }

    tx.write(&render(path, &merged)?)?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn options() -> AtomicWriteOptions { AtomicWriteOptions::new().create_dirs(true) }

    #[test]
    fn test_missing_and_blank_documents_are_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f.json");
        assert!(load(&path).unwrap().is_empty());

        std::fs::write(&path, " \n\t").unwrap();
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_non_object_document_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(load(&path), Err(Error::Corrupt { .. })));
    }

    #[test]
    fn test_write_is_pretty_and_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/f.json");
        let entries: Entries = [("b".to_string(), json!(2)), ("a".to_string(), json!(1))].into();
        write(&path, &entries, options()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"a\": 1,\n  \"b\": 2\n}\n");
        assert_eq!(load(&path).unwrap(), entries);
    }

    #[test]
    fn test_write_locked_keeps_foreign_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f.json");
        std::fs::write(&path, r#"{"1": 2, "3": 99}"#).unwrap();

        let ours: Entries = [("3".to_string(), json!(6))].into();
        let merged = write_locked(&path, &ours, options()).unwrap();

        assert_eq!(merged.get("1"), Some(&json!(2)));
        assert_eq!(merged.get("3"), Some(&json!(6)));
        assert_eq!(load(&path).unwrap(), merged);
    }
}
