//! JSON output and atomic file writes.

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `bytes` to `path` through a temp file in the same directory, so a
/// failed write never leaves a truncated file behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Pretty-print `value` as JSON and write it atomically.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    write_atomic(path, &bytes)
}

/// Write every record as one JSON array, even when there are none.
pub fn export_json(records: &[Value], path: &Path) -> Result<()> {
    write_json_atomic(path, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_export_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inv.json");
        export_json(&[json!({"name": "vm1"}), json!({"name": "vm2"})], &path).unwrap();

        let back: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, json!([{"name": "vm1"}, {"name": "vm2"}]));
    }

    #[test]
    fn test_export_json_empty_is_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.json");
        export_json(&[], &path).unwrap();

        let back: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, json!([]));
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.json");
        std::fs::write(&path, "old contents that are longer").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_atomic_missing_dir_fails_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("file.json");
        assert!(write_atomic(&path, b"[]").is_err());
        assert!(!path.exists());
    }
}
