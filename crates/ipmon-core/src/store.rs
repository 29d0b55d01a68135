//! Snapshot persistence — trait + JSON file implementation.
//!
//! The snapshot is stored as a single JSON object:
//! ```text
//! { "hostname": "<string>", "ips": ["<string>", ...] }
//! ```
//! Saving overwrites the file in place; there is no locking and no
//! write-then-rename, so a crash mid-write can leave a truncated file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::snapshot::Snapshot;

/// Trait for snapshot persistence backends.
pub trait SnapshotStore {
    /// Load the last saved snapshot. `StoreError::NotFound` means nothing
    /// has been saved yet.
    fn load(&self) -> Result<Snapshot>;

    /// Replace the saved snapshot.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Snapshot store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Snapshot> {
        load(&self.path)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        save(snapshot, &self.path)
    }
}

/// Read and decode the snapshot at `path`.
///
/// Missing or `null` fields decode to empty values.
pub fn load(path: impl AsRef<Path>) -> Result<Snapshot> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => StoreError::NotFound {
            path: path.to_path_buf(),
        },
        _ => StoreError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_str(&json).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Create or truncate `path` and write `snapshot` to it.
pub fn save(snapshot: &Snapshot, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| write_err(std::io::Error::new(ErrorKind::InvalidData, e)))?;
    fs::write(path, json + "\n").map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Snapshot {
        Snapshot::new(
            "example",
            vec!["127.0.0.1".to_string(), "192.168.0.105".to_string()],
        )
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("net.json"));

        let snapshot = example();
        store.save(&snapshot).unwrap();
        let loaded = store.load().unwrap();

        assert!(snapshot.is_unchanged(&loaded));
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn save_and_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");

        let snapshot = Snapshot::new("bare", vec![]);
        save(&snapshot, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert!(snapshot.is_unchanged(&loaded));
        assert!(loaded.addresses().is_empty());
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("net.json"));

        store.save(&example()).unwrap();
        let replacement = Snapshot::new("other", vec!["10.0.0.1".to_string()]);
        store.save(&replacement).unwrap();

        assert_eq!(store.load().unwrap(), replacement);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn load_partial_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        fs::write(&path, r#"{"hostname":"x"}"#).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.hostname(), "x");
        assert_eq!(loaded.count(), 0);
    }

    #[test]
    fn load_compact_document_with_null_ips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        fs::write(&path, "{\"hostname\":\"x\",\"ips\":null}\n").unwrap();

        assert_eq!(load(&path).unwrap(), Snapshot::new("x", vec![]));
    }

    #[test]
    fn load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(load(&path), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn load_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        fs::write(&path, r#"{"hostname": 42, "ips": "10.0.0.1"}"#).unwrap();

        assert!(matches!(load(&path), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn save_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("net.json");

        assert!(matches!(save(&example(), &path), Err(StoreError::Write { .. })));
    }
}
