//! Flat-file metadata store.
//!
//! The whole record array lives in a single JSON sidecar file and is read
//! and written wholesale. There is no indexing and no locking; concurrent
//! writers are last-write-wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::gallery::ImageRecord;
use crate::Result;

/// Metadata store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    /// Path of the sidecar file.
    path: PathBuf,
}

impl MetadataStore {
    /// Create a store for the given sidecar file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the sidecar file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records.
    ///
    /// A missing sidecar file reads as an empty array; the reconciliation
    /// pass creates it on first write.
    pub fn load(&self) -> Result<Vec<ImageRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let records: Vec<ImageRecord> = serde_json::from_str(&content)?;
        Ok(records)
    }

    /// Replace all records.
    pub fn save(&self, records: &[ImageRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut json = serde_json::to_string_pretty(records)?;
        json.push('\n');
        fs::write(&self.path, json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, MetadataStore) {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("images.json"));
        (dir, store)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_dir, store) = setup_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_dir, store) = setup_store();

        let mut record = ImageRecord::for_file("cat.jpg");
        record.alt = "A cat".to_string();
        record.tags = vec!["pets".to_string()];

        store.save(&[record.clone()]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![record]);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("nested").join("images.json"));

        store.save(&[]).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_writes_wire_format() {
        let (_dir, store) = setup_store();

        let mut record = ImageRecord::for_file("cat.jpg");
        record.tags = vec!["pets".to_string()];
        store.save(&[record]).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"type\""));
        assert!(!raw.contains("\"tags\""));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let (_dir, store) = setup_store();
        fs::write(store.path(), "{not json").unwrap();

        let result = store.load();
        assert!(matches!(result, Err(crate::PicwallError::Metadata(_))));
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let (_dir, store) = setup_store();

        store
            .save(&[
                ImageRecord::for_file("a.jpg"),
                ImageRecord::for_file("b.jpg"),
            ])
            .unwrap();
        store.save(&[ImageRecord::for_file("c.jpg")]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].src, "/c.jpg");
    }
}
