//! Local filesystem storage backend.

use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::Utc;
use tracing::debug;

use crate::backend::{StorageBackend, StoredObject, sanitize_filename};
use crate::error::StorageError;

/// Stores objects as plain files under a root directory. Storage keys
/// map directly to subdirectories, so the on-disk layout mirrors the
/// organization/project/station/camera/date hierarchy.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut full = self.root.clone();
        for part in path.split('/') {
            full.push(part);
        }
        full
    }
}

fn map_io(path: &str, err: std::io::Error) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound { path: path.into() }
    } else {
        StorageError::backend("fs", path, err)
    }
}

impl StorageBackend for FsStorage {
    async fn put(
        &self,
        key: &str,
        filename: &str,
        _content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredObject, StorageError> {
        let name = sanitize_filename(filename)?;
        let stored = format!("{}_{}", Utc::now().timestamp_millis(), name);
        let path = format!("{key}/{stored}");

        let target = self.resolve(&path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| map_io(&path, e))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| map_io(&path, e))?;

        debug!(path = %path, size_bytes = bytes.len(), "Stored object on filesystem");

        Ok(StoredObject {
            path,
            filename: stored,
            url: None,
        })
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        tokio::fs::read(self.resolve(path))
            .await
            .map_err(|e| map_io(path, e))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        tokio::fs::remove_file(self.resolve(path))
            .await
            .map_err(|e| map_io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        let stored = storage
            .put(
                "acme/widget-qa/station-7/cam-1/2026/08/25",
                "part.jpg",
                "image/jpeg",
                b"not really a jpeg",
            )
            .await
            .unwrap();

        assert!(stored.filename.ends_with("_part.jpg"));
        assert!(stored.path.ends_with(&stored.filename));
        assert!(stored.url.is_none());

        let bytes = storage.get(&stored.path).await.unwrap();
        assert_eq!(bytes, b"not really a jpeg");

        storage.delete(&stored.path).await.unwrap();
        assert!(matches!(
            storage.get(&stored.path).await.unwrap_err(),
            StorageError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        assert!(matches!(
            storage.get("no/such/object.jpg").await.unwrap_err(),
            StorageError::NotFound { .. }
        ));
        assert!(matches!(
            storage.delete("no/such/object.jpg").await.unwrap_err(),
            StorageError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn traversal_filename_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        let err = storage
            .put("prefix", "../escape.jpg", "image/jpeg", b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidName { .. }));
    }
}
