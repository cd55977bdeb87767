//! Storage backend abstraction.

use crate::error::StorageError;

/// Outcome of a successful store operation.
///
/// `path` is the full storage key (prefix plus stored filename) and is
/// what image records persist for later retrieval and deletion. `url`
/// is populated only by backends that can serve objects publicly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub path: String,
    pub filename: String,
    pub url: Option<String>,
}

/// A place to put, fetch and delete raw media bytes.
///
/// Backends own the final filename: the caller supplies the original
/// name and the backend prefixes it with the ingestion timestamp in
/// milliseconds so repeated uploads of the same file never collide.
/// Filenames containing path separators or traversal segments are
/// rejected per file, leaving the rest of a batch unaffected.
pub trait StorageBackend: Send + Sync {
    fn put(
        &self,
        key: &str,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<StoredObject, StorageError>> + Send;

    fn get(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    fn delete(&self, path: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Reject filenames that would escape the storage prefix.
pub(crate) fn sanitize_filename(filename: &str) -> Result<&str, StorageError> {
    let trimmed = filename.trim();
    if trimmed.is_empty()
        || trimmed.contains('/')
        || trimmed.contains('\\')
        || trimmed.contains("..")
    {
        return Err(StorageError::InvalidName {
            filename: filename.into(),
        });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_filenames_pass() {
        assert_eq!(sanitize_filename("part_0042.jpg").unwrap(), "part_0042.jpg");
        assert_eq!(sanitize_filename("  spaced.png ").unwrap(), "spaced.png");
    }

    #[test]
    fn traversal_and_separators_are_rejected() {
        for bad in ["", "   ", "a/b.jpg", "a\\b.jpg", "../escape.jpg"] {
            assert!(matches!(
                sanitize_filename(bad),
                Err(StorageError::InvalidName { .. })
            ));
        }
    }
}
