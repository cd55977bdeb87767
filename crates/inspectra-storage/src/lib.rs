//! Media storage backends for the Inspectra platform.
//!
//! Two interchangeable [`StorageBackend`] implementations: a local
//! filesystem store for development and testing, and an S3-compatible
//! object store for production. Capture metadata extraction lives here
//! as well since it only runs on ingested bytes.

mod backend;
mod error;
mod fs;
mod metadata;
mod s3;

pub use backend::{StorageBackend, StoredObject};
pub use error::StorageError;
pub use fs::FsStorage;
pub use metadata::{CaptureMetadata, extract_capture_metadata};
pub use s3::{S3Config, S3Storage};
