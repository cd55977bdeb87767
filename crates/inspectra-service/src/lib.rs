//! Orchestration layer for the Inspectra platform.
//!
//! Services are generic over the repository and storage traits so the
//! same logic runs against in-memory SurrealDB plus a tempdir in tests
//! and a remote SurrealDB plus S3 in production. Every operation takes
//! the acting [`Principal`](inspectra_core::models::principal::Principal)
//! explicitly; there is no ambient authentication state.

mod access;
pub mod hierarchy;
pub mod media;

mod dataset;
mod observation;

pub use hierarchy::HierarchyService;
pub use media::{MediaService, ProjectDashboard, UploadFailure, UploadFile, UploadOutcome};
