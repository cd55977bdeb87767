//! Image domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Denormalized `{id, name}` reference to an ancestor entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: Uuid,
    pub name: String,
}

/// A single captured file plus its ancestor chain.
///
/// Identity fields are immutable after creation; only the annotation
/// fields (`ground_truth`) change. `full_path` is the authoritative
/// storage key used for both serving and deletion. The `camera.id`
/// reference is checked at creation time only — deleting a camera does
/// not cascade to its images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: Uuid,
    pub filename: String,
    pub organization: EntityRef,
    pub project: EntityRef,
    pub inspection_station: EntityRef,
    pub camera: EntityRef,
    pub full_path: String,
    /// Public URL, populated only by the object-store backend.
    pub url: Option<String>,
    /// Structured annotation supplied by a human grader.
    pub ground_truth: Option<serde_json::Value>,
    /// Extracted or inferred capture metadata (EXIF-equivalent).
    pub inference: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new image record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateImage {
    pub filename: String,
    pub organization: EntityRef,
    pub project: EntityRef,
    pub inspection_station: EntityRef,
    pub camera: EntityRef,
    pub full_path: String,
    pub url: Option<String>,
    pub inference: Option<serde_json::Value>,
}

/// Hierarchy level an image count is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageScope {
    Organization,
    Project,
    Station,
    Camera,
}
