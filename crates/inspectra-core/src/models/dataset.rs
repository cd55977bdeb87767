//! Dataset domain model.
//!
//! A dataset is an independent curated snapshot: it embeds copies of
//! image summaries by value, mutated only through the dedicated
//! add/update/remove operations. Changes to (or deletion of) the source
//! Image records do not propagate into datasets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::image::Image;

/// Embedded copy of an image inside a dataset.
///
/// The `id` is normalized to a canonical [`Uuid`] at insertion time so
/// that embedded copies are located with a single equality check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetImage {
    pub id: Uuid,
    pub filename: String,
    pub full_path: String,
    pub url: Option<String>,
    pub ground_truth: Option<serde_json::Value>,
}

impl DatasetImage {
    /// Snapshot an image record into an embeddable summary.
    pub fn from_image(image: &Image) -> Self {
        Self {
            id: image.id,
            filename: image.filename.clone(),
            full_path: image.full_path.clone(),
            url: image.url.clone(),
            ground_truth: image.ground_truth.clone(),
        }
    }
}

/// A curated, independently-mutable collection of image copies, scoped
/// to a project. `organization_id` is derived from the owning project
/// at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
    pub project_id: Uuid,
    pub organization_id: Uuid,
    pub images: Vec<DatasetImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDataset {
    pub name: String,
    pub project_id: Uuid,
    pub organization_id: Uuid,
    pub images: Vec<DatasetImage>,
}

/// Fields that can be updated on an existing dataset. The embedded
/// image array changes only through add/update/remove operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDataset {
    pub name: Option<String>,
}
