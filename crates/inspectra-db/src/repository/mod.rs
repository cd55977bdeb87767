//! SurrealDB repository implementations.

mod camera;
mod dataset;
mod image;
mod observation;
mod organization;
mod project;
mod station;

pub use camera::SurrealCameraRepository;
pub use dataset::SurrealDatasetRepository;
pub use image::SurrealImageRepository;
pub use observation::SurrealObservationRepository;
pub use organization::SurrealOrganizationRepository;
pub use project::SurrealProjectRepository;
pub use station::SurrealStationRepository;

use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub total: u64,
}

pub(crate) fn parse_uuid(field: &str, s: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
}
