//! Camera domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{InspectraError, InspectraResult};

/// A named image source at an inspection station. Name is unique within
/// the owning station. The full ancestor chain is denormalized so the
/// ingestion path can build storage keys without extra lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub id: Uuid,
    pub name: String,
    pub inspection_station_id: Uuid,
    pub inspection_station_name: String,
    pub project_id: Uuid,
    pub project_name: String,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new camera. Ancestor ids and names are
/// resolved from the live station by the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCamera {
    pub name: String,
    pub inspection_station_id: Uuid,
    pub inspection_station_name: String,
    pub project_id: Uuid,
    pub project_name: String,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub created_by: Uuid,
}

impl CreateCamera {
    // Short labels like "C1" are common on the shop floor, so the only
    // requirement is a non-empty name.
    pub fn validate(&self) -> InspectraResult<()> {
        if self.name.trim().is_empty() {
            return Err(InspectraError::validation("camera name must not be empty"));
        }
        Ok(())
    }
}

/// Fields that can be updated on an existing camera.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCamera {
    pub name: Option<String>,
}

impl UpdateCamera {
    pub fn validate(&self) -> InspectraResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(InspectraError::validation("camera name must not be empty"));
            }
        }
        Ok(())
    }
}
