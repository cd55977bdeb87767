//! Inspection station domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{InspectraError, InspectraResult};

/// Denormalized camera summary embedded in a station.
///
/// Kept in sync with actual camera create/rename/delete operations:
/// append on create, rename in place, remove on delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRef {
    pub id: Uuid,
    pub name: String,
}

/// A physical location grouping cameras within a project. Name is
/// unique within the owning project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionStation {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub project_id: Uuid,
    pub project_name: String,
    pub cameras: Vec<CameraRef>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new inspection station. Ancestor names
/// are resolved from the live project by the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInspectionStation {
    pub name: String,
    pub description: Option<String>,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub project_id: Uuid,
    pub project_name: String,
    pub created_by: Uuid,
}

impl CreateInspectionStation {
    // Unlike organizations and projects, stations carry no minimum
    // name length; only a non-empty name is required.
    pub fn validate(&self) -> InspectraResult<()> {
        if self.name.trim().is_empty() {
            return Err(InspectraError::validation(
                "inspection station name must not be empty",
            ));
        }
        Ok(())
    }
}

/// Fields that can be updated on an existing station. The `cameras`
/// mirror is maintained only through the dedicated camera operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInspectionStation {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateInspectionStation {
    pub fn validate(&self) -> InspectraResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(InspectraError::validation(
                    "inspection station name must not be empty",
                ));
            }
        }
        Ok(())
    }
}
