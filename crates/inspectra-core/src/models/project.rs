//! Project domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{InspectraError, InspectraResult};
use crate::models::organization::MIN_NAME_LEN;

/// A named initiative within an organization. Name is unique within the
/// owning organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub organization_id: Uuid,
    /// Organization name at creation time; not refreshed on rename.
    pub organization_name: String,
    pub created_by: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub created_by: Uuid,
}

impl CreateProject {
    pub fn validate(&self) -> InspectraResult<()> {
        if self.name.trim().len() < MIN_NAME_LEN {
            return Err(InspectraError::validation(format!(
                "project name must be at least {MIN_NAME_LEN} characters long"
            )));
        }
        Ok(())
    }
}

/// Fields that can be updated on an existing project. Ancestor and
/// provenance fields are immutable by construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl UpdateProject {
    pub fn validate(&self) -> InspectraResult<()> {
        if let Some(name) = &self.name {
            if name.trim().len() < MIN_NAME_LEN {
                return Err(InspectraError::validation(format!(
                    "project name must be at least {MIN_NAME_LEN} characters long"
                )));
            }
        }
        Ok(())
    }
}
