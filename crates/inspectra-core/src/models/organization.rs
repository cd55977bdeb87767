//! Organization domain model.
//!
//! Organizations are the top-level tenant boundary. They own projects
//! and carry the membership list that the authorization engine consults
//! for non-admin reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{InspectraError, InspectraResult};
use crate::models::principal::Role;

/// Minimum length for organization and project names.
pub const MIN_NAME_LEN: usize = 3;

/// A user's membership entry inside an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub added_at: DateTime<Utc>,
}

/// Top-level tenant boundary. Name is unique across all organizations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub members: Vec<Member>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Whether the given user is the creator or a listed member.
    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.created_by == user_id || self.members.iter().any(|m| m.user_id == user_id)
    }
}

/// Fields required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
}

impl CreateOrganization {
    pub fn validate(&self) -> InspectraResult<()> {
        if self.name.trim().len() < MIN_NAME_LEN {
            return Err(InspectraError::validation(format!(
                "organization name must be at least {MIN_NAME_LEN} characters long"
            )));
        }
        Ok(())
    }
}

/// Fields that can be updated on an existing organization.
///
/// Membership and `created_by` are deliberately absent — members change
/// only through the dedicated add/remove operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateOrganization {
    pub fn validate(&self) -> InspectraResult<()> {
        if let Some(name) = &self.name {
            if name.trim().len() < MIN_NAME_LEN {
                return Err(InspectraError::validation(format!(
                    "organization name must be at least {MIN_NAME_LEN} characters long"
                )));
            }
        }
        Ok(())
    }
}

/// Input for adding a member to an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMember {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}
