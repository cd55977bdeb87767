//! SurrealDB implementation of [`OrganizationRepository`].

use chrono::{DateTime, Utc};
use inspectra_core::error::InspectraResult;
use inspectra_core::models::organization::{
    AddMember, CreateOrganization, Member, Organization, UpdateOrganization,
};
use inspectra_core::repository::OrganizationRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::parse_uuid;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    name: String,
    description: String,
    members: serde_json::Value,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrganizationRowWithId {
    record_id: String,
    name: String,
    description: String,
    members: serde_json::Value,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn decode_members(value: serde_json::Value) -> Result<Vec<Member>, DbError> {
    serde_json::from_value(value)
        .map_err(|e| DbError::Decode(format!("invalid members array: {e}")))
}

fn row_to_organization(row: OrganizationRow, id: Uuid) -> Result<Organization, DbError> {
    Ok(Organization {
        id,
        name: row.name,
        description: row.description,
        members: decode_members(row.members)?,
        created_by: parse_uuid("created_by", &row.created_by)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl OrganizationRowWithId {
    fn try_into_organization(self) -> Result<Organization, DbError> {
        let id = parse_uuid("record", &self.record_id)?;
        Ok(Organization {
            id,
            name: self.name,
            description: self.description,
            members: decode_members(self.members)?,
            created_by: parse_uuid("created_by", &self.created_by)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Organization repository.
#[derive(Clone)]
pub struct SurrealOrganizationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<Organization, DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('organization', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<OrganizationRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        row_to_organization(row, id)
    }

    /// Rewrite the whole members array in one single-document update.
    async fn write_members(&self, id: Uuid, members: &[Member]) -> Result<Organization, DbError> {
        let id_str = id.to_string();
        let members_json = serde_json::to_value(members)
            .map_err(|e| DbError::Decode(format!("members encoding failed: {e}")))?;

        let mut result = self
            .db
            .query(
                "UPDATE type::record('organization', $id) SET \
                 members = $members, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("members", members_json))
            .await?;

        let rows: Vec<OrganizationRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        row_to_organization(row, id)
    }
}

impl<C: Connection> OrganizationRepository for SurrealOrganizationRepository<C> {
    async fn create(&self, input: CreateOrganization) -> InspectraResult<Organization> {
        input.validate()?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let name = input.name.trim().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('organization', $id) SET \
                 name = $name, description = $description, \
                 members = [], created_by = $created_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", name.clone()))
            .bind(("description", input.description.unwrap_or_default()))
            .bind(("created_by", input.created_by.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("organization", &name, e))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row_to_organization(row, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> InspectraResult<Organization> {
        Ok(self.fetch(id).await?)
    }

    async fn list_all(&self) -> InspectraResult<Vec<Organization>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organization \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_organization())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_for_user(&self, user_id: Uuid) -> InspectraResult<Vec<Organization>> {
        // One set-membership query: creator or listed member.
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organization \
                 WHERE created_by = $user OR $user IN members.user_id \
                 ORDER BY created_at ASC",
            )
            .bind(("user", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_organization())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn update(&self, id: Uuid, input: UpdateOrganization) -> InspectraResult<Organization> {
        input.validate()?;

        let id_str = id.to_string();
        let name_for_conflict = input.name.clone().unwrap_or_default();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('organization', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name.trim().to_string()));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("organization", &name_for_conflict, e))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row_to_organization(row, id)?)
    }

    async fn delete(&self, id: Uuid) -> InspectraResult<()> {
        self.db
            .query("DELETE type::record('organization', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn add_member(&self, id: Uuid, member: AddMember) -> InspectraResult<Organization> {
        let mut org = self.fetch(id).await?;

        if org.members.iter().any(|m| m.user_id == member.user_id) {
            return Err(DbError::Conflict {
                entity: "organization member".into(),
                name: member.user_id.to_string(),
            }
            .into());
        }

        org.members.push(Member {
            user_id: member.user_id,
            name: member.name,
            email: member.email,
            role: member.role,
            added_at: Utc::now(),
        });

        Ok(self.write_members(id, &org.members).await?)
    }

    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> InspectraResult<Organization> {
        let mut org = self.fetch(id).await?;
        org.members.retain(|m| m.user_id != user_id);
        Ok(self.write_members(id, &org.members).await?)
    }
}
