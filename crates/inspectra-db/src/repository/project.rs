//! SurrealDB implementation of [`ProjectRepository`].

use chrono::{DateTime, Utc};
use inspectra_core::error::InspectraResult;
use inspectra_core::models::project::{CreateProject, Project, UpdateProject};
use inspectra_core::repository::ProjectRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::parse_uuid;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ProjectRow {
    name: String,
    description: String,
    organization_id: String,
    organization_name: String,
    created_by: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ProjectRowWithId {
    record_id: String,
    name: String,
    description: String,
    organization_id: String,
    organization_name: String,
    created_by: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn row_to_project(row: ProjectRow, id: Uuid) -> Result<Project, DbError> {
    Ok(Project {
        id,
        name: row.name,
        description: row.description,
        organization_id: parse_uuid("organization", &row.organization_id)?,
        organization_name: row.organization_name,
        created_by: parse_uuid("created_by", &row.created_by)?,
        active: row.active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl ProjectRowWithId {
    fn try_into_project(self) -> Result<Project, DbError> {
        let id = parse_uuid("record", &self.record_id)?;
        Ok(Project {
            id,
            name: self.name,
            description: self.description,
            organization_id: parse_uuid("organization", &self.organization_id)?,
            organization_name: self.organization_name,
            created_by: parse_uuid("created_by", &self.created_by)?,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Project repository.
#[derive(Clone)]
pub struct SurrealProjectRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProjectRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    fn collect_rows(rows: Vec<ProjectRowWithId>) -> Result<Vec<Project>, DbError> {
        rows.into_iter()
            .map(|row| row.try_into_project())
            .collect()
    }
}

impl<C: Connection> ProjectRepository for SurrealProjectRepository<C> {
    async fn create(&self, input: CreateProject) -> InspectraResult<Project> {
        input.validate()?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let name = input.name.trim().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('project', $id) SET \
                 name = $name, description = $description, \
                 organization_id = $organization_id, \
                 organization_name = $organization_name, \
                 created_by = $created_by, active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", name.clone()))
            .bind(("description", input.description.unwrap_or_default()))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("organization_name", input.organization_name))
            .bind(("created_by", input.created_by.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("project", &name, e))?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "project".into(),
            id: id_str,
        })?;

        Ok(row_to_project(row, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> InspectraResult<Project> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('project', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "project".into(),
            id: id_str,
        })?;

        Ok(row_to_project(row, id)?)
    }

    async fn list_all(&self) -> InspectraResult<Vec<Project>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM project \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_by_organization(&self, organization_id: Uuid) -> InspectraResult<Vec<Project>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM project \
                 WHERE organization_id = $org ORDER BY created_at ASC",
            )
            .bind(("org", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_in_organizations(&self, org_ids: Vec<Uuid>) -> InspectraResult<Vec<Project>> {
        let ids: Vec<String> = org_ids.iter().map(Uuid::to_string).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM project \
                 WHERE organization_id IN $orgs ORDER BY created_at ASC",
            )
            .bind(("orgs", ids))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn update(&self, id: Uuid, input: UpdateProject) -> InspectraResult<Project> {
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
        if input.active.is_some() {
            sets.push("active = $active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('project', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name.trim().to_string()));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(active) = input.active {
            builder = builder.bind(("active", active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("project", &name_for_conflict, e))?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "project".into(),
            id: id_str,
        })?;

        Ok(row_to_project(row, id)?)
    }

    async fn delete(&self, id: Uuid) -> InspectraResult<()> {
        self.db
            .query("DELETE type::record('project', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
