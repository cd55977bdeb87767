//! SurrealDB implementation of [`CameraRepository`].

use chrono::{DateTime, Utc};
use inspectra_core::error::InspectraResult;
use inspectra_core::models::camera::{Camera, CreateCamera, UpdateCamera};
use inspectra_core::repository::CameraRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::parse_uuid;

#[derive(Debug, SurrealValue)]
struct CameraRow {
    name: String,
    inspection_station_id: String,
    inspection_station_name: String,
    project_id: String,
    project_name: String,
    organization_id: String,
    organization_name: String,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CameraRowWithId {
    record_id: String,
    name: String,
    inspection_station_id: String,
    inspection_station_name: String,
    project_id: String,
    project_name: String,
    organization_id: String,
    organization_name: String,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn row_to_camera(row: CameraRow, id: Uuid) -> Result<Camera, DbError> {
    Ok(Camera {
        id,
        name: row.name,
        inspection_station_id: parse_uuid("station", &row.inspection_station_id)?,
        inspection_station_name: row.inspection_station_name,
        project_id: parse_uuid("project", &row.project_id)?,
        project_name: row.project_name,
        organization_id: parse_uuid("organization", &row.organization_id)?,
        organization_name: row.organization_name,
        created_by: parse_uuid("created_by", &row.created_by)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl CameraRowWithId {
    fn try_into_camera(self) -> Result<Camera, DbError> {
        let id = parse_uuid("record", &self.record_id)?;
        Ok(Camera {
            id,
            name: self.name,
            inspection_station_id: parse_uuid("station", &self.inspection_station_id)?,
            inspection_station_name: self.inspection_station_name,
            project_id: parse_uuid("project", &self.project_id)?,
            project_name: self.project_name,
            organization_id: parse_uuid("organization", &self.organization_id)?,
            organization_name: self.organization_name,
            created_by: parse_uuid("created_by", &self.created_by)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Camera repository.
#[derive(Clone)]
pub struct SurrealCameraRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCameraRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    fn collect_rows(rows: Vec<CameraRowWithId>) -> Result<Vec<Camera>, DbError> {
        rows.into_iter().map(|row| row.try_into_camera()).collect()
    }
}

impl<C: Connection> CameraRepository for SurrealCameraRepository<C> {
    async fn create(&self, input: CreateCamera) -> InspectraResult<Camera> {
        input.validate()?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let name = input.name.trim().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('camera', $id) SET \
                 name = $name, \
                 inspection_station_id = $station_id, \
                 inspection_station_name = $station_name, \
                 project_id = $project_id, project_name = $project_name, \
                 organization_id = $organization_id, \
                 organization_name = $organization_name, \
                 created_by = $created_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", name.clone()))
            .bind(("station_id", input.inspection_station_id.to_string()))
            .bind(("station_name", input.inspection_station_name))
            .bind(("project_id", input.project_id.to_string()))
            .bind(("project_name", input.project_name))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("organization_name", input.organization_name))
            .bind(("created_by", input.created_by.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("camera", &name, e))?;

        let rows: Vec<CameraRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "camera".into(),
            id: id_str,
        })?;

        Ok(row_to_camera(row, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> InspectraResult<Camera> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('camera', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CameraRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "camera".into(),
            id: id_str,
        })?;

        Ok(row_to_camera(row, id)?)
    }

    async fn list_all(&self) -> InspectraResult<Vec<Camera>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM camera \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CameraRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_by_station(&self, station_id: Uuid) -> InspectraResult<Vec<Camera>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM camera \
                 WHERE inspection_station_id = $station \
                 ORDER BY created_at ASC",
            )
            .bind(("station", station_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CameraRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_by_project(&self, project_id: Uuid) -> InspectraResult<Vec<Camera>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM camera \
                 WHERE project_id = $project ORDER BY created_at ASC",
            )
            .bind(("project", project_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CameraRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_in_organizations(&self, org_ids: Vec<Uuid>) -> InspectraResult<Vec<Camera>> {
        let ids: Vec<String> = org_ids.iter().map(Uuid::to_string).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM camera \
                 WHERE organization_id IN $orgs ORDER BY created_at ASC",
            )
            .bind(("orgs", ids))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CameraRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn update(&self, id: Uuid, input: UpdateCamera) -> InspectraResult<Camera> {
        input.validate()?;

        let id_str = id.to_string();
        let name_for_conflict = input.name.clone().unwrap_or_default();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('camera', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name.trim().to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("camera", &name_for_conflict, e))?;

        let rows: Vec<CameraRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "camera".into(),
            id: id_str,
        })?;

        Ok(row_to_camera(row, id)?)
    }

    async fn delete(&self, id: Uuid) -> InspectraResult<()> {
        self.db
            .query("DELETE type::record('camera', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
