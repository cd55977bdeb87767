//! SurrealDB implementation of [`StationRepository`].
//!
//! The `cameras` array on each station row is the denormalized mirror
//! of the camera table. `append_camera`, `rename_camera` and
//! `remove_camera` keep it in sync; callers invoke them alongside the
//! corresponding camera-table writes.

use chrono::{DateTime, Utc};
use inspectra_core::error::InspectraResult;
use inspectra_core::models::station::{
    CameraRef, CreateInspectionStation, InspectionStation, UpdateInspectionStation,
};
use inspectra_core::repository::StationRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::parse_uuid;

#[derive(Debug, SurrealValue)]
struct StationRow {
    name: String,
    description: String,
    organization_id: String,
    organization_name: String,
    project_id: String,
    project_name: String,
    cameras: serde_json::Value,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct StationRowWithId {
    record_id: String,
    name: String,
    description: String,
    organization_id: String,
    organization_name: String,
    project_id: String,
    project_name: String,
    cameras: serde_json::Value,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn decode_cameras(value: serde_json::Value) -> Result<Vec<CameraRef>, DbError> {
    serde_json::from_value(value)
        .map_err(|e| DbError::Decode(format!("invalid cameras array: {e}")))
}

fn row_to_station(row: StationRow, id: Uuid) -> Result<InspectionStation, DbError> {
    Ok(InspectionStation {
        id,
        name: row.name,
        description: row.description,
        organization_id: parse_uuid("organization", &row.organization_id)?,
        organization_name: row.organization_name,
        project_id: parse_uuid("project", &row.project_id)?,
        project_name: row.project_name,
        cameras: decode_cameras(row.cameras)?,
        created_by: parse_uuid("created_by", &row.created_by)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl StationRowWithId {
    fn try_into_station(self) -> Result<InspectionStation, DbError> {
        let id = parse_uuid("record", &self.record_id)?;
        Ok(InspectionStation {
            id,
            name: self.name,
            description: self.description,
            organization_id: parse_uuid("organization", &self.organization_id)?,
            organization_name: self.organization_name,
            project_id: parse_uuid("project", &self.project_id)?,
            project_name: self.project_name,
            cameras: decode_cameras(self.cameras)?,
            created_by: parse_uuid("created_by", &self.created_by)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the InspectionStation repository.
#[derive(Clone)]
pub struct SurrealStationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealStationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<InspectionStation, DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('inspection_station', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<StationRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "inspection station".into(),
            id: id_str,
        })?;

        row_to_station(row, id)
    }

    /// Rewrite the cameras mirror in one single-document update.
    async fn write_cameras(
        &self,
        id: Uuid,
        cameras: &[CameraRef],
    ) -> Result<InspectionStation, DbError> {
        let id_str = id.to_string();
        let cameras_json = serde_json::to_value(cameras)
            .map_err(|e| DbError::Decode(format!("cameras encoding failed: {e}")))?;

        let mut result = self
            .db
            .query(
                "UPDATE type::record('inspection_station', $id) SET \
                 cameras = $cameras, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("cameras", cameras_json))
            .await?;

        let rows: Vec<StationRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "inspection station".into(),
            id: id_str,
        })?;

        row_to_station(row, id)
    }
}

impl<C: Connection> StationRepository for SurrealStationRepository<C> {
    async fn create(&self, input: CreateInspectionStation) -> InspectraResult<InspectionStation> {
        input.validate()?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let name = input.name.trim().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('inspection_station', $id) SET \
                 name = $name, description = $description, \
                 organization_id = $organization_id, \
                 organization_name = $organization_name, \
                 project_id = $project_id, project_name = $project_name, \
                 cameras = [], created_by = $created_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", name.clone()))
            .bind(("description", input.description.unwrap_or_default()))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("organization_name", input.organization_name))
            .bind(("project_id", input.project_id.to_string()))
            .bind(("project_name", input.project_name))
            .bind(("created_by", input.created_by.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("inspection station", &name, e))?;

        let rows: Vec<StationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "inspection station".into(),
            id: id_str,
        })?;

        Ok(row_to_station(row, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> InspectraResult<InspectionStation> {
        Ok(self.fetch(id).await?)
    }

    async fn list_all(&self) -> InspectraResult<Vec<InspectionStation>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM inspection_station \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StationRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_station())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_by_project(&self, project_id: Uuid) -> InspectraResult<Vec<InspectionStation>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM inspection_station \
                 WHERE project_id = $project ORDER BY created_at ASC",
            )
            .bind(("project", project_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StationRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_station())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_in_organizations(
        &self,
        org_ids: Vec<Uuid>,
    ) -> InspectraResult<Vec<InspectionStation>> {
        let ids: Vec<String> = org_ids.iter().map(Uuid::to_string).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM inspection_station \
                 WHERE organization_id IN $orgs ORDER BY created_at ASC",
            )
            .bind(("orgs", ids))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StationRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_station())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn update(
        &self,
        id: Uuid,
        input: UpdateInspectionStation,
    ) -> InspectraResult<InspectionStation> {
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
            "UPDATE type::record('inspection_station', $id) SET {}",
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
            .map_err(|e| DbError::from_write("inspection station", &name_for_conflict, e))?;

        let rows: Vec<StationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "inspection station".into(),
            id: id_str,
        })?;

        Ok(row_to_station(row, id)?)
    }

    async fn delete(&self, id: Uuid) -> InspectraResult<()> {
        self.db
            .query("DELETE type::record('inspection_station', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn append_camera(&self, station_id: Uuid, camera: CameraRef) -> InspectraResult<()> {
        let mut station = self.fetch(station_id).await?;
        station.cameras.push(camera);
        self.write_cameras(station_id, &station.cameras).await?;
        Ok(())
    }

    async fn rename_camera(
        &self,
        station_id: Uuid,
        camera_id: Uuid,
        name: String,
    ) -> InspectraResult<()> {
        let mut station = self.fetch(station_id).await?;
        for camera in &mut station.cameras {
            if camera.id == camera_id {
                camera.name = name.clone();
            }
        }
        self.write_cameras(station_id, &station.cameras).await?;
        Ok(())
    }

    async fn remove_camera(&self, station_id: Uuid, camera_id: Uuid) -> InspectraResult<()> {
        let mut station = self.fetch(station_id).await?;
        station.cameras.retain(|c| c.id != camera_id);
        self.write_cameras(station_id, &station.cameras).await?;
        Ok(())
    }
}
