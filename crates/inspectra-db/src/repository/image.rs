//! SurrealDB implementation of [`ImageRepository`].
//!
//! Ancestor references are stored as embedded `{id, name}` objects so
//! counts at every hierarchy level are single indexed-field queries.

use chrono::{DateTime, Utc};
use inspectra_core::error::InspectraResult;
use inspectra_core::models::image::{CreateImage, EntityRef, Image, ImageScope};
use inspectra_core::repository::ImageRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::{CountRow, parse_uuid};

#[derive(Debug, SurrealValue)]
struct ImageRow {
    filename: String,
    organization: serde_json::Value,
    project: serde_json::Value,
    inspection_station: serde_json::Value,
    camera: serde_json::Value,
    full_path: String,
    url: Option<String>,
    ground_truth: Option<serde_json::Value>,
    inference: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ImageRowWithId {
    record_id: String,
    filename: String,
    organization: serde_json::Value,
    project: serde_json::Value,
    inspection_station: serde_json::Value,
    camera: serde_json::Value,
    full_path: String,
    url: Option<String>,
    ground_truth: Option<serde_json::Value>,
    inference: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn decode_ref(field: &str, value: serde_json::Value) -> Result<EntityRef, DbError> {
    serde_json::from_value(value)
        .map_err(|e| DbError::Decode(format!("invalid {field} reference: {e}")))
}

fn encode_ref(field: &str, entity: &EntityRef) -> Result<serde_json::Value, DbError> {
    serde_json::to_value(entity)
        .map_err(|e| DbError::Decode(format!("{field} reference encoding failed: {e}")))
}

fn row_to_image(row: ImageRow, id: Uuid) -> Result<Image, DbError> {
    Ok(Image {
        id,
        filename: row.filename,
        organization: decode_ref("organization", row.organization)?,
        project: decode_ref("project", row.project)?,
        inspection_station: decode_ref("inspection_station", row.inspection_station)?,
        camera: decode_ref("camera", row.camera)?,
        full_path: row.full_path,
        url: row.url,
        ground_truth: row.ground_truth,
        inference: row.inference,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl ImageRowWithId {
    fn try_into_image(self) -> Result<Image, DbError> {
        let id = parse_uuid("record", &self.record_id)?;
        Ok(Image {
            id,
            filename: self.filename,
            organization: decode_ref("organization", self.organization)?,
            project: decode_ref("project", self.project)?,
            inspection_station: decode_ref("inspection_station", self.inspection_station)?,
            camera: decode_ref("camera", self.camera)?,
            full_path: self.full_path,
            url: self.url,
            ground_truth: self.ground_truth,
            inference: self.inference,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Image repository.
#[derive(Clone)]
pub struct SurrealImageRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealImageRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    fn collect_rows(rows: Vec<ImageRowWithId>) -> Result<Vec<Image>, DbError> {
        rows.into_iter().map(|row| row.try_into_image()).collect()
    }
}

impl<C: Connection> ImageRepository for SurrealImageRepository<C> {
    async fn create(&self, input: CreateImage) -> InspectraResult<Image> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "CREATE type::record('image', $id) SET \
                 filename = $filename, organization = $organization, \
                 project = $project, \
                 inspection_station = $inspection_station, \
                 camera = $camera, full_path = $full_path, url = $url, \
                 ground_truth = NONE, inference = $inference",
            )
            .bind(("id", id_str.clone()))
            .bind(("filename", input.filename))
            .bind(("organization", encode_ref("organization", &input.organization)?))
            .bind(("project", encode_ref("project", &input.project)?))
            .bind((
                "inspection_station",
                encode_ref("inspection_station", &input.inspection_station)?,
            ))
            .bind(("camera", encode_ref("camera", &input.camera)?))
            .bind(("full_path", input.full_path))
            .bind(("url", input.url))
            .bind(("inference", input.inference))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ImageRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "image".into(),
            id: id_str,
        })?;

        Ok(row_to_image(row, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> InspectraResult<Image> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('image', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ImageRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "image".into(),
            id: id_str,
        })?;

        Ok(row_to_image(row, id)?)
    }

    async fn list_all(&self) -> InspectraResult<Vec<Image>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM image \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ImageRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_by_camera(&self, camera_id: Uuid) -> InspectraResult<Vec<Image>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM image \
                 WHERE camera.id = $camera ORDER BY created_at ASC",
            )
            .bind(("camera", camera_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ImageRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_in_organizations(&self, org_ids: Vec<Uuid>) -> InspectraResult<Vec<Image>> {
        let ids: Vec<String> = org_ids.iter().map(Uuid::to_string).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM image \
                 WHERE organization.id IN $orgs ORDER BY created_at ASC",
            )
            .bind(("orgs", ids))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ImageRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn delete(&self, id: Uuid) -> InspectraResult<()> {
        self.db
            .query("DELETE type::record('image', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn count_by_scope(&self, scope: ImageScope, id: Uuid) -> InspectraResult<u64> {
        let field = match scope {
            ImageScope::Organization => "organization.id",
            ImageScope::Project => "project.id",
            ImageScope::Station => "inspection_station.id",
            ImageScope::Camera => "camera.id",
        };

        let query = format!(
            "SELECT count() AS total FROM image WHERE {field} = $id GROUP ALL"
        );

        let mut result = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn update_ground_truth(
        &self,
        id: Uuid,
        data: serde_json::Value,
    ) -> InspectraResult<Image> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('image', $id) SET \
                 ground_truth = $ground_truth, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("ground_truth", data))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ImageRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "image".into(),
            id: id_str,
        })?;

        Ok(row_to_image(row, id)?)
    }

    async fn list_pending_annotation(&self, camera_id: Uuid) -> InspectraResult<Vec<Image>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM image \
                 WHERE camera.id = $camera AND ground_truth IS NONE \
                 ORDER BY created_at ASC",
            )
            .bind(("camera", camera_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ImageRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn count_annotated(&self, project_id: Uuid) -> InspectraResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM image \
                 WHERE project.id = $project AND ground_truth IS NOT NONE \
                 GROUP ALL",
            )
            .bind(("project", project_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
