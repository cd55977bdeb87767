//! SurrealDB implementation of [`DatasetRepository`].
//!
//! Dataset rows embed image copies by value. The add/update/remove
//! image operations read the array, locate the copy by id equality,
//! and rewrite it in one single-document update.

use chrono::{DateTime, Utc};
use inspectra_core::error::InspectraResult;
use inspectra_core::models::dataset::{CreateDataset, Dataset, DatasetImage, UpdateDataset};
use inspectra_core::repository::DatasetRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::{CountRow, parse_uuid};

#[derive(Debug, SurrealValue)]
struct DatasetRow {
    name: String,
    project_id: String,
    organization_id: String,
    images: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct DatasetRowWithId {
    record_id: String,
    name: String,
    project_id: String,
    organization_id: String,
    images: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn decode_images(value: serde_json::Value) -> Result<Vec<DatasetImage>, DbError> {
    serde_json::from_value(value)
        .map_err(|e| DbError::Decode(format!("invalid dataset images array: {e}")))
}

fn encode_images(images: &[DatasetImage]) -> Result<serde_json::Value, DbError> {
    serde_json::to_value(images)
        .map_err(|e| DbError::Decode(format!("dataset images encoding failed: {e}")))
}

fn row_to_dataset(row: DatasetRow, id: Uuid) -> Result<Dataset, DbError> {
    Ok(Dataset {
        id,
        name: row.name,
        project_id: parse_uuid("project", &row.project_id)?,
        organization_id: parse_uuid("organization", &row.organization_id)?,
        images: decode_images(row.images)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl DatasetRowWithId {
    fn try_into_dataset(self) -> Result<Dataset, DbError> {
        let id = parse_uuid("record", &self.record_id)?;
        Ok(Dataset {
            id,
            name: self.name,
            project_id: parse_uuid("project", &self.project_id)?,
            organization_id: parse_uuid("organization", &self.organization_id)?,
            images: decode_images(self.images)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Dataset repository.
#[derive(Clone)]
pub struct SurrealDatasetRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDatasetRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<Dataset, DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('dataset', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<DatasetRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dataset".into(),
            id: id_str,
        })?;

        row_to_dataset(row, id)
    }

    /// Rewrite the embedded image array in one single-document update.
    async fn write_images(&self, id: Uuid, images: &[DatasetImage]) -> Result<Dataset, DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('dataset', $id) SET \
                 images = $images, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("images", encode_images(images)?))
            .await?;

        let rows: Vec<DatasetRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dataset".into(),
            id: id_str,
        })?;

        row_to_dataset(row, id)
    }

    fn collect_rows(rows: Vec<DatasetRowWithId>) -> Result<Vec<Dataset>, DbError> {
        rows.into_iter().map(|row| row.try_into_dataset()).collect()
    }
}

impl<C: Connection> DatasetRepository for SurrealDatasetRepository<C> {
    async fn create(&self, input: CreateDataset) -> InspectraResult<Dataset> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "CREATE type::record('dataset', $id) SET \
                 name = $name, project_id = $project_id, \
                 organization_id = $organization_id, images = $images",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name.trim().to_string()))
            .bind(("project_id", input.project_id.to_string()))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("images", encode_images(&input.images)?))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DatasetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dataset".into(),
            id: id_str,
        })?;

        Ok(row_to_dataset(row, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> InspectraResult<Dataset> {
        Ok(self.fetch(id).await?)
    }

    async fn list_all(&self) -> InspectraResult<Vec<Dataset>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM dataset \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DatasetRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_by_project(&self, project_id: Uuid) -> InspectraResult<Vec<Dataset>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM dataset \
                 WHERE project_id = $project ORDER BY created_at ASC",
            )
            .bind(("project", project_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DatasetRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_by_organization(&self, organization_id: Uuid) -> InspectraResult<Vec<Dataset>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM dataset \
                 WHERE organization_id = $org ORDER BY created_at ASC",
            )
            .bind(("org", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DatasetRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_in_organizations(&self, org_ids: Vec<Uuid>) -> InspectraResult<Vec<Dataset>> {
        let ids: Vec<String> = org_ids.iter().map(Uuid::to_string).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM dataset \
                 WHERE organization_id IN $orgs ORDER BY created_at ASC",
            )
            .bind(("orgs", ids))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DatasetRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn update(&self, id: Uuid, input: UpdateDataset) -> InspectraResult<Dataset> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('dataset', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name.trim().to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<DatasetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dataset".into(),
            id: id_str,
        })?;

        Ok(row_to_dataset(row, id)?)
    }

    async fn delete(&self, id: Uuid) -> InspectraResult<()> {
        self.db
            .query("DELETE type::record('dataset', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn add_image(&self, id: Uuid, image: DatasetImage) -> InspectraResult<Dataset> {
        let mut dataset = self.fetch(id).await?;
        dataset.images.push(image);
        Ok(self.write_images(id, &dataset.images).await?)
    }

    async fn update_image(&self, id: Uuid, image: DatasetImage) -> InspectraResult<Dataset> {
        let mut dataset = self.fetch(id).await?;

        let slot = dataset
            .images
            .iter_mut()
            .find(|i| i.id == image.id)
            .ok_or_else(|| DbError::NotFound {
                entity: "dataset image".into(),
                id: image.id.to_string(),
            })?;
        *slot = image;

        Ok(self.write_images(id, &dataset.images).await?)
    }

    async fn remove_image(&self, id: Uuid, image_id: Uuid) -> InspectraResult<Dataset> {
        let mut dataset = self.fetch(id).await?;

        let before = dataset.images.len();
        dataset.images.retain(|i| i.id != image_id);
        if dataset.images.len() == before {
            return Err(DbError::NotFound {
                entity: "dataset image".into(),
                id: image_id.to_string(),
            }
            .into());
        }

        Ok(self.write_images(id, &dataset.images).await?)
    }

    async fn count_by_project(&self, project_id: Uuid) -> InspectraResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM dataset \
                 WHERE project_id = $project GROUP ALL",
            )
            .bind(("project", project_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
