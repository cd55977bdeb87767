//! SurrealDB implementation of [`ObservationRepository`].
//!
//! The declared `data_type` is stored next to the raw value; rows are
//! decoded back through [`ObservationValue::from_json`] so a stored
//! type/value mismatch surfaces as a decode error instead of silently
//! changing type.

use chrono::{DateTime, Utc};
use inspectra_core::error::InspectraResult;
use inspectra_core::models::observation::{
    CreateObservation, DataType, Observation, ObservationValue, UpdateObservation,
};
use inspectra_core::repository::ObservationRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::parse_uuid;

#[derive(Debug, SurrealValue)]
struct ObservationRow {
    name: String,
    project_id: String,
    project_name: String,
    organization_id: String,
    organization_name: String,
    data_type: String,
    value: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ObservationRowWithId {
    record_id: String,
    name: String,
    project_id: String,
    project_name: String,
    organization_id: String,
    organization_name: String,
    data_type: String,
    value: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn decode_value(data_type: &str, value: serde_json::Value) -> Result<ObservationValue, DbError> {
    let dt = DataType::parse(data_type)
        .map_err(|e| DbError::Decode(format!("invalid stored data_type: {e}")))?;
    ObservationValue::from_json(dt, value)
        .map_err(|e| DbError::Decode(format!("stored value does not match data_type: {e}")))
}

fn row_to_observation(row: ObservationRow, id: Uuid) -> Result<Observation, DbError> {
    Ok(Observation {
        id,
        name: row.name,
        project_id: parse_uuid("project", &row.project_id)?,
        project_name: row.project_name,
        organization_id: parse_uuid("organization", &row.organization_id)?,
        organization_name: row.organization_name,
        value: decode_value(&row.data_type, row.value)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl ObservationRowWithId {
    fn try_into_observation(self) -> Result<Observation, DbError> {
        let id = parse_uuid("record", &self.record_id)?;
        Ok(Observation {
            id,
            name: self.name,
            project_id: parse_uuid("project", &self.project_id)?,
            project_name: self.project_name,
            organization_id: parse_uuid("organization", &self.organization_id)?,
            organization_name: self.organization_name,
            value: decode_value(&self.data_type, self.value)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Observation repository.
#[derive(Clone)]
pub struct SurrealObservationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealObservationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<Observation, DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('observation', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<ObservationRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "observation".into(),
            id: id_str,
        })?;

        row_to_observation(row, id)
    }

    fn collect_rows(rows: Vec<ObservationRowWithId>) -> Result<Vec<Observation>, DbError> {
        rows.into_iter()
            .map(|row| row.try_into_observation())
            .collect()
    }
}

impl<C: Connection> ObservationRepository for SurrealObservationRepository<C> {
    async fn create(&self, input: CreateObservation) -> InspectraResult<Observation> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let name = input.name.trim().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('observation', $id) SET \
                 name = $name, project_id = $project_id, \
                 project_name = $project_name, \
                 organization_id = $organization_id, \
                 organization_name = $organization_name, \
                 data_type = $data_type, value = $value",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", name.clone()))
            .bind(("project_id", input.project_id.to_string()))
            .bind(("project_name", input.project_name))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("organization_name", input.organization_name))
            .bind(("data_type", input.value.data_type().as_str().to_string()))
            .bind(("value", input.value.to_json()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("observation", &name, e))?;

        let rows: Vec<ObservationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "observation".into(),
            id: id_str,
        })?;

        Ok(row_to_observation(row, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> InspectraResult<Observation> {
        Ok(self.fetch(id).await?)
    }

    async fn list_all(&self) -> InspectraResult<Vec<Observation>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM observation \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ObservationRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_by_project(&self, project_id: Uuid) -> InspectraResult<Vec<Observation>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM observation \
                 WHERE project_id = $project ORDER BY created_at ASC",
            )
            .bind(("project", project_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ObservationRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn list_in_organizations(
        &self,
        org_ids: Vec<Uuid>,
    ) -> InspectraResult<Vec<Observation>> {
        let ids: Vec<String> = org_ids.iter().map(Uuid::to_string).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM observation \
                 WHERE organization_id IN $orgs ORDER BY created_at ASC",
            )
            .bind(("orgs", ids))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ObservationRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect_rows(rows)?)
    }

    async fn update(&self, id: Uuid, input: UpdateObservation) -> InspectraResult<Observation> {
        let id_str = id.to_string();
        let name_for_conflict = input.name.clone().unwrap_or_default();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.value.is_some() {
            sets.push("data_type = $data_type");
            sets.push("value = $value");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('observation', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name.trim().to_string()));
        }
        if let Some(value) = input.value {
            builder = builder
                .bind(("data_type", value.data_type().as_str().to_string()))
                .bind(("value", value.to_json()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write("observation", &name_for_conflict, e))?;

        let rows: Vec<ObservationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "observation".into(),
            id: id_str,
        })?;

        Ok(row_to_observation(row, id)?)
    }

    async fn delete(&self, id: Uuid) -> InspectraResult<()> {
        self.db
            .query("DELETE type::record('observation', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
