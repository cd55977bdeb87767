//! Observation domain model.
//!
//! An observation is a typed named variable scoped to a project. The
//! value is a closed enum, so a `data_type`/value mismatch is
//! unrepresentable once an observation has been constructed; callers
//! supplying a declared type plus a raw JSON value go through
//! [`ObservationValue::from_json`], which rejects mismatches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{InspectraError, InspectraResult};

/// Declared type of an observation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Boolean,
    Number,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Number => "number",
        }
    }

    pub fn parse(s: &str) -> InspectraResult<Self> {
        match s {
            "string" => Ok(DataType::String),
            "boolean" => Ok(DataType::Boolean),
            "number" => Ok(DataType::Number),
            other => Err(InspectraError::validation(format!(
                "data_type must be one of string, boolean, number (got '{other}')"
            ))),
        }
    }
}

/// A typed observation value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationValue {
    String(String),
    Boolean(bool),
    Number(f64),
}

impl ObservationValue {
    pub fn data_type(&self) -> DataType {
        match self {
            ObservationValue::String(_) => DataType::String,
            ObservationValue::Boolean(_) => DataType::Boolean,
            ObservationValue::Number(_) => DataType::Number,
        }
    }

    /// Validate a caller-supplied JSON value against the declared type.
    pub fn from_json(data_type: DataType, value: serde_json::Value) -> InspectraResult<Self> {
        match (data_type, value) {
            (DataType::String, serde_json::Value::String(s)) => Ok(ObservationValue::String(s)),
            (DataType::Boolean, serde_json::Value::Bool(b)) => Ok(ObservationValue::Boolean(b)),
            (DataType::Number, serde_json::Value::Number(n)) => n
                .as_f64()
                .map(ObservationValue::Number)
                .ok_or_else(|| InspectraError::validation("value is not a representable number")),
            (dt, _) => Err(InspectraError::validation(format!(
                "value must be a {}",
                dt.as_str()
            ))),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ObservationValue::String(s) => serde_json::Value::String(s.clone()),
            ObservationValue::Boolean(b) => serde_json::Value::Bool(*b),
            ObservationValue::Number(n) => serde_json::json!(n),
        }
    }
}

/// A typed named variable scoped to a project. Name is unique within
/// the owning project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub id: Uuid,
    pub name: String,
    pub project_id: Uuid,
    pub project_name: String,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub value: ObservationValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Observation {
    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }
}

/// Fields required to create a new observation, with the value already
/// validated against its declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateObservation {
    pub name: String,
    pub project_id: Uuid,
    pub project_name: String,
    pub organization_id: Uuid,
    pub organization_name: String,
    pub value: ObservationValue,
}

/// Fields that can be updated on an existing observation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateObservation {
    pub name: Option<String>,
    pub value: Option<ObservationValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_matches_declared_type() {
        let v = ObservationValue::from_json(DataType::Number, serde_json::json!(42.5)).unwrap();
        assert_eq!(v, ObservationValue::Number(42.5));
        assert_eq!(v.data_type(), DataType::Number);
    }

    #[test]
    fn mismatched_value_is_rejected() {
        let err = ObservationValue::from_json(DataType::Boolean, serde_json::json!("yes"))
            .unwrap_err();
        assert!(matches!(
            err,
            InspectraError::Validation { ref message } if message.contains("boolean")
        ));
    }

    #[test]
    fn data_type_round_trips_through_string() {
        for dt in [DataType::String, DataType::Boolean, DataType::Number] {
            assert_eq!(DataType::parse(dt.as_str()).unwrap(), dt);
        }
        assert!(DataType::parse("date").is_err());
    }
}
