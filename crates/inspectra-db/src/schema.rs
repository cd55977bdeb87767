//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity. UUIDs
//! are stored as strings. The UNIQUE indexes implement the scoped
//! name-uniqueness invariants (organization name globally; project name
//! per organization; station per project; camera per station;
//! observation per project) — writes that violate them fail at the
//! store and are mapped to `Conflict`.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations (global scope, tenant boundary)
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD description ON TABLE organization TYPE string DEFAULT '';
DEFINE FIELD members ON TABLE organization TYPE array DEFAULT [];
DEFINE FIELD members.* ON TABLE organization TYPE object FLEXIBLE;
DEFINE FIELD created_by ON TABLE organization TYPE string;
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_organization_name ON TABLE organization \
    COLUMNS name UNIQUE;

-- =======================================================================
-- Projects (scoped to organization)
-- =======================================================================
DEFINE TABLE project SCHEMAFULL;
DEFINE FIELD name ON TABLE project TYPE string;
DEFINE FIELD description ON TABLE project TYPE string DEFAULT '';
DEFINE FIELD organization_id ON TABLE project TYPE string;
DEFINE FIELD organization_name ON TABLE project TYPE string;
DEFINE FIELD created_by ON TABLE project TYPE string;
DEFINE FIELD active ON TABLE project TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_project_org_name ON TABLE project \
    COLUMNS organization_id, name UNIQUE;

-- =======================================================================
-- Inspection stations (scoped to project)
-- =======================================================================
DEFINE TABLE inspection_station SCHEMAFULL;
DEFINE FIELD name ON TABLE inspection_station TYPE string;
DEFINE FIELD description ON TABLE inspection_station TYPE string \
    DEFAULT '';
DEFINE FIELD organization_id ON TABLE inspection_station TYPE string;
DEFINE FIELD organization_name ON TABLE inspection_station TYPE string;
DEFINE FIELD project_id ON TABLE inspection_station TYPE string;
DEFINE FIELD project_name ON TABLE inspection_station TYPE string;
DEFINE FIELD cameras ON TABLE inspection_station TYPE array DEFAULT [];
DEFINE FIELD cameras.* ON TABLE inspection_station TYPE object FLEXIBLE;
DEFINE FIELD created_by ON TABLE inspection_station TYPE string;
DEFINE FIELD created_at ON TABLE inspection_station TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE inspection_station TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_station_project_name ON TABLE inspection_station \
    COLUMNS project_id, name UNIQUE;

-- =======================================================================
-- Cameras (scoped to station, full ancestor chain denormalized)
-- =======================================================================
DEFINE TABLE camera SCHEMAFULL;
DEFINE FIELD name ON TABLE camera TYPE string;
DEFINE FIELD inspection_station_id ON TABLE camera TYPE string;
DEFINE FIELD inspection_station_name ON TABLE camera TYPE string;
DEFINE FIELD project_id ON TABLE camera TYPE string;
DEFINE FIELD project_name ON TABLE camera TYPE string;
DEFINE FIELD organization_id ON TABLE camera TYPE string;
DEFINE FIELD organization_name ON TABLE camera TYPE string;
DEFINE FIELD created_by ON TABLE camera TYPE string;
DEFINE FIELD created_at ON TABLE camera TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE camera TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_camera_station_name ON TABLE camera \
    COLUMNS inspection_station_id, name UNIQUE;

-- =======================================================================
-- Images (leaf entities, ancestor refs embedded)
-- =======================================================================
DEFINE TABLE image SCHEMAFULL;
DEFINE FIELD filename ON TABLE image TYPE string;
DEFINE FIELD organization ON TABLE image TYPE object FLEXIBLE;
DEFINE FIELD project ON TABLE image TYPE object FLEXIBLE;
DEFINE FIELD inspection_station ON TABLE image TYPE object FLEXIBLE;
DEFINE FIELD camera ON TABLE image TYPE object FLEXIBLE;
DEFINE FIELD full_path ON TABLE image TYPE string;
DEFINE FIELD url ON TABLE image TYPE option<string>;
DEFINE FIELD ground_truth ON TABLE image TYPE any;
DEFINE FIELD inference ON TABLE image TYPE any;
DEFINE FIELD created_at ON TABLE image TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE image TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Datasets (curated image snapshots, scoped to project)
-- =======================================================================
DEFINE TABLE dataset SCHEMAFULL;
DEFINE FIELD name ON TABLE dataset TYPE string;
DEFINE FIELD project_id ON TABLE dataset TYPE string;
DEFINE FIELD organization_id ON TABLE dataset TYPE string;
DEFINE FIELD images ON TABLE dataset TYPE array DEFAULT [];
DEFINE FIELD images.* ON TABLE dataset TYPE object FLEXIBLE;
DEFINE FIELD created_at ON TABLE dataset TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE dataset TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Observations (typed named variables, scoped to project)
-- =======================================================================
DEFINE TABLE observation SCHEMAFULL;
DEFINE FIELD name ON TABLE observation TYPE string;
DEFINE FIELD project_id ON TABLE observation TYPE string;
DEFINE FIELD project_name ON TABLE observation TYPE string;
DEFINE FIELD organization_id ON TABLE observation TYPE string;
DEFINE FIELD organization_name ON TABLE observation TYPE string;
DEFINE FIELD data_type ON TABLE observation TYPE string \
    ASSERT $value IN ['string', 'boolean', 'number'];
DEFINE FIELD value ON TABLE observation TYPE any;
DEFINE FIELD created_at ON TABLE observation TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE observation TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_observation_project_name ON TABLE observation \
    COLUMNS project_id, name UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;
        }
    }

    Ok(())
}
