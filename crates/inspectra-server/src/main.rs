//! Inspectra Server — application entry point.
//!
//! Reads configuration from the environment, connects to SurrealDB,
//! applies pending migrations and wires the services to the configured
//! storage backend. No transport is bundled; a host process embeds the
//! services directly.

use inspectra_db::DbConfig;
use inspectra_db::repository::{
    SurrealCameraRepository, SurrealDatasetRepository, SurrealImageRepository,
    SurrealObservationRepository, SurrealOrganizationRepository, SurrealProjectRepository,
    SurrealStationRepository,
};
use inspectra_service::{HierarchyService, MediaService};
use inspectra_storage::{FsStorage, S3Config, S3Storage, StorageBackend};
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Client;
use tracing_subscriber::EnvFilter;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("inspectra=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Inspectra server...");

    let db = match inspectra_db::connect(&DbConfig::from_env()).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, "Database connection failed");
            std::process::exit(1);
        }
    };

    if let Err(err) = inspectra_db::run_migrations(&db).await {
        tracing::error!(error = %err, "Migrations failed");
        std::process::exit(1);
    }

    match env_or("INSPECTRA_STORAGE", "fs").as_str() {
        "s3" => {
            let backend = S3Storage::new(S3Config {
                bucket: env_or("INSPECTRA_S3_BUCKET", "inspectra-media"),
                region: env_or("INSPECTRA_S3_REGION", "us-east-1"),
                endpoint_url: std::env::var("INSPECTRA_S3_ENDPOINT").ok(),
                force_path_style: env_or("INSPECTRA_S3_PATH_STYLE", "false") == "true",
            });
            build_services(db.clone(), backend);
        }
        _ => {
            let backend = FsStorage::new(env_or("INSPECTRA_STORAGE_ROOT", "./media"));
            build_services(db, backend);
        }
    }

    tracing::info!("Inspectra services initialized");
}

fn build_services<B: StorageBackend>(
    db: Surreal<Client>,
    backend: B,
) -> (
    HierarchyService<
        SurrealOrganizationRepository<Client>,
        SurrealProjectRepository<Client>,
        SurrealStationRepository<Client>,
        SurrealCameraRepository<Client>,
        SurrealDatasetRepository<Client>,
        SurrealObservationRepository<Client>,
    >,
    MediaService<
        SurrealOrganizationRepository<Client>,
        SurrealProjectRepository<Client>,
        SurrealStationRepository<Client>,
        SurrealCameraRepository<Client>,
        SurrealImageRepository<Client>,
        B,
    >,
) {
    let hierarchy = HierarchyService::new(
        SurrealOrganizationRepository::new(db.clone()),
        SurrealProjectRepository::new(db.clone()),
        SurrealStationRepository::new(db.clone()),
        SurrealCameraRepository::new(db.clone()),
        SurrealDatasetRepository::new(db.clone()),
        SurrealObservationRepository::new(db.clone()),
    );
    let media = MediaService::new(
        SurrealOrganizationRepository::new(db.clone()),
        SurrealProjectRepository::new(db.clone()),
        SurrealStationRepository::new(db.clone()),
        SurrealCameraRepository::new(db.clone()),
        SurrealImageRepository::new(db),
        backend,
    );
    (hierarchy, media)
}
