//! Connecting the platform to SurrealDB.
//!
//! The server is configured entirely through `INSPECTRA_DB_*`
//! environment variables, with fallbacks that match a local
//! `surreal start` so development needs no configuration at all.
//! [`connect`] hands back the raw client; callers clone it into each
//! repository.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

/// Connection settings for the platform database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl DbConfig {
    /// Collect the `INSPECTRA_DB_*` environment, falling back to
    /// local-development defaults.
    pub fn from_env() -> Self {
        Self {
            url: env_or("INSPECTRA_DB_URL", "127.0.0.1:8000"),
            namespace: env_or("INSPECTRA_DB_NAMESPACE", "inspectra"),
            database: env_or("INSPECTRA_DB_DATABASE", "main"),
            username: env_or("INSPECTRA_DB_USERNAME", "root"),
            password: env_or("INSPECTRA_DB_PASSWORD", "root"),
        }
    }
}

/// Open a WebSocket connection, authenticate as root and select the
/// configured namespace and database.
pub async fn connect(config: &DbConfig) -> Result<Surreal<Client>, surrealdb::Error> {
    info!(
        url = %config.url,
        namespace = %config.namespace,
        database = %config.database,
        "Connecting to SurrealDB"
    );

    let db = Surreal::new::<Ws>(&config.url).await?;

    db.signin(Root {
        username: config.username.clone(),
        password: config.password.clone(),
    })
    .await?;

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;

    Ok(db)
}
