//! Inspectra Database — SurrealDB connection management, schema
//! migrations, and repository implementations for the `inspectra-core`
//! traits.
//!
//! Repositories are generic over the SurrealDB connection type, so the
//! same code runs against a remote WebSocket server in production and
//! the in-memory engine in tests.

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, connect};
pub use error::DbError;
pub use schema::run_migrations;
