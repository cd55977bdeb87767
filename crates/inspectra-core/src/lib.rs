//! Inspectra Core — domain models, error taxonomy, repository traits,
//! the authorization engine, and the storage path builder.
//!
//! This crate is I/O-free. Persistence lives in `inspectra-db`, byte
//! storage in `inspectra-storage`, and orchestration in
//! `inspectra-service`.

pub mod access;
pub mod error;
pub mod models;
pub mod path;
pub mod repository;
