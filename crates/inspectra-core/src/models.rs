//! Domain models for Inspectra.
//!
//! The resource hierarchy is Organization → Project → InspectionStation
//! → Camera, with Images produced by cameras and Datasets/Observations
//! scoped to projects. Denormalized ancestor fields (`*_name`,
//! `organization_id` on a camera, etc.) are stamped at creation time and
//! never refreshed on ancestor rename.

pub mod camera;
pub mod dataset;
pub mod image;
pub mod observation;
pub mod organization;
pub mod principal;
pub mod project;
pub mod station;
