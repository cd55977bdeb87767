//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. `list_in_organizations` methods
//! power the role-aware read paths: the caller supplies the principal's
//! membership set and the store filters with one set-membership query.
//!
//! Uniqueness invariants (organization name globally; project name per
//! organization; station per project; camera per station; observation
//! per project) are enforced by the store's unique indexes and surfaced
//! as [`InspectraError::Conflict`](crate::error::InspectraError).

use uuid::Uuid;

use crate::error::InspectraResult;
use crate::models::{
    camera::{Camera, CreateCamera, UpdateCamera},
    dataset::{CreateDataset, Dataset, DatasetImage, UpdateDataset},
    image::{CreateImage, Image, ImageScope},
    observation::{CreateObservation, Observation, UpdateObservation},
    organization::{AddMember, CreateOrganization, Organization, UpdateOrganization},
    project::{CreateProject, Project, UpdateProject},
    station::{CameraRef, CreateInspectionStation, InspectionStation, UpdateInspectionStation},
};

// ---------------------------------------------------------------------------
// Organization (global scope)
// ---------------------------------------------------------------------------

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = InspectraResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = InspectraResult<Organization>> + Send;
    fn list_all(&self) -> impl Future<Output = InspectraResult<Vec<Organization>>> + Send;
    /// Organizations where the user is creator or listed member — the
    /// membership index consumed by the authorization engine.
    fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Vec<Organization>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateOrganization,
    ) -> impl Future<Output = InspectraResult<Organization>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = InspectraResult<()>> + Send;
    fn add_member(
        &self,
        id: Uuid,
        member: AddMember,
    ) -> impl Future<Output = InspectraResult<Organization>> + Send;
    fn remove_member(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Organization>> + Send;
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

pub trait ProjectRepository: Send + Sync {
    fn create(
        &self,
        input: CreateProject,
    ) -> impl Future<Output = InspectraResult<Project>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = InspectraResult<Project>> + Send;
    fn list_all(&self) -> impl Future<Output = InspectraResult<Vec<Project>>> + Send;
    fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Vec<Project>>> + Send;
    fn list_in_organizations(
        &self,
        org_ids: Vec<Uuid>,
    ) -> impl Future<Output = InspectraResult<Vec<Project>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProject,
    ) -> impl Future<Output = InspectraResult<Project>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = InspectraResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Inspection station
// ---------------------------------------------------------------------------

pub trait StationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateInspectionStation,
    ) -> impl Future<Output = InspectraResult<InspectionStation>> + Send;
    fn get_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = InspectraResult<InspectionStation>> + Send;
    fn list_all(&self) -> impl Future<Output = InspectraResult<Vec<InspectionStation>>> + Send;
    fn list_by_project(
        &self,
        project_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Vec<InspectionStation>>> + Send;
    fn list_in_organizations(
        &self,
        org_ids: Vec<Uuid>,
    ) -> impl Future<Output = InspectraResult<Vec<InspectionStation>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateInspectionStation,
    ) -> impl Future<Output = InspectraResult<InspectionStation>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = InspectraResult<()>> + Send;

    // Maintenance of the embedded cameras mirror.
    fn append_camera(
        &self,
        station_id: Uuid,
        camera: CameraRef,
    ) -> impl Future<Output = InspectraResult<()>> + Send;
    fn rename_camera(
        &self,
        station_id: Uuid,
        camera_id: Uuid,
        name: String,
    ) -> impl Future<Output = InspectraResult<()>> + Send;
    fn remove_camera(
        &self,
        station_id: Uuid,
        camera_id: Uuid,
    ) -> impl Future<Output = InspectraResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

pub trait CameraRepository: Send + Sync {
    fn create(&self, input: CreateCamera)
    -> impl Future<Output = InspectraResult<Camera>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = InspectraResult<Camera>> + Send;
    fn list_all(&self) -> impl Future<Output = InspectraResult<Vec<Camera>>> + Send;
    fn list_by_station(
        &self,
        station_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Vec<Camera>>> + Send;
    fn list_by_project(
        &self,
        project_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Vec<Camera>>> + Send;
    fn list_in_organizations(
        &self,
        org_ids: Vec<Uuid>,
    ) -> impl Future<Output = InspectraResult<Vec<Camera>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateCamera,
    ) -> impl Future<Output = InspectraResult<Camera>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = InspectraResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

pub trait ImageRepository: Send + Sync {
    fn create(&self, input: CreateImage) -> impl Future<Output = InspectraResult<Image>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = InspectraResult<Image>> + Send;
    fn list_all(&self) -> impl Future<Output = InspectraResult<Vec<Image>>> + Send;
    fn list_by_camera(
        &self,
        camera_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Vec<Image>>> + Send;
    fn list_in_organizations(
        &self,
        org_ids: Vec<Uuid>,
    ) -> impl Future<Output = InspectraResult<Vec<Image>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = InspectraResult<()>> + Send;
    fn count_by_scope(
        &self,
        scope: ImageScope,
        id: Uuid,
    ) -> impl Future<Output = InspectraResult<u64>> + Send;
    fn update_ground_truth(
        &self,
        id: Uuid,
        data: serde_json::Value,
    ) -> impl Future<Output = InspectraResult<Image>> + Send;
    /// Images of a camera that have no ground truth yet.
    fn list_pending_annotation(
        &self,
        camera_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Vec<Image>>> + Send;
    fn count_annotated(
        &self,
        project_id: Uuid,
    ) -> impl Future<Output = InspectraResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

pub trait DatasetRepository: Send + Sync {
    fn create(
        &self,
        input: CreateDataset,
    ) -> impl Future<Output = InspectraResult<Dataset>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = InspectraResult<Dataset>> + Send;
    fn list_all(&self) -> impl Future<Output = InspectraResult<Vec<Dataset>>> + Send;
    fn list_by_project(
        &self,
        project_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Vec<Dataset>>> + Send;
    fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Vec<Dataset>>> + Send;
    fn list_in_organizations(
        &self,
        org_ids: Vec<Uuid>,
    ) -> impl Future<Output = InspectraResult<Vec<Dataset>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateDataset,
    ) -> impl Future<Output = InspectraResult<Dataset>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = InspectraResult<()>> + Send;
    fn add_image(
        &self,
        id: Uuid,
        image: DatasetImage,
    ) -> impl Future<Output = InspectraResult<Dataset>> + Send;
    /// Replace the embedded copy with the same `image.id`; fails with
    /// `NotFound` when no embedded copy carries that id.
    fn update_image(
        &self,
        id: Uuid,
        image: DatasetImage,
    ) -> impl Future<Output = InspectraResult<Dataset>> + Send;
    /// Drop the embedded copy with `image_id`; fails with `NotFound`
    /// when no embedded copy carries that id.
    fn remove_image(
        &self,
        id: Uuid,
        image_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Dataset>> + Send;
    fn count_by_project(
        &self,
        project_id: Uuid,
    ) -> impl Future<Output = InspectraResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

pub trait ObservationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateObservation,
    ) -> impl Future<Output = InspectraResult<Observation>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = InspectraResult<Observation>> + Send;
    fn list_all(&self) -> impl Future<Output = InspectraResult<Vec<Observation>>> + Send;
    fn list_by_project(
        &self,
        project_id: Uuid,
    ) -> impl Future<Output = InspectraResult<Vec<Observation>>> + Send;
    fn list_in_organizations(
        &self,
        org_ids: Vec<Uuid>,
    ) -> impl Future<Output = InspectraResult<Vec<Observation>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateObservation,
    ) -> impl Future<Output = InspectraResult<Observation>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = InspectraResult<()>> + Send;
}
