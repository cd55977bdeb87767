//! Media ingestion pipeline.
//!
//! Uploads resolve the camera once, build one storage key for the
//! batch, then process files sequentially in the supplied order. Each
//! file succeeds or fails on its own; the outcome reports exactly the
//! persisted subset. Image deletion is two-phase: the backend delete
//! is best effort (failures are logged), the metadata record is always
//! removed.

use chrono::Utc;
use inspectra_core::access::require_admin;
use inspectra_core::error::{InspectraError, InspectraResult};
use inspectra_core::models::camera::Camera;
use inspectra_core::models::image::{CreateImage, EntityRef, Image, ImageScope};
use inspectra_core::models::principal::Principal;
use inspectra_core::path::build_storage_key;
use inspectra_core::repository::{
    CameraRepository, ImageRepository, OrganizationRepository, ProjectRepository,
    StationRepository,
};
use inspectra_storage::{StorageBackend, extract_capture_metadata};
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::{ensure_can_read, membership_for};

/// One file in an upload batch.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A file that did not make it into the store.
#[derive(Debug)]
pub struct UploadFailure {
    pub filename: String,
    pub error: InspectraError,
}

/// Result of an upload batch: the persisted subset plus per-file
/// failures, in the original order within each list.
#[derive(Debug, Default)]
pub struct UploadOutcome {
    pub saved: Vec<Image>,
    pub failed: Vec<UploadFailure>,
}

/// Aggregate image counts for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDashboard {
    pub total_images: u64,
    pub camera_count: u64,
    pub annotated: u64,
    pub pending: u64,
}

/// Media ingestion and retrieval, generic over repositories and the
/// storage backend.
pub struct MediaService<O, P, S, C, I, B> {
    organizations: O,
    projects: P,
    stations: S,
    cameras: C,
    images: I,
    backend: B,
}

impl<O, P, S, C, I, B> MediaService<O, P, S, C, I, B>
where
    O: OrganizationRepository,
    P: ProjectRepository,
    S: StationRepository,
    C: CameraRepository,
    I: ImageRepository,
    B: StorageBackend,
{
    pub fn new(
        organizations: O,
        projects: P,
        stations: S,
        cameras: C,
        images: I,
        backend: B,
    ) -> Self {
        Self {
            organizations,
            projects,
            stations,
            cameras,
            images,
            backend,
        }
    }

    /// Upload a batch of images for a camera.
    pub async fn upload_images(
        &self,
        principal: &Principal,
        camera_id: Uuid,
        files: Vec<UploadFile>,
    ) -> InspectraResult<UploadOutcome> {
        self.upload_batch(principal, camera_id, files, false).await
    }

    /// Upload a batch of images and attach EXIF-derived capture
    /// metadata to each record. Extraction is best effort per file.
    pub async fn upload_inference_images(
        &self,
        principal: &Principal,
        camera_id: Uuid,
        files: Vec<UploadFile>,
    ) -> InspectraResult<UploadOutcome> {
        self.upload_batch(principal, camera_id, files, true).await
    }

    async fn upload_batch(
        &self,
        principal: &Principal,
        camera_id: Uuid,
        files: Vec<UploadFile>,
        extract_metadata: bool,
    ) -> InspectraResult<UploadOutcome> {
        let camera = self.cameras.get_by_id(camera_id).await?;
        require_admin(principal)?;

        // One key for the whole batch.
        let key = build_storage_key(&camera, Utc::now());
        let mut outcome = UploadOutcome::default();

        for file in files {
            match self.store_one(&camera, &key, &file, extract_metadata).await {
                Ok(image) => outcome.saved.push(image),
                Err(error) => {
                    warn!(
                        filename = %file.filename,
                        error = %error,
                        "Upload failed for one file, continuing batch"
                    );
                    outcome.failed.push(UploadFailure {
                        filename: file.filename,
                        error,
                    });
                }
            }
        }

        info!(
            camera = %camera.id,
            saved = outcome.saved.len(),
            failed = outcome.failed.len(),
            "Upload batch finished"
        );
        Ok(outcome)
    }

    async fn store_one(
        &self,
        camera: &Camera,
        key: &str,
        file: &UploadFile,
        extract_metadata: bool,
    ) -> InspectraResult<Image> {
        let stored = self
            .backend
            .put(key, &file.filename, &file.content_type, &file.bytes)
            .await?;

        let inference = if extract_metadata {
            extract_capture_metadata(&file.bytes).to_json()
        } else {
            None
        };

        self.images
            .create(CreateImage {
                filename: stored.filename,
                organization: EntityRef {
                    id: camera.organization_id,
                    name: camera.organization_name.clone(),
                },
                project: EntityRef {
                    id: camera.project_id,
                    name: camera.project_name.clone(),
                },
                inspection_station: EntityRef {
                    id: camera.inspection_station_id,
                    name: camera.inspection_station_name.clone(),
                },
                camera: EntityRef {
                    id: camera.id,
                    name: camera.name.clone(),
                },
                full_path: stored.path,
                url: stored.url,
                inference,
            })
            .await
    }

    /// Delete an image: best-effort backend delete, unconditional
    /// metadata delete.
    pub async fn delete_image(&self, principal: &Principal, id: Uuid) -> InspectraResult<()> {
        let image = self.images.get_by_id(id).await?;
        require_admin(principal)?;

        if let Err(error) = self.backend.delete(&image.full_path).await {
            warn!(
                key = %image.full_path,
                error = %error,
                "Backend delete failed, removing metadata anyway"
            );
        }
        self.images.delete(id).await?;

        info!(id = %id, key = %image.full_path, "Image deleted");
        Ok(())
    }

    pub async fn get_image(&self, principal: &Principal, id: Uuid) -> InspectraResult<Image> {
        let image = self.images.get_by_id(id).await?;
        ensure_can_read(&self.organizations, principal, image.organization.id).await?;
        Ok(image)
    }

    /// Fetch the raw bytes of an image from the backend.
    pub async fn get_image_bytes(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> InspectraResult<Vec<u8>> {
        let image = self.get_image(principal, id).await?;
        Ok(self.backend.get(&image.full_path).await?)
    }

    pub async fn list_images(&self, principal: &Principal) -> InspectraResult<Vec<Image>> {
        if principal.is_admin() {
            return self.images.list_all().await;
        }
        let membership = membership_for(&self.organizations, principal).await?;
        if membership.is_empty() {
            return Ok(Vec::new());
        }
        self.images.list_in_organizations(membership.org_ids()).await
    }

    pub async fn list_images_by_camera(
        &self,
        principal: &Principal,
        camera_id: Uuid,
    ) -> InspectraResult<Vec<Image>> {
        let camera = self.cameras.get_by_id(camera_id).await?;
        ensure_can_read(&self.organizations, principal, camera.organization_id).await?;
        self.images.list_by_camera(camera.id).await
    }

    /// Count images at any hierarchy level. The scoping entity is
    /// resolved first so a missing id is `NotFound` and reads outside
    /// the membership set are `Forbidden`.
    pub async fn count_images(
        &self,
        principal: &Principal,
        scope: ImageScope,
        id: Uuid,
    ) -> InspectraResult<u64> {
        let org_id = match scope {
            ImageScope::Organization => self.organizations.get_by_id(id).await?.id,
            ImageScope::Project => self.projects.get_by_id(id).await?.organization_id,
            ImageScope::Station => self.stations.get_by_id(id).await?.organization_id,
            ImageScope::Camera => self.cameras.get_by_id(id).await?.organization_id,
        };
        ensure_can_read(&self.organizations, principal, org_id).await?;
        self.images.count_by_scope(scope, id).await
    }

    /// Attach or replace the human annotation on an image.
    pub async fn update_ground_truth(
        &self,
        principal: &Principal,
        id: Uuid,
        data: serde_json::Value,
    ) -> InspectraResult<Image> {
        self.images.get_by_id(id).await?;
        require_admin(principal)?;
        self.images.update_ground_truth(id, data).await
    }

    /// Images of a camera still waiting for a ground-truth annotation.
    pub async fn list_pending_annotation(
        &self,
        principal: &Principal,
        camera_id: Uuid,
    ) -> InspectraResult<Vec<Image>> {
        let camera = self.cameras.get_by_id(camera_id).await?;
        ensure_can_read(&self.organizations, principal, camera.organization_id).await?;
        self.images.list_pending_annotation(camera.id).await
    }

    /// Aggregate annotation progress for a project.
    pub async fn project_dashboard(
        &self,
        principal: &Principal,
        project_id: Uuid,
    ) -> InspectraResult<ProjectDashboard> {
        let project = self.projects.get_by_id(project_id).await?;
        ensure_can_read(&self.organizations, principal, project.organization_id).await?;

        let total_images = self
            .images
            .count_by_scope(ImageScope::Project, project.id)
            .await?;
        let annotated = self.images.count_annotated(project.id).await?;
        let camera_count = self.cameras.list_by_project(project.id).await?.len() as u64;

        Ok(ProjectDashboard {
            total_images,
            camera_count,
            annotated,
            pending: total_images.saturating_sub(annotated),
        })
    }
}
