//! Dataset curation operations on [`HierarchyService`].
//!
//! Datasets hold value copies of image summaries; callers snapshot an
//! image with [`DatasetImage::from_image`] before handing it over, and
//! nothing here reaches back into the image table.

use inspectra_core::access::require_admin;
use inspectra_core::error::InspectraResult;
use inspectra_core::models::dataset::{CreateDataset, Dataset, DatasetImage, UpdateDataset};
use inspectra_core::models::principal::Principal;
use inspectra_core::repository::{
    CameraRepository, DatasetRepository, ObservationRepository, OrganizationRepository,
    ProjectRepository, StationRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::access::{ensure_can_read, membership_for};
use crate::hierarchy::HierarchyService;

impl<O, P, S, C, D, V> HierarchyService<O, P, S, C, D, V>
where
    O: OrganizationRepository,
    P: ProjectRepository,
    S: StationRepository,
    C: CameraRepository,
    D: DatasetRepository,
    V: ObservationRepository,
{
    pub async fn create_dataset(
        &self,
        principal: &Principal,
        project_id: Uuid,
        name: String,
        images: Vec<DatasetImage>,
    ) -> InspectraResult<Dataset> {
        let project = self.projects.get_by_id(project_id).await?;
        require_admin(principal)?;

        let dataset = self
            .datasets
            .create(CreateDataset {
                name,
                project_id: project.id,
                organization_id: project.organization_id,
                images,
            })
            .await?;

        info!(id = %dataset.id, project = %project.id, "Dataset created");
        Ok(dataset)
    }

    pub async fn get_dataset(&self, principal: &Principal, id: Uuid) -> InspectraResult<Dataset> {
        let dataset = self.datasets.get_by_id(id).await?;
        ensure_can_read(&self.organizations, principal, dataset.organization_id).await?;
        Ok(dataset)
    }

    pub async fn list_datasets(&self, principal: &Principal) -> InspectraResult<Vec<Dataset>> {
        if principal.is_admin() {
            return self.datasets.list_all().await;
        }
        let membership = membership_for(&self.organizations, principal).await?;
        if membership.is_empty() {
            return Ok(Vec::new());
        }
        self.datasets.list_in_organizations(membership.org_ids()).await
    }

    pub async fn list_datasets_in_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
    ) -> InspectraResult<Vec<Dataset>> {
        let project = self.projects.get_by_id(project_id).await?;
        ensure_can_read(&self.organizations, principal, project.organization_id).await?;
        self.datasets.list_by_project(project.id).await
    }

    pub async fn update_dataset(
        &self,
        principal: &Principal,
        id: Uuid,
        input: UpdateDataset,
    ) -> InspectraResult<Dataset> {
        self.datasets.get_by_id(id).await?;
        require_admin(principal)?;
        self.datasets.update(id, input).await
    }

    pub async fn delete_dataset(&self, principal: &Principal, id: Uuid) -> InspectraResult<()> {
        self.datasets.get_by_id(id).await?;
        require_admin(principal)?;
        self.datasets.delete(id).await
    }

    pub async fn add_dataset_image(
        &self,
        principal: &Principal,
        id: Uuid,
        image: DatasetImage,
    ) -> InspectraResult<Dataset> {
        self.datasets.get_by_id(id).await?;
        require_admin(principal)?;
        self.datasets.add_image(id, image).await
    }

    /// Replace the embedded copy carrying `image.id`; `NotFound` when
    /// the dataset holds no copy with that id.
    pub async fn update_dataset_image(
        &self,
        principal: &Principal,
        id: Uuid,
        image: DatasetImage,
    ) -> InspectraResult<Dataset> {
        self.datasets.get_by_id(id).await?;
        require_admin(principal)?;
        self.datasets.update_image(id, image).await
    }

    pub async fn remove_dataset_image(
        &self,
        principal: &Principal,
        id: Uuid,
        image_id: Uuid,
    ) -> InspectraResult<Dataset> {
        self.datasets.get_by_id(id).await?;
        require_admin(principal)?;
        self.datasets.remove_image(id, image_id).await
    }

    pub async fn count_datasets_in_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
    ) -> InspectraResult<u64> {
        let project = self.projects.get_by_id(project_id).await?;
        ensure_can_read(&self.organizations, principal, project.organization_id).await?;
        self.datasets.count_by_project(project.id).await
    }
}
