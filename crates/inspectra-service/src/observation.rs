//! Observation operations on [`HierarchyService`].

use inspectra_core::access::require_admin;
use inspectra_core::error::InspectraResult;
use inspectra_core::models::observation::{
    CreateObservation, DataType, Observation, ObservationValue, UpdateObservation,
};
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
    /// Create a typed observation. The raw JSON value is validated
    /// against the declared type before anything touches the store.
    pub async fn create_observation(
        &self,
        principal: &Principal,
        project_id: Uuid,
        name: String,
        data_type: DataType,
        value: serde_json::Value,
    ) -> InspectraResult<Observation> {
        let project = self.projects.get_by_id(project_id).await?;
        require_admin(principal)?;

        let value = ObservationValue::from_json(data_type, value)?;
        let observation = self
            .observations
            .create(CreateObservation {
                name,
                project_id: project.id,
                project_name: project.name,
                organization_id: project.organization_id,
                organization_name: project.organization_name,
                value,
            })
            .await?;

        info!(id = %observation.id, project = %project.id, "Observation created");
        Ok(observation)
    }

    pub async fn get_observation(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> InspectraResult<Observation> {
        let observation = self.observations.get_by_id(id).await?;
        ensure_can_read(&self.organizations, principal, observation.organization_id).await?;
        Ok(observation)
    }

    pub async fn list_observations(
        &self,
        principal: &Principal,
    ) -> InspectraResult<Vec<Observation>> {
        if principal.is_admin() {
            return self.observations.list_all().await;
        }
        let membership = membership_for(&self.organizations, principal).await?;
        if membership.is_empty() {
            return Ok(Vec::new());
        }
        self.observations
            .list_in_organizations(membership.org_ids())
            .await
    }

    pub async fn list_observations_in_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
    ) -> InspectraResult<Vec<Observation>> {
        let project = self.projects.get_by_id(project_id).await?;
        ensure_can_read(&self.organizations, principal, project.organization_id).await?;
        self.observations.list_by_project(project.id).await
    }

    pub async fn update_observation(
        &self,
        principal: &Principal,
        id: Uuid,
        input: UpdateObservation,
    ) -> InspectraResult<Observation> {
        self.observations.get_by_id(id).await?;
        require_admin(principal)?;
        self.observations.update(id, input).await
    }

    pub async fn delete_observation(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> InspectraResult<()> {
        self.observations.get_by_id(id).await?;
        require_admin(principal)?;
        self.observations.delete(id).await
    }
}
