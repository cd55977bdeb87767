//! Hierarchy management: organizations, projects, stations, cameras.
//!
//! Every operation follows the same discipline: resolve the resource
//! first (missing resources surface as `NotFound` before any access
//! decision), then gate — writes are admin-only, reads require
//! membership of the owning organization. Deletes cascade explicitly
//! down the ownership chain; images are intentionally left in place
//! when their camera goes away.

use inspectra_core::access::require_admin;
use inspectra_core::error::InspectraResult;
use inspectra_core::models::camera::{Camera, CreateCamera, UpdateCamera};
use inspectra_core::models::organization::{
    AddMember, CreateOrganization, Organization, UpdateOrganization,
};
use inspectra_core::models::principal::Principal;
use inspectra_core::models::project::{CreateProject, Project, UpdateProject};
use inspectra_core::models::station::{
    CameraRef, CreateInspectionStation, InspectionStation, UpdateInspectionStation,
};
use inspectra_core::repository::{
    CameraRepository, DatasetRepository, ObservationRepository, OrganizationRepository,
    ProjectRepository, StationRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::access::{ensure_can_read, membership_for};

/// CRUD plus cascading deletes over the resource hierarchy, generic
/// over the repository implementations.
pub struct HierarchyService<O, P, S, C, D, V> {
    pub(crate) organizations: O,
    pub(crate) projects: P,
    pub(crate) stations: S,
    pub(crate) cameras: C,
    pub(crate) datasets: D,
    pub(crate) observations: V,
}

impl<O, P, S, C, D, V> HierarchyService<O, P, S, C, D, V>
where
    O: OrganizationRepository,
    P: ProjectRepository,
    S: StationRepository,
    C: CameraRepository,
    D: DatasetRepository,
    V: ObservationRepository,
{
    pub fn new(
        organizations: O,
        projects: P,
        stations: S,
        cameras: C,
        datasets: D,
        observations: V,
    ) -> Self {
        Self {
            organizations,
            projects,
            stations,
            cameras,
            datasets,
            observations,
        }
    }

    // -------------------------------------------------------------------
    // Organizations
    // -------------------------------------------------------------------

    pub async fn create_organization(
        &self,
        principal: &Principal,
        name: String,
        description: Option<String>,
    ) -> InspectraResult<Organization> {
        require_admin(principal)?;

        let org = self
            .organizations
            .create(CreateOrganization {
                name,
                description,
                created_by: principal.id,
            })
            .await?;

        info!(id = %org.id, name = %org.name, "Organization created");
        Ok(org)
    }

    pub async fn get_organization(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> InspectraResult<Organization> {
        let org = self.organizations.get_by_id(id).await?;
        ensure_can_read(&self.organizations, principal, org.id).await?;
        Ok(org)
    }

    pub async fn list_organizations(
        &self,
        principal: &Principal,
    ) -> InspectraResult<Vec<Organization>> {
        if principal.is_admin() {
            self.organizations.list_all().await
        } else {
            self.organizations.list_for_user(principal.id).await
        }
    }

    pub async fn update_organization(
        &self,
        principal: &Principal,
        id: Uuid,
        input: UpdateOrganization,
    ) -> InspectraResult<Organization> {
        self.organizations.get_by_id(id).await?;
        require_admin(principal)?;
        self.organizations.update(id, input).await
    }

    /// Delete an organization and everything below it: every project is
    /// removed through the project cascade first.
    pub async fn delete_organization(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> InspectraResult<()> {
        self.organizations.get_by_id(id).await?;
        require_admin(principal)?;

        for project in self.projects.list_by_organization(id).await? {
            self.cascade_delete_project(project.id).await?;
        }
        self.organizations.delete(id).await?;

        info!(id = %id, "Organization deleted with cascade");
        Ok(())
    }

    pub async fn add_member(
        &self,
        principal: &Principal,
        org_id: Uuid,
        member: AddMember,
    ) -> InspectraResult<Organization> {
        self.organizations.get_by_id(org_id).await?;
        require_admin(principal)?;
        self.organizations.add_member(org_id, member).await
    }

    pub async fn remove_member(
        &self,
        principal: &Principal,
        org_id: Uuid,
        user_id: Uuid,
    ) -> InspectraResult<Organization> {
        self.organizations.get_by_id(org_id).await?;
        require_admin(principal)?;
        self.organizations.remove_member(org_id, user_id).await
    }

    // -------------------------------------------------------------------
    // Projects
    // -------------------------------------------------------------------

    pub async fn create_project(
        &self,
        principal: &Principal,
        organization_id: Uuid,
        name: String,
        description: Option<String>,
    ) -> InspectraResult<Project> {
        let org = self.organizations.get_by_id(organization_id).await?;
        require_admin(principal)?;

        let project = self
            .projects
            .create(CreateProject {
                name,
                description,
                organization_id: org.id,
                organization_name: org.name,
                created_by: principal.id,
            })
            .await?;

        info!(id = %project.id, organization = %org.id, "Project created");
        Ok(project)
    }

    pub async fn get_project(&self, principal: &Principal, id: Uuid) -> InspectraResult<Project> {
        let project = self.projects.get_by_id(id).await?;
        ensure_can_read(&self.organizations, principal, project.organization_id).await?;
        Ok(project)
    }

    pub async fn list_projects(&self, principal: &Principal) -> InspectraResult<Vec<Project>> {
        if principal.is_admin() {
            return self.projects.list_all().await;
        }
        let membership = membership_for(&self.organizations, principal).await?;
        if membership.is_empty() {
            return Ok(Vec::new());
        }
        self.projects.list_in_organizations(membership.org_ids()).await
    }

    pub async fn list_projects_in_organization(
        &self,
        principal: &Principal,
        organization_id: Uuid,
    ) -> InspectraResult<Vec<Project>> {
        let org = self.organizations.get_by_id(organization_id).await?;
        ensure_can_read(&self.organizations, principal, org.id).await?;
        self.projects.list_by_organization(org.id).await
    }

    pub async fn update_project(
        &self,
        principal: &Principal,
        id: Uuid,
        input: UpdateProject,
    ) -> InspectraResult<Project> {
        self.projects.get_by_id(id).await?;
        require_admin(principal)?;
        self.projects.update(id, input).await
    }

    pub async fn delete_project(&self, principal: &Principal, id: Uuid) -> InspectraResult<()> {
        self.projects.get_by_id(id).await?;
        require_admin(principal)?;
        self.cascade_delete_project(id).await
    }

    /// Remove a project and its stations, cameras, datasets and
    /// observations. Image records survive deliberately.
    async fn cascade_delete_project(&self, id: Uuid) -> InspectraResult<()> {
        for station in self.stations.list_by_project(id).await? {
            self.cascade_delete_station(station.id).await?;
        }
        for dataset in self.datasets.list_by_project(id).await? {
            self.datasets.delete(dataset.id).await?;
        }
        for observation in self.observations.list_by_project(id).await? {
            self.observations.delete(observation.id).await?;
        }
        self.projects.delete(id).await?;

        info!(id = %id, "Project deleted with cascade");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Inspection stations
    // -------------------------------------------------------------------

    pub async fn create_station(
        &self,
        principal: &Principal,
        project_id: Uuid,
        name: String,
        description: Option<String>,
    ) -> InspectraResult<InspectionStation> {
        let project = self.projects.get_by_id(project_id).await?;
        require_admin(principal)?;

        let station = self
            .stations
            .create(CreateInspectionStation {
                name,
                description,
                organization_id: project.organization_id,
                organization_name: project.organization_name,
                project_id: project.id,
                project_name: project.name,
                created_by: principal.id,
            })
            .await?;

        info!(id = %station.id, project = %project.id, "Inspection station created");
        Ok(station)
    }

    pub async fn get_station(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> InspectraResult<InspectionStation> {
        let station = self.stations.get_by_id(id).await?;
        ensure_can_read(&self.organizations, principal, station.organization_id).await?;
        Ok(station)
    }

    pub async fn list_stations(
        &self,
        principal: &Principal,
    ) -> InspectraResult<Vec<InspectionStation>> {
        if principal.is_admin() {
            return self.stations.list_all().await;
        }
        let membership = membership_for(&self.organizations, principal).await?;
        if membership.is_empty() {
            return Ok(Vec::new());
        }
        self.stations.list_in_organizations(membership.org_ids()).await
    }

    pub async fn list_stations_in_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
    ) -> InspectraResult<Vec<InspectionStation>> {
        let project = self.projects.get_by_id(project_id).await?;
        ensure_can_read(&self.organizations, principal, project.organization_id).await?;
        self.stations.list_by_project(project.id).await
    }

    pub async fn update_station(
        &self,
        principal: &Principal,
        id: Uuid,
        input: UpdateInspectionStation,
    ) -> InspectraResult<InspectionStation> {
        self.stations.get_by_id(id).await?;
        require_admin(principal)?;
        self.stations.update(id, input).await
    }

    pub async fn delete_station(&self, principal: &Principal, id: Uuid) -> InspectraResult<()> {
        self.stations.get_by_id(id).await?;
        require_admin(principal)?;
        self.cascade_delete_station(id).await
    }

    async fn cascade_delete_station(&self, id: Uuid) -> InspectraResult<()> {
        for camera in self.cameras.list_by_station(id).await? {
            self.cameras.delete(camera.id).await?;
        }
        self.stations.delete(id).await?;

        info!(id = %id, "Inspection station deleted with cascade");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Cameras
    // -------------------------------------------------------------------

    /// Create a camera under a station and append it to the station's
    /// embedded camera mirror. The two writes are not transactional;
    /// the camera table is authoritative.
    pub async fn create_camera(
        &self,
        principal: &Principal,
        station_id: Uuid,
        name: String,
    ) -> InspectraResult<Camera> {
        let station = self.stations.get_by_id(station_id).await?;
        require_admin(principal)?;

        let camera = self
            .cameras
            .create(CreateCamera {
                name,
                inspection_station_id: station.id,
                inspection_station_name: station.name,
                project_id: station.project_id,
                project_name: station.project_name,
                organization_id: station.organization_id,
                organization_name: station.organization_name,
                created_by: principal.id,
            })
            .await?;

        self.stations
            .append_camera(
                station.id,
                CameraRef {
                    id: camera.id,
                    name: camera.name.clone(),
                },
            )
            .await?;

        info!(id = %camera.id, station = %station.id, "Camera created");
        Ok(camera)
    }

    pub async fn get_camera(&self, principal: &Principal, id: Uuid) -> InspectraResult<Camera> {
        let camera = self.cameras.get_by_id(id).await?;
        ensure_can_read(&self.organizations, principal, camera.organization_id).await?;
        Ok(camera)
    }

    pub async fn list_cameras(&self, principal: &Principal) -> InspectraResult<Vec<Camera>> {
        if principal.is_admin() {
            return self.cameras.list_all().await;
        }
        let membership = membership_for(&self.organizations, principal).await?;
        if membership.is_empty() {
            return Ok(Vec::new());
        }
        self.cameras.list_in_organizations(membership.org_ids()).await
    }

    pub async fn list_cameras_in_station(
        &self,
        principal: &Principal,
        station_id: Uuid,
    ) -> InspectraResult<Vec<Camera>> {
        let station = self.stations.get_by_id(station_id).await?;
        ensure_can_read(&self.organizations, principal, station.organization_id).await?;
        self.cameras.list_by_station(station.id).await
    }

    /// Rename a camera and propagate the new name into the station
    /// mirror.
    pub async fn update_camera(
        &self,
        principal: &Principal,
        id: Uuid,
        input: UpdateCamera,
    ) -> InspectraResult<Camera> {
        self.cameras.get_by_id(id).await?;
        require_admin(principal)?;

        let camera = self.cameras.update(id, input).await?;
        self.stations
            .rename_camera(camera.inspection_station_id, camera.id, camera.name.clone())
            .await?;
        Ok(camera)
    }

    /// Delete a camera and clear its station mirror entry. Images taken
    /// by the camera are left untouched.
    pub async fn delete_camera(&self, principal: &Principal, id: Uuid) -> InspectraResult<()> {
        let camera = self.cameras.get_by_id(id).await?;
        require_admin(principal)?;

        self.cameras.delete(id).await?;
        self.stations
            .remove_camera(camera.inspection_station_id, camera.id)
            .await?;

        info!(id = %id, station = %camera.inspection_station_id, "Camera deleted");
        Ok(())
    }
}
