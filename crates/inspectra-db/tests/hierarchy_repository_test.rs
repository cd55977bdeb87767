//! Integration tests for the Organization, Project, InspectionStation
//! and Camera repository implementations using in-memory SurrealDB.

use inspectra_core::error::InspectraError;
use inspectra_core::models::organization::{AddMember, CreateOrganization, UpdateOrganization};
use inspectra_core::models::project::{CreateProject, UpdateProject};
use inspectra_core::models::station::{CameraRef, CreateInspectionStation};
use inspectra_core::models::camera::{CreateCamera, UpdateCamera};
use inspectra_core::models::principal::Role;
use inspectra_core::repository::{
    CameraRepository, OrganizationRepository, ProjectRepository, StationRepository,
};
use inspectra_db::repository::{
    SurrealCameraRepository, SurrealOrganizationRepository, SurrealProjectRepository,
    SurrealStationRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    inspectra_db::run_migrations(&db).await.unwrap();
    db
}

fn create_org(name: &str, created_by: Uuid) -> CreateOrganization {
    CreateOrganization {
        name: name.into(),
        description: Some("test org".into()),
        created_by,
    }
}

// -----------------------------------------------------------------------
// Organization tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_organization() {
    let db = setup().await;
    let repo = SurrealOrganizationRepository::new(db);
    let admin = Uuid::new_v4();

    let org = repo.create(create_org("Acme Manufacturing", admin)).await.unwrap();
    assert_eq!(org.name, "Acme Manufacturing");
    assert_eq!(org.created_by, admin);
    assert!(org.members.is_empty());

    let fetched = repo.get_by_id(org.id).await.unwrap();
    assert_eq!(fetched.id, org.id);
    assert_eq!(fetched.name, org.name);
}

#[tokio::test]
async fn duplicate_organization_name_is_conflict() {
    let db = setup().await;
    let repo = SurrealOrganizationRepository::new(db);
    let admin = Uuid::new_v4();

    repo.create(create_org("Acme", admin)).await.unwrap();
    let err = repo.create(create_org("Acme", admin)).await.unwrap_err();
    assert!(matches!(err, InspectraError::Conflict { .. }));
}

#[tokio::test]
async fn short_organization_name_is_rejected() {
    let db = setup().await;
    let repo = SurrealOrganizationRepository::new(db);

    let err = repo
        .create(create_org("ab", Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, InspectraError::Validation { .. }));
}

#[tokio::test]
async fn update_organization_renames_and_bumps_timestamp() {
    let db = setup().await;
    let repo = SurrealOrganizationRepository::new(db);

    let org = repo
        .create(create_org("Before Rename", Uuid::new_v4()))
        .await
        .unwrap();

    let updated = repo
        .update(
            org.id,
            UpdateOrganization {
                name: Some("After Rename".into()),
                description: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "After Rename");
    assert_eq!(updated.description, "test org");
    assert!(updated.updated_at >= org.updated_at);
}

#[tokio::test]
async fn member_add_remove_round_trip() {
    let db = setup().await;
    let repo = SurrealOrganizationRepository::new(db);
    let admin = Uuid::new_v4();
    let user = Uuid::new_v4();

    let org = repo.create(create_org("Membership Org", admin)).await.unwrap();

    let org = repo
        .add_member(
            org.id,
            AddMember {
                user_id: user,
                name: "Pat Doe".into(),
                email: "pat@example.com".into(),
                role: Role::User,
            },
        )
        .await
        .unwrap();
    assert_eq!(org.members.len(), 1);
    assert!(org.has_member(user));

    // Adding the same user twice is a conflict.
    let err = repo
        .add_member(
            org.id,
            AddMember {
                user_id: user,
                name: "Pat Doe".into(),
                email: "pat@example.com".into(),
                role: Role::User,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InspectraError::Conflict { .. }));

    // Removal is idempotent.
    let org = repo.remove_member(org.id, user).await.unwrap();
    assert!(org.members.is_empty());
    let org = repo.remove_member(org.id, user).await.unwrap();
    assert!(org.members.is_empty());
}

#[tokio::test]
async fn list_for_user_covers_creator_and_member() {
    let db = setup().await;
    let repo = SurrealOrganizationRepository::new(db);
    let creator = Uuid::new_v4();
    let member = Uuid::new_v4();
    let outsider = Uuid::new_v4();

    let created = repo.create(create_org("Created Org", creator)).await.unwrap();
    let joined = repo.create(create_org("Joined Org", Uuid::new_v4())).await.unwrap();
    repo.create(create_org("Unrelated Org", Uuid::new_v4()))
        .await
        .unwrap();

    repo.add_member(
        joined.id,
        AddMember {
            user_id: member,
            name: "Member".into(),
            email: "member@example.com".into(),
            role: Role::User,
        },
    )
    .await
    .unwrap();

    let for_creator = repo.list_for_user(creator).await.unwrap();
    assert_eq!(for_creator.len(), 1);
    assert_eq!(for_creator[0].id, created.id);

    let for_member = repo.list_for_user(member).await.unwrap();
    assert_eq!(for_member.len(), 1);
    assert_eq!(for_member[0].id, joined.id);

    assert!(repo.list_for_user(outsider).await.unwrap().is_empty());
}

// -----------------------------------------------------------------------
// Project tests
// -----------------------------------------------------------------------

async fn seed_project(
    orgs: &SurrealOrganizationRepository<surrealdb::engine::local::Db>,
    projects: &SurrealProjectRepository<surrealdb::engine::local::Db>,
    org_name: &str,
    project_name: &str,
) -> (Uuid, inspectra_core::models::project::Project) {
    let admin = Uuid::new_v4();
    let org = orgs.create(create_org(org_name, admin)).await.unwrap();
    let project = projects
        .create(CreateProject {
            name: project_name.into(),
            description: None,
            organization_id: org.id,
            organization_name: org.name.clone(),
            created_by: admin,
        })
        .await
        .unwrap();
    (org.id, project)
}

#[tokio::test]
async fn project_name_unique_per_organization_only() {
    let db = setup().await;
    let orgs = SurrealOrganizationRepository::new(db.clone());
    let projects = SurrealProjectRepository::new(db);

    let (org_id, project) = seed_project(&orgs, &projects, "Org One", "Widget QA").await;
    assert!(project.active);

    // Same name in the same organization conflicts.
    let err = projects
        .create(CreateProject {
            name: "Widget QA".into(),
            description: None,
            organization_id: org_id,
            organization_name: "Org One".into(),
            created_by: Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, InspectraError::Conflict { .. }));

    // Same name in a different organization is fine.
    let (_, other) = seed_project(&orgs, &projects, "Org Two", "Widget QA").await;
    assert_eq!(other.name, "Widget QA");
}

#[tokio::test]
async fn project_listing_is_scoped() {
    let db = setup().await;
    let orgs = SurrealOrganizationRepository::new(db.clone());
    let projects = SurrealProjectRepository::new(db);

    let (org_a, _) = seed_project(&orgs, &projects, "Scope A", "Line 1").await;
    let (org_b, _) = seed_project(&orgs, &projects, "Scope B", "Line 2").await;

    assert_eq!(projects.list_by_organization(org_a).await.unwrap().len(), 1);
    assert_eq!(projects.list_all().await.unwrap().len(), 2);

    let within = projects
        .list_in_organizations(vec![org_a, org_b])
        .await
        .unwrap();
    assert_eq!(within.len(), 2);

    assert!(
        projects
            .list_in_organizations(vec![Uuid::new_v4()])
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn project_deactivation_round_trip() {
    let db = setup().await;
    let orgs = SurrealOrganizationRepository::new(db.clone());
    let projects = SurrealProjectRepository::new(db);

    let (_, project) = seed_project(&orgs, &projects, "Toggle Org", "Toggle").await;

    let updated = projects
        .update(
            project.id,
            UpdateProject {
                name: None,
                description: None,
                active: Some(false),
            },
        )
        .await
        .unwrap();
    assert!(!updated.active);
    assert_eq!(updated.name, "Toggle");
}

// -----------------------------------------------------------------------
// Station and camera tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn station_camera_mirror_stays_in_sync() {
    let db = setup().await;
    let orgs = SurrealOrganizationRepository::new(db.clone());
    let projects = SurrealProjectRepository::new(db.clone());
    let stations = SurrealStationRepository::new(db.clone());
    let cameras = SurrealCameraRepository::new(db);

    let (org_id, project) = seed_project(&orgs, &projects, "Mirror Org", "Mirror").await;

    let station = stations
        .create(CreateInspectionStation {
            name: "Station 7".into(),
            description: None,
            organization_id: org_id,
            organization_name: "Mirror Org".into(),
            project_id: project.id,
            project_name: project.name.clone(),
            created_by: project.created_by,
        })
        .await
        .unwrap();
    assert!(station.cameras.is_empty());

    let camera = cameras
        .create(CreateCamera {
            name: "Cam-1".into(),
            inspection_station_id: station.id,
            inspection_station_name: station.name.clone(),
            project_id: project.id,
            project_name: project.name.clone(),
            organization_id: org_id,
            organization_name: "Mirror Org".into(),
            created_by: project.created_by,
        })
        .await
        .unwrap();

    stations
        .append_camera(
            station.id,
            CameraRef {
                id: camera.id,
                name: camera.name.clone(),
            },
        )
        .await
        .unwrap();

    let station = stations.get_by_id(station.id).await.unwrap();
    assert_eq!(station.cameras.len(), 1);
    assert_eq!(station.cameras[0].name, "Cam-1");

    // Rename propagates into the mirror.
    cameras
        .update(
            camera.id,
            UpdateCamera {
                name: Some("Cam-1-renamed".into()),
            },
        )
        .await
        .unwrap();
    stations
        .rename_camera(station.id, camera.id, "Cam-1-renamed".into())
        .await
        .unwrap();

    let station = stations.get_by_id(station.id).await.unwrap();
    assert_eq!(station.cameras[0].name, "Cam-1-renamed");

    // Delete clears the mirror entry.
    cameras.delete(camera.id).await.unwrap();
    stations.remove_camera(station.id, camera.id).await.unwrap();

    let station = stations.get_by_id(station.id).await.unwrap();
    assert!(station.cameras.is_empty());
    assert!(matches!(
        cameras.get_by_id(camera.id).await.unwrap_err(),
        InspectraError::NotFound { .. }
    ));
}

#[tokio::test]
async fn camera_name_unique_per_station() {
    let db = setup().await;
    let orgs = SurrealOrganizationRepository::new(db.clone());
    let projects = SurrealProjectRepository::new(db.clone());
    let stations = SurrealStationRepository::new(db.clone());
    let cameras = SurrealCameraRepository::new(db);

    let (org_id, project) = seed_project(&orgs, &projects, "Cam Org", "Cam Project").await;

    let create_station = |name: &str| CreateInspectionStation {
        name: name.into(),
        description: None,
        organization_id: org_id,
        organization_name: "Cam Org".into(),
        project_id: project.id,
        project_name: project.name.clone(),
        created_by: project.created_by,
    };
    let station_a = stations.create(create_station("Station A")).await.unwrap();
    let station_b = stations.create(create_station("Station B")).await.unwrap();

    let create_camera = |station: &inspectra_core::models::station::InspectionStation| {
        CreateCamera {
            name: "Overview".into(),
            inspection_station_id: station.id,
            inspection_station_name: station.name.clone(),
            project_id: project.id,
            project_name: project.name.clone(),
            organization_id: org_id,
            organization_name: "Cam Org".into(),
            created_by: project.created_by,
        }
    };

    cameras.create(create_camera(&station_a)).await.unwrap();
    let err = cameras.create(create_camera(&station_a)).await.unwrap_err();
    assert!(matches!(err, InspectraError::Conflict { .. }));

    // Same name under a sibling station is fine.
    cameras.create(create_camera(&station_b)).await.unwrap();
    assert_eq!(cameras.list_by_project(project.id).await.unwrap().len(), 2);
    assert_eq!(cameras.list_by_station(station_a.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn short_station_and_camera_names_are_accepted() {
    let db = setup().await;
    let orgs = SurrealOrganizationRepository::new(db.clone());
    let projects = SurrealProjectRepository::new(db.clone());
    let stations = SurrealStationRepository::new(db.clone());
    let cameras = SurrealCameraRepository::new(db);

    let (org_id, project) = seed_project(&orgs, &projects, "Short Org", "Short Names").await;

    // The minimum-length rule applies to organizations and projects
    // only; two-character station and camera labels are valid.
    let station = stations
        .create(CreateInspectionStation {
            name: "S2".into(),
            description: None,
            organization_id: org_id,
            organization_name: "Short Org".into(),
            project_id: project.id,
            project_name: project.name.clone(),
            created_by: project.created_by,
        })
        .await
        .unwrap();
    assert_eq!(station.name, "S2");

    let camera = cameras
        .create(CreateCamera {
            name: "C1".into(),
            inspection_station_id: station.id,
            inspection_station_name: station.name.clone(),
            project_id: project.id,
            project_name: project.name.clone(),
            organization_id: org_id,
            organization_name: "Short Org".into(),
            created_by: project.created_by,
        })
        .await
        .unwrap();
    assert_eq!(camera.name, "C1");

    // Blank names are still rejected.
    let err = cameras
        .create(CreateCamera {
            name: "   ".into(),
            inspection_station_id: station.id,
            inspection_station_name: station.name.clone(),
            project_id: project.id,
            project_name: project.name.clone(),
            organization_id: org_id,
            organization_name: "Short Org".into(),
            created_by: project.created_by,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, InspectraError::Validation { .. }));
}
