//! Integration tests for the hierarchy service: cascading
//! authorization, the station camera mirror, cascade deletes, datasets
//! and observations. Runs against in-memory SurrealDB.

use inspectra_core::error::InspectraError;
use inspectra_core::models::camera::UpdateCamera;
use inspectra_core::models::dataset::DatasetImage;
use inspectra_core::models::observation::{DataType, ObservationValue, UpdateObservation};
use inspectra_core::models::organization::AddMember;
use inspectra_core::models::principal::{Principal, Role};
use inspectra_service::HierarchyService;
use inspectra_db::repository::{
    SurrealCameraRepository, SurrealDatasetRepository, SurrealObservationRepository,
    SurrealOrganizationRepository, SurrealProjectRepository, SurrealStationRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;
type MemHierarchy = HierarchyService<
    SurrealOrganizationRepository<Db>,
    SurrealProjectRepository<Db>,
    SurrealStationRepository<Db>,
    SurrealCameraRepository<Db>,
    SurrealDatasetRepository<Db>,
    SurrealObservationRepository<Db>,
>;

async fn setup() -> MemHierarchy {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    inspectra_db::run_migrations(&db).await.unwrap();

    HierarchyService::new(
        SurrealOrganizationRepository::new(db.clone()),
        SurrealProjectRepository::new(db.clone()),
        SurrealStationRepository::new(db.clone()),
        SurrealCameraRepository::new(db.clone()),
        SurrealDatasetRepository::new(db.clone()),
        SurrealObservationRepository::new(db),
    )
}

fn admin() -> Principal {
    Principal::new(Uuid::new_v4(), Role::Admin)
}

fn user() -> Principal {
    Principal::new(Uuid::new_v4(), Role::User)
}

/// Build the Acme / Line A / Inlet chain and return (org, project,
/// station) ids.
async fn seed_chain(service: &MemHierarchy, admin: &Principal) -> (Uuid, Uuid, Uuid) {
    let org = service
        .create_organization(admin, "Acme".into(), None)
        .await
        .unwrap();
    let project = service
        .create_project(admin, org.id, "Line A".into(), None)
        .await
        .unwrap();
    let station = service
        .create_station(admin, project.id, "Inlet".into(), None)
        .await
        .unwrap();
    (org.id, project.id, station.id)
}

#[tokio::test]
async fn camera_names_collide_within_a_station() {
    let service = setup().await;
    let admin = admin();
    let (_, _, station_id) = seed_chain(&service, &admin).await;

    let camera = service
        .create_camera(&admin, station_id, "Cam-1".into())
        .await
        .unwrap();
    assert_eq!(camera.organization_name, "Acme");
    assert_eq!(camera.project_name, "Line A");

    // Second Cam-1 under the same station is a conflict.
    let err = service
        .create_camera(&admin, station_id, "Cam-1".into())
        .await
        .unwrap_err();
    assert!(matches!(err, InspectraError::Conflict { .. }));

    // The station mirror picked up the one camera that exists.
    let station = service.get_station(&admin, station_id).await.unwrap();
    assert_eq!(station.cameras.len(), 1);
    assert_eq!(station.cameras[0].id, camera.id);
    assert_eq!(station.cameras[0].name, "Cam-1");
}

#[tokio::test]
async fn camera_rename_and_delete_update_the_mirror() {
    let service = setup().await;
    let admin = admin();
    let (_, _, station_id) = seed_chain(&service, &admin).await;

    let camera = service
        .create_camera(&admin, station_id, "Cam-1".into())
        .await
        .unwrap();

    service
        .update_camera(
            &admin,
            camera.id,
            UpdateCamera {
                name: Some("Cam-1b".into()),
            },
        )
        .await
        .unwrap();
    let station = service.get_station(&admin, station_id).await.unwrap();
    assert_eq!(station.cameras[0].name, "Cam-1b");

    service.delete_camera(&admin, camera.id).await.unwrap();
    let station = service.get_station(&admin, station_id).await.unwrap();
    assert!(station.cameras.is_empty());
}

#[tokio::test]
async fn writes_are_admin_only() {
    let service = setup().await;
    let admin = admin();
    let user = user();
    let (org_id, project_id, station_id) = seed_chain(&service, &admin).await;

    // Even an organization member cannot write.
    service
        .add_member(
            &admin,
            org_id,
            AddMember {
                user_id: user.id,
                name: "Member".into(),
                email: "member@example.com".into(),
                role: Role::User,
            },
        )
        .await
        .unwrap();

    let err = service
        .create_project(&user, org_id, "Forbidden Project".into(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, InspectraError::Forbidden));

    let err = service
        .create_camera(&user, station_id, "Cam-X".into())
        .await
        .unwrap_err();
    assert!(matches!(err, InspectraError::Forbidden));

    let err = service.delete_project(&user, project_id).await.unwrap_err();
    assert!(matches!(err, InspectraError::Forbidden));
}

#[tokio::test]
async fn membership_gates_reads() {
    let service = setup().await;
    let admin = admin();
    let member = user();
    let outsider = user();
    let (org_id, project_id, _) = seed_chain(&service, &admin).await;

    service
        .add_member(
            &admin,
            org_id,
            AddMember {
                user_id: member.id,
                name: "Member".into(),
                email: "member@example.com".into(),
                role: Role::User,
            },
        )
        .await
        .unwrap();

    // Member and admin can read, the outsider cannot.
    assert!(service.get_project(&member, project_id).await.is_ok());
    assert!(service.get_project(&admin, project_id).await.is_ok());
    assert!(matches!(
        service.get_project(&outsider, project_id).await.unwrap_err(),
        InspectraError::Forbidden
    ));

    // A missing project is NotFound before any access decision.
    assert!(matches!(
        service
            .get_project(&outsider, Uuid::new_v4())
            .await
            .unwrap_err(),
        InspectraError::NotFound { .. }
    ));

    // Role-aware listing: member sees their org's rows, outsider none.
    assert_eq!(service.list_projects(&member).await.unwrap().len(), 1);
    assert!(service.list_projects(&outsider).await.unwrap().is_empty());
    assert_eq!(service.list_projects(&admin).await.unwrap().len(), 1);
}

#[tokio::test]
async fn organization_delete_cascades_to_descendants() {
    let service = setup().await;
    let admin = admin();
    let (org_id, project_id, station_id) = seed_chain(&service, &admin).await;

    let camera = service
        .create_camera(&admin, station_id, "Cam-1".into())
        .await
        .unwrap();
    let dataset = service
        .create_dataset(&admin, project_id, "Training v1".into(), Vec::new())
        .await
        .unwrap();
    let observation = service
        .create_observation(
            &admin,
            project_id,
            "belt_speed".into(),
            DataType::Number,
            serde_json::json!(2.5),
        )
        .await
        .unwrap();

    service.delete_organization(&admin, org_id).await.unwrap();

    for result in [
        service.get_project(&admin, project_id).await.err(),
        service.get_station(&admin, station_id).await.err(),
        service.get_camera(&admin, camera.id).await.err(),
        service.get_dataset(&admin, dataset.id).await.err(),
        service.get_observation(&admin, observation.id).await.err(),
    ] {
        assert!(matches!(result, Some(InspectraError::NotFound { .. })));
    }
}

#[tokio::test]
async fn dataset_curation_through_the_service() {
    let service = setup().await;
    let admin = admin();
    let (_, project_id, _) = seed_chain(&service, &admin).await;

    let snapshot = DatasetImage {
        id: Uuid::new_v4(),
        filename: "part.jpg".into(),
        full_path: "acme/line-a/inlet/cam-1/2026/08/25/part.jpg".into(),
        url: None,
        ground_truth: None,
    };

    let dataset = service
        .create_dataset(&admin, project_id, "Training v1".into(), vec![snapshot.clone()])
        .await
        .unwrap();
    assert_eq!(dataset.images.len(), 1);

    let mut updated = snapshot.clone();
    updated.ground_truth = Some(serde_json::json!({"defect": "none"}));
    let dataset = service
        .update_dataset_image(&admin, dataset.id, updated)
        .await
        .unwrap();
    assert!(dataset.images[0].ground_truth.is_some());

    let dataset = service
        .remove_dataset_image(&admin, dataset.id, snapshot.id)
        .await
        .unwrap();
    assert!(dataset.images.is_empty());

    assert_eq!(
        service
            .count_datasets_in_project(&admin, project_id)
            .await
            .unwrap(),
        1
    );

    // Mutation is admin-only.
    let err = service
        .add_dataset_image(&user(), dataset.id, snapshot)
        .await
        .unwrap_err();
    assert!(matches!(err, InspectraError::Forbidden));
}

#[tokio::test]
async fn observation_values_are_typed() {
    let service = setup().await;
    let admin = admin();
    let (_, project_id, _) = seed_chain(&service, &admin).await;

    // Declared type and value must agree.
    let err = service
        .create_observation(
            &admin,
            project_id,
            "enabled".into(),
            DataType::Boolean,
            serde_json::json!("yes"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InspectraError::Validation { .. }));

    let observation = service
        .create_observation(
            &admin,
            project_id,
            "enabled".into(),
            DataType::Boolean,
            serde_json::json!(true),
        )
        .await
        .unwrap();
    assert_eq!(observation.value, ObservationValue::Boolean(true));

    let updated = service
        .update_observation(
            &admin,
            observation.id,
            UpdateObservation {
                name: None,
                value: Some(ObservationValue::Number(7.0)),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.data_type(), DataType::Number);
}
