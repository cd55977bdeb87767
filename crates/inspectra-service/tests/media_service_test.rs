//! Integration tests for the media ingestion pipeline: in-memory
//! SurrealDB plus a tempdir-backed filesystem storage.

use inspectra_core::error::InspectraError;
use inspectra_core::models::image::ImageScope;
use inspectra_core::models::organization::AddMember;
use inspectra_core::models::principal::{Principal, Role};
use inspectra_db::repository::{
    SurrealCameraRepository, SurrealDatasetRepository, SurrealImageRepository,
    SurrealObservationRepository, SurrealOrganizationRepository, SurrealProjectRepository,
    SurrealStationRepository,
};
use inspectra_service::{HierarchyService, MediaService, UploadFile};
use inspectra_storage::FsStorage;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use tempfile::TempDir;
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
type MemMedia = MediaService<
    SurrealOrganizationRepository<Db>,
    SurrealProjectRepository<Db>,
    SurrealStationRepository<Db>,
    SurrealCameraRepository<Db>,
    SurrealImageRepository<Db>,
    FsStorage,
>;

struct Fixture {
    hierarchy: MemHierarchy,
    media: MemMedia,
    root: TempDir,
}

async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    inspectra_db::run_migrations(&db).await.unwrap();

    let root = tempfile::tempdir().unwrap();

    let hierarchy = HierarchyService::new(
        SurrealOrganizationRepository::new(db.clone()),
        SurrealProjectRepository::new(db.clone()),
        SurrealStationRepository::new(db.clone()),
        SurrealCameraRepository::new(db.clone()),
        SurrealDatasetRepository::new(db.clone()),
        SurrealObservationRepository::new(db.clone()),
    );
    let media = MediaService::new(
        SurrealOrganizationRepository::new(db.clone()),
        SurrealProjectRepository::new(db.clone()),
        SurrealStationRepository::new(db.clone()),
        SurrealCameraRepository::new(db.clone()),
        SurrealImageRepository::new(db),
        FsStorage::new(root.path()),
    );

    Fixture {
        hierarchy,
        media,
        root,
    }
}

fn admin() -> Principal {
    Principal::new(Uuid::new_v4(), Role::Admin)
}

fn file(name: &str, bytes: &[u8]) -> UploadFile {
    UploadFile {
        filename: name.into(),
        content_type: "image/jpeg".into(),
        bytes: bytes.to_vec(),
    }
}

/// Seed the full chain and return the ids top to bottom.
async fn seed_camera(fixture: &Fixture, admin: &Principal) -> (Uuid, Uuid, Uuid, Uuid) {
    let org = fixture
        .hierarchy
        .create_organization(admin, "Acme".into(), None)
        .await
        .unwrap();
    let project = fixture
        .hierarchy
        .create_project(admin, org.id, "Line A".into(), None)
        .await
        .unwrap();
    let station = fixture
        .hierarchy
        .create_station(admin, project.id, "Inlet".into(), None)
        .await
        .unwrap();
    let camera = fixture
        .hierarchy
        .create_camera(admin, station.id, "Cam-1".into())
        .await
        .unwrap();
    (org.id, project.id, station.id, camera.id)
}

#[tokio::test]
async fn upload_fetch_delete_round_trip() {
    let fixture = setup().await;
    let admin = admin();
    let (org_id, project_id, station_id, camera_id) = seed_camera(&fixture, &admin).await;

    let outcome = fixture
        .media
        .upload_images(
            &admin,
            camera_id,
            vec![file("one.jpg", b"first"), file("two.jpg", b"second")],
        )
        .await
        .unwrap();
    assert_eq!(outcome.saved.len(), 2);
    assert!(outcome.failed.is_empty());

    let image = &outcome.saved[0];
    assert!(image.filename.ends_with("_one.jpg"));
    assert!(image.full_path.starts_with(&org_id.to_string()));
    assert!(image.full_path.contains(&camera_id.to_string()));
    assert_eq!(image.camera.name, "Cam-1");
    assert!(image.inference.is_none());

    let bytes = fixture
        .media
        .get_image_bytes(&admin, image.id)
        .await
        .unwrap();
    assert_eq!(bytes, b"first");

    // Counts line up at every level of the hierarchy.
    for (scope, id) in [
        (ImageScope::Organization, org_id),
        (ImageScope::Project, project_id),
        (ImageScope::Station, station_id),
        (ImageScope::Camera, camera_id),
    ] {
        assert_eq!(fixture.media.count_images(&admin, scope, id).await.unwrap(), 2);
    }

    fixture.media.delete_image(&admin, image.id).await.unwrap();
    assert!(matches!(
        fixture.media.get_image(&admin, image.id).await.unwrap_err(),
        InspectraError::NotFound { .. }
    ));
    assert_eq!(
        fixture
            .media
            .count_images(&admin, ImageScope::Camera, camera_id)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn one_bad_file_does_not_sink_the_batch() {
    let fixture = setup().await;
    let admin = admin();
    let (_, _, _, camera_id) = seed_camera(&fixture, &admin).await;

    let outcome = fixture
        .media
        .upload_images(
            &admin,
            camera_id,
            vec![
                file("good.jpg", b"fine"),
                file("../escape.jpg", b"bad"),
                file("also_good.jpg", b"fine too"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(outcome.saved.len(), 2);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].filename, "../escape.jpg");
    assert!(matches!(
        outcome.failed[0].error,
        InspectraError::Validation { .. }
    ));

    // Exactly the persisted subset is listed.
    let listed = fixture
        .media
        .list_images_by_camera(&admin, camera_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn delete_survives_a_missing_backend_object() {
    let fixture = setup().await;
    let admin = admin();
    let (_, _, _, camera_id) = seed_camera(&fixture, &admin).await;

    let outcome = fixture
        .media
        .upload_images(&admin, camera_id, vec![file("orphan.jpg", b"bytes")])
        .await
        .unwrap();
    let image = &outcome.saved[0];

    // Remove the object behind the record's back.
    let on_disk = fixture.root.path().join(&image.full_path);
    std::fs::remove_file(on_disk).unwrap();

    // Backend delete fails, metadata removal still goes through.
    fixture.media.delete_image(&admin, image.id).await.unwrap();
    assert!(matches!(
        fixture.media.get_image(&admin, image.id).await.unwrap_err(),
        InspectraError::NotFound { .. }
    ));
}

#[tokio::test]
async fn inference_upload_attaches_no_metadata_for_plain_bytes() {
    let fixture = setup().await;
    let admin = admin();
    let (_, _, _, camera_id) = seed_camera(&fixture, &admin).await;

    // Plain bytes carry no EXIF; the record stores no inference blob
    // and the upload still succeeds.
    let outcome = fixture
        .media
        .upload_inference_images(&admin, camera_id, vec![file("raw.jpg", b"no exif here")])
        .await
        .unwrap();
    assert_eq!(outcome.saved.len(), 1);
    assert!(outcome.saved[0].inference.is_none());
}

#[tokio::test]
async fn media_access_follows_membership() {
    let fixture = setup().await;
    let admin = admin();
    let member = Principal::new(Uuid::new_v4(), Role::User);
    let outsider = Principal::new(Uuid::new_v4(), Role::User);
    let (org_id, _, _, camera_id) = seed_camera(&fixture, &admin).await;

    fixture
        .hierarchy
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

    let outcome = fixture
        .media
        .upload_images(&admin, camera_id, vec![file("shared.jpg", b"pixels")])
        .await
        .unwrap();
    let image_id = outcome.saved[0].id;

    // Uploads are admin-only even for members.
    assert!(matches!(
        fixture
            .media
            .upload_images(&member, camera_id, vec![file("x.jpg", b"y")])
            .await
            .unwrap_err(),
        InspectraError::Forbidden
    ));

    assert!(fixture.media.get_image(&member, image_id).await.is_ok());
    assert!(matches!(
        fixture.media.get_image(&outsider, image_id).await.unwrap_err(),
        InspectraError::Forbidden
    ));

    assert_eq!(fixture.media.list_images(&member).await.unwrap().len(), 1);
    assert!(fixture.media.list_images(&outsider).await.unwrap().is_empty());
}

#[tokio::test]
async fn annotation_flow_feeds_the_dashboard() {
    let fixture = setup().await;
    let admin = admin();
    let (_, project_id, _, camera_id) = seed_camera(&fixture, &admin).await;

    let outcome = fixture
        .media
        .upload_images(
            &admin,
            camera_id,
            vec![file("a.jpg", b"a"), file("b.jpg", b"b"), file("c.jpg", b"c")],
        )
        .await
        .unwrap();

    fixture
        .media
        .update_ground_truth(
            &admin,
            outcome.saved[0].id,
            serde_json::json!({"defect": "scratch"}),
        )
        .await
        .unwrap();

    let pending = fixture
        .media
        .list_pending_annotation(&admin, camera_id)
        .await
        .unwrap();
    assert_eq!(pending.len(), 2);

    let dashboard = fixture
        .media
        .project_dashboard(&admin, project_id)
        .await
        .unwrap();
    assert_eq!(dashboard.total_images, 3);
    assert_eq!(dashboard.camera_count, 1);
    assert_eq!(dashboard.annotated, 1);
    assert_eq!(dashboard.pending, 2);
}
