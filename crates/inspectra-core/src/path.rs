//! Deterministic storage key construction.
//!
//! Keys partition uploads by the full ancestor chain and calendar day:
//! `org/project/station/camera/YYYY/MM/DD`. Zero-padded components keep
//! lexicographic order equal to chronological order. The same key is
//! used verbatim by the filesystem and object-store backends.

use chrono::{DateTime, Datelike, Utc};

use crate::models::camera::Camera;

/// Build the storage key (folder hierarchy) for an upload to `camera`
/// at time `now`. Pure and side-effect free; two calls with the same
/// camera and calendar day yield identical keys.
pub fn build_storage_key(camera: &Camera, now: DateTime<Utc>) -> String {
    format!(
        "{}/{}/{}/{}/{}/{:02}/{:02}",
        camera.organization_id,
        camera.project_id,
        camera.inspection_station_id,
        camera.id,
        now.year(),
        now.month(),
        now.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn camera() -> Camera {
        Camera {
            id: Uuid::new_v4(),
            name: "cam-1".into(),
            inspection_station_id: Uuid::new_v4(),
            inspection_station_name: "inlet".into(),
            project_id: Uuid::new_v4(),
            project_name: "line-a".into(),
            organization_id: Uuid::new_v4(),
            organization_name: "acme".into(),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn same_camera_and_day_is_deterministic() {
        let cam = camera();
        let morning = Utc.with_ymd_and_hms(2025, 3, 7, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2025, 3, 7, 22, 15, 9).unwrap();
        assert_eq!(
            build_storage_key(&cam, morning),
            build_storage_key(&cam, evening)
        );
    }

    #[test]
    fn month_and_day_are_zero_padded() {
        let cam = camera();
        let t = Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap();
        let key = build_storage_key(&cam, t);
        assert!(key.ends_with("/2025/03/07"));
    }

    #[test]
    fn different_day_or_camera_changes_the_key() {
        let cam = camera();
        let other = camera();
        let d1 = Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap();
        let d2 = Utc.with_ymd_and_hms(2025, 3, 8, 12, 0, 0).unwrap();

        assert_ne!(build_storage_key(&cam, d1), build_storage_key(&cam, d2));
        assert_ne!(build_storage_key(&cam, d1), build_storage_key(&other, d1));
    }

    #[test]
    fn key_contains_full_ancestor_chain() {
        let cam = camera();
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let key = build_storage_key(&cam, t);
        let parts: Vec<&str> = key.split('/').collect();
        assert_eq!(parts.len(), 7);
        assert_eq!(parts[0], cam.organization_id.to_string());
        assert_eq!(parts[1], cam.project_id.to_string());
        assert_eq!(parts[2], cam.inspection_station_id.to_string());
        assert_eq!(parts[3], cam.id.to_string());
    }
}
