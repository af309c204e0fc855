mod common;

use approx::assert_relative_eq;
use colmap_frame_prep::PrepError;
use colmap_frame_prep::config::{ImageExt, IntrinsicsMode};
use colmap_frame_prep::metadata::{CaptureMeta, META_FILE, MetaSplit, TEST_META_FILE, TRAIN_META_FILE};
use tempfile::TempDir;

#[test]
fn test_camera_records_shared_intrinsics() {
    let meta: CaptureMeta = serde_json::from_value(common::meta_json(&[3, 5, 8])).unwrap();
    let records = meta.camera_records(ImageExt::Png, IntrinsicsMode::Shared).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[1].id, 5);
    assert_eq!(records[1].filename, "5.png");
    assert_eq!((records[1].width, records[1].height), (common::W, common::H));
    // every camera reuses camera 0's K
    for r in &records {
        assert_eq!(r.pinhole_params(), [500.0, 501.0, 320.0, 240.0]);
    }
    assert_eq!(records[2].t, [8.0, 0.0, 2.0]);
}

#[test]
fn test_camera_records_per_camera_intrinsics() {
    let meta: CaptureMeta = serde_json::from_value(common::meta_json(&[0, 1])).unwrap();
    let records = meta.camera_records(ImageExt::Jpg, IntrinsicsMode::PerCamera).unwrap();

    assert_eq!(records[0].fx, 500.0);
    assert_eq!(records[1].fx, 510.0);
    assert_eq!(records[1].fy, 511.0);
    assert_eq!(records[1].filename, "1.jpg");
}

#[test]
fn test_camera_record_rotation_matches_w2c() {
    let meta: CaptureMeta = serde_json::from_value(common::meta_json(&[0, 1, 2])).unwrap();
    let records = meta.camera_records(ImageExt::Png, IntrinsicsMode::Shared).unwrap();

    // camera 2 is rotated by 0.2 rad around z
    let q = records[2].q;
    assert_relative_eq!(q[0], (0.1f64).cos(), epsilon = 1e-9);
    assert_relative_eq!(q[3], (0.1f64).sin(), epsilon = 1e-9);
    assert_relative_eq!(q[1], 0.0, epsilon = 1e-9);
    assert_relative_eq!(q[2], 0.0, epsilon = 1e-9);
    assert_relative_eq!(records[2].na_rotation().angle(), 0.2, epsilon = 1e-9);
}

#[test]
fn test_mismatched_metadata_is_rejected() {
    let mut value = common::meta_json(&[0, 1]);
    value["cam_id"] = serde_json::json!([[0, 1, 2]]);
    let meta: CaptureMeta = serde_json::from_value(value).unwrap();
    let result = meta.camera_records(ImageExt::Png, IntrinsicsMode::Shared);
    assert!(matches!(result, Err(PrepError::Metadata(_))));

    let mut empty = common::meta_json(&[0]);
    empty["cam_id"] = serde_json::json!([]);
    let meta: CaptureMeta = serde_json::from_value(empty).unwrap();
    assert!(meta.camera_records(ImageExt::Png, IntrinsicsMode::Shared).is_err());
}

#[test]
fn test_split_prefers_train_test() {
    let dir = TempDir::new().unwrap();
    common::write_meta(dir.path(), META_FILE, &[0, 1, 2, 3]);
    common::write_meta(dir.path(), TRAIN_META_FILE, &[1, 2, 3]);
    common::write_meta(dir.path(), TEST_META_FILE, &[0]);

    let split = MetaSplit::load(dir.path()).unwrap();
    assert!(matches!(split, MetaSplit::TrainTest { .. }));
    assert_eq!(split.cameras().camera_ids(), &[1, 2, 3]);
    assert_eq!(split.excluded_camera_ids(), vec![0]);
}

#[test]
fn test_split_falls_back_to_meta() {
    let dir = TempDir::new().unwrap();
    common::write_meta(dir.path(), META_FILE, &[0, 1]);

    let split = MetaSplit::load(dir.path()).unwrap();
    assert_eq!(split.cameras().camera_ids(), &[0, 1]);
    assert!(split.excluded_camera_ids().is_empty());
}

#[test]
fn test_missing_metadata() {
    let dir = TempDir::new().unwrap();
    let result = MetaSplit::load(dir.path());
    assert!(matches!(result, Err(PrepError::PathDoesNotExist(_))));

    // train without test is an error, not a silent fallback
    common::write_meta(dir.path(), TRAIN_META_FILE, &[0]);
    common::write_meta(dir.path(), META_FILE, &[0]);
    assert!(MetaSplit::load(dir.path()).is_err());
}

#[test]
fn test_invalid_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(META_FILE), "{\"w\": 1").unwrap();
    let result = MetaSplit::load(dir.path());
    assert!(matches!(result, Err(PrepError::Json(_))));
}

#[test]
fn test_split_presence() {
    let dir = TempDir::new().unwrap();
    assert!(!MetaSplit::is_present(dir.path()));
    common::write_meta(dir.path(), TEST_META_FILE, &[0]);
    assert!(!MetaSplit::is_present(dir.path()));
    common::write_meta(dir.path(), TRAIN_META_FILE, &[1]);
    assert!(MetaSplit::is_present(dir.path()));
}
