mod common;

use common::{camera, mirror, mirror_ahead, pose_at};
use std::f64::consts::PI;
use traffic_mirror_map_detector::roi::{RoiError, aggregate_roi, project_roi};
use traffic_mirror_map_detector::{DetectorConfig, Roi, UncertaintyConfig};

fn still() -> UncertaintyConfig {
    DetectorConfig::default().uncertainty()
}

fn near(actual: u32, expected: u32) -> bool {
    actual.abs_diff(expected) <= 1
}

#[test]
fn test_mirror_ahead_roi() {
    let roi = project_roi(&pose_at(0, 0.0, 0.0, 0.0), &camera(), &mirror_ahead(3), &still()).unwrap();
    assert_eq!(roi.landmark_id, 3);
    assert!(near(roi.x_offset, 256), "{:?}", roi);
    assert!(near(roi.y_offset, 208), "{:?}", roi);
    assert!(near(roi.width, 64), "{:?}", roi);
    assert!(near(roi.height, 32), "{:?}", roi);
}

#[test]
fn test_roi_clamped_to_image() {
    let wide = mirror(1, [10.0, 20.0, 30.0], [10.0, -20.0, -30.0], 0.0);
    let roi = project_roi(&pose_at(0, 0.0, 0.0, 0.0), &camera(), &wide, &still()).unwrap();
    assert_eq!(roi.x_offset, 0);
    assert_eq!(roi.y_offset, 0);
    assert_eq!(roi.right(), 639);
    assert_eq!(roi.bottom(), 479);
}

#[test]
fn test_behind_camera() {
    let pose = pose_at(0, 0.0, 0.0, PI);
    assert_eq!(
        project_roi(&pose, &camera(), &mirror_ahead(1), &still()),
        Err(RoiError::BehindCamera { landmark_id: 1 })
    );

    // depth tolerance reaching past the camera centre
    let close = mirror(2, [1.0, 0.2, 0.1], [1.0, 0.0, 0.0], 0.0);
    let cfg = UncertaintyConfig {
        max_vibration_depth: 4.0,
        ..still()
    };
    assert_eq!(
        project_roi(&pose_at(0, 0.0, 0.0, 0.0), &camera(), &close, &cfg),
        Err(RoiError::BehindCamera { landmark_id: 2 })
    );
}

#[test]
fn test_reversed_mirror_collapses() {
    // first point on the viewer's right: corners swap sides in the image
    let reversed = mirror(1, [10.0, 0.0, 1.0], [10.0, 2.0, 0.0], 0.0);
    match project_roi(&pose_at(0, 0.0, 0.0, 0.0), &camera(), &reversed, &still()) {
        Err(RoiError::Collapsed {
            landmark_id, width, ..
        }) => {
            assert_eq!(landmark_id, 1);
            assert!(width < 0);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_vibration_margins() {
    let pose = pose_at(0, 0.0, 0.0, 0.0);
    let camera = camera();
    let landmark = mirror_ahead(1);
    let base = project_roi(&pose, &camera, &landmark, &still()).unwrap();

    // yaw only widens horizontally: sin(0.1) * 10 m is about 32 px at f = 320
    let yawed = UncertaintyConfig {
        max_vibration_yaw: 0.2,
        ..still()
    };
    let roi = project_roi(&pose, &camera, &landmark, &yawed).unwrap();
    assert!(roi.x_offset.abs_diff(base.x_offset - 32) <= 1, "{:?}", roi);
    assert!(roi.width.abs_diff(base.width + 64) <= 2, "{:?}", roi);
    assert_eq!(roi.y_offset, base.y_offset);
    assert_eq!(roi.height, base.height);

    // pitch only grows vertically
    let pitched = UncertaintyConfig {
        max_vibration_pitch: 0.2,
        ..still()
    };
    let roi = project_roi(&pose, &camera, &landmark, &pitched).unwrap();
    assert_eq!(roi.x_offset, base.x_offset);
    assert!(roi.y_offset < base.y_offset && roi.height > base.height);

    // 1 m of width tolerance is 16 px per side at 10 m
    let widened = UncertaintyConfig {
        max_vibration_width: 1.0,
        ..still()
    };
    let roi = project_roi(&pose, &camera, &landmark, &widened).unwrap();
    assert!(roi.x_offset.abs_diff(base.x_offset - 16) <= 1, "{:?}", roi);

    let deep = UncertaintyConfig {
        max_vibration_depth: 2.0,
        ..still()
    };
    let roi = project_roi(&pose, &camera, &landmark, &deep).unwrap();
    assert!(roi.contains(&base));
    assert!(roi.width > base.width);
}

#[test]
fn test_aggregate_is_union() {
    let camera = camera();
    let landmark = mirror_ahead(1);
    let poses = [
        pose_at(0, 0.0, 0.0, 0.0),
        pose_at(1, 0.0, 0.5, 0.0),
        pose_at(2, 0.0, -0.3, 0.05),
    ];
    let singles: Vec<Roi> = poses
        .iter()
        .map(|p| project_roi(p, &camera, &landmark, &still()).unwrap())
        .collect();
    let union = aggregate_roi(&poses, &camera, &landmark, &still()).unwrap();

    assert_eq!(union.x_offset, singles.iter().map(|r| r.x_offset).min().unwrap());
    assert_eq!(union.y_offset, singles.iter().map(|r| r.y_offset).min().unwrap());
    assert_eq!(union.right(), singles.iter().map(|r| r.right()).max().unwrap());
    assert_eq!(union.bottom(), singles.iter().map(|r| r.bottom()).max().unwrap());
    for roi in &singles {
        assert!(union.contains(roi));
    }
}

#[test]
fn test_aggregate_skips_failed_poses() {
    let camera = camera();
    let landmark = mirror_ahead(1);
    let good = pose_at(0, 0.0, 0.0, 0.0);
    let behind = pose_at(1, 0.0, 0.0, PI);

    let single = project_roi(&good, &camera, &landmark, &still()).unwrap();
    let union = aggregate_roi(&[behind, good], &camera, &landmark, &still()).unwrap();
    assert_eq!(union, single);

    assert_eq!(
        aggregate_roi(&[behind], &camera, &landmark, &still()),
        Err(RoiError::NoPoseAccepted { landmark_id: 1 })
    );
    assert!(aggregate_roi(&[], &camera, &landmark, &still()).is_err());
}
