mod common;

use nalgebra as na;
use traffic_mirror_map_detector::camera_model::{
    CameraConfig, CameraConfigError, CameraModel, GenericKind, PinholeCamera, RadialTangential,
    build_generic_model,
};

#[test]
fn test_principal_axis_hits_principal_point() {
    let camera = common::camera();
    let px = camera.project_raw(&na::Point3::new(0.0, 0.0, 5.0));
    assert!((px.x - 320.0).abs() < 1e-9);
    assert!((px.y - 240.0).abs() < 1e-9);
    assert!((camera.fx - 320.0).abs() < 1e-9);
}

#[test]
fn test_unrectify_without_distortion_is_identity() {
    let camera = PinholeCamera::new(500.0, 480.0, 310.0, 250.0, 640, 480);
    let rectified = na::Point2::new(12.5, 400.25);
    let raw = camera.unrectify(&rectified);
    assert!((raw - rectified).norm() < 1e-9);
}

#[test]
fn test_barrel_distortion_pulls_points_inward() {
    let ideal = PinholeCamera::new(500.0, 500.0, 320.0, 240.0, 640, 480);
    let barrel = ideal.clone().with_distortion(RadialTangential {
        k1: -0.2,
        ..Default::default()
    });
    let p = na::Point3::new(1.0, 0.5, 2.0);
    let a = ideal.project_raw(&p);
    let b = barrel.project_raw(&p);
    assert!(b.x < a.x);
    assert!(b.y < a.y);
    // the principal point is a fixed point of any distortion
    let c = barrel.project_raw(&na::Point3::new(0.0, 0.0, 1.0));
    assert!((c.x - 320.0).abs() < 1e-9 && (c.y - 240.0).abs() < 1e-9);
}

#[test]
fn test_from_camera_info() {
    let k = [400.0, 0.0, 300.0, 0.0, 410.0, 200.0, 0.0, 0.0, 1.0];
    let camera = PinholeCamera::from_camera_info(&k, &[0.1, -0.01, 0.001, 0.002], 600, 400);
    assert_eq!(camera.fx, 400.0);
    assert_eq!(camera.fy, 410.0);
    assert_eq!(camera.cx, 300.0);
    assert_eq!(camera.cy, 200.0);
    assert_eq!(camera.distortion.p2, 0.002);
    assert_eq!(camera.distortion.k3, 0.0);
    assert_eq!(camera.camera_matrix()[(1, 2)], 200.0);
}

#[test]
fn test_pinhole_config_from_json() {
    let json = r#"{"type": "pinhole", "fx": 320.0, "fy": 320.0, "cx": 320.0, "cy": 240.0,
                   "width": 640, "height": 480}"#;
    let config: CameraConfig = serde_json::from_str(json).unwrap();
    let camera = config.build().unwrap();
    assert_eq!(camera.width(), 640);
    assert_eq!(camera.height(), 480);
    let px = camera.project_raw(&na::Point3::new(1.0, 0.0, 1.0));
    assert!((px.x - 640.0).abs() < 1e-9);
}

#[test]
fn test_empty_image_rejected() {
    let config = CameraConfig::Pinhole(PinholeCamera::new(1.0, 1.0, 0.0, 0.0, 0, 480));
    assert!(matches!(
        config.build(),
        Err(CameraConfigError::EmptyImage { width: 0, .. })
    ));
}

#[test]
fn test_generic_opencv_matches_pinhole_without_distortion() {
    let params = [320.0, 320.0, 320.0, 240.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let generic = build_generic_model(GenericKind::OpenCV5, &params, 640, 480).unwrap();
    let pinhole = PinholeCamera::new(320.0, 320.0, 320.0, 240.0, 640, 480);
    assert_eq!(CameraModel::width(&generic), 640);
    assert_eq!(CameraModel::height(&generic), 480);
    let p = na::Point3::new(-0.7, 0.3, 4.0);
    let a = generic.project_raw(&p);
    let b = pinhole.project_raw(&p);
    assert!((a - b).norm() < 1e-6);
}

#[test]
fn test_generic_param_count_checked() {
    let err = build_generic_model(GenericKind::Ucm, &[1.0, 2.0], 640, 480).err().unwrap();
    assert_eq!(err, CameraConfigError::ParamCount { expected: 5, got: 2 });

    let json = r#"{"type": "generic", "model": "kb4", "params": [1.0], "width": 10, "height": 10}"#;
    let config: CameraConfig = serde_json::from_str(json).unwrap();
    assert!(config.build().is_err());
}
