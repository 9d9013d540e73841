#![allow(dead_code)]

use nalgebra as na;
use std::f64::consts::FRAC_PI_2;
use traffic_mirror_map_detector::landmark::Landmark;
use traffic_mirror_map_detector::{CameraPose, PinholeCamera};

/// 640x480 camera with a 90 degree horizontal field of view (f = 320 px).
pub fn camera() -> PinholeCamera {
    PinholeCamera::from_horizontal_fov(640, 480, FRAC_PI_2)
}

/// Optical camera at ground level at (x, y) looking along `yaw`.
pub fn pose_at(stamp_ns: i64, x: f64, y: f64, yaw: f64) -> CameraPose {
    CameraPose::optical_from_yaw(stamp_ns, na::Point3::new(x, y, 0.0), yaw)
}

pub fn mirror(id: i64, first: [f64; 3], last: [f64; 3], height: f64) -> Landmark {
    Landmark::new(
        id,
        na::Point3::from(first),
        na::Point3::from(last),
        height,
        Some("mirror".to_string()),
    )
    .unwrap()
}

/// Mirror 10 m ahead of a camera at the origin looking along +x.
///
/// The first point is on the viewer's left (+y), one meter up.
pub fn mirror_ahead(id: i64) -> Landmark {
    mirror(id, [10.0, 2.0, 1.0], [10.0, 0.0, 0.0], 0.0)
}
