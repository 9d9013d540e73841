//! Selection of the map landmarks a camera can plausibly see.

use nalgebra as na;

use crate::camera_model::CameraModel;
use crate::landmark::{Landmark, LandmarkSet};
use crate::types::CameraPose;
use crate::util::{deg2rad, heading_difference, normalize_radian};

/// Largest angle between the mirror normal and the camera heading, in degrees.
pub const MAX_ANGLE_RANGE_DEG: f64 = 40.0;

/// Squared planar distance test; height is ignored.
pub fn is_in_distance_range(p1: &na::Point3<f64>, p2: &na::Point3<f64>, max_range: f64) -> bool {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    dx * dx + dy * dy < max_range * max_range
}

pub fn is_in_angle_range(landmark_yaw: f64, camera_yaw: f64, max_angle_range: f64) -> bool {
    heading_difference(landmark_yaw, camera_yaw) < max_angle_range
}

/// `true` if a camera-frame point is in front of the camera and lands inside the image.
pub fn is_in_image_frame<C: CameraModel + ?Sized>(camera: &C, p_camera: &na::Point3<f64>) -> bool {
    if p_camera.z <= 0.0 {
        return false;
    }
    let px = camera.project_raw(p_camera);
    (0.0..camera.width() as f64).contains(&px.x) && (0.0..camera.height() as f64).contains(&px.y)
}

/// Heading of the camera optical axis projected onto the map plane.
pub fn camera_yaw(pose: &CameraPose) -> f64 {
    let forward = pose.forward_axis();
    normalize_radian(forward.y.atan2(forward.x))
}

fn is_visible_from<C: CameraModel + ?Sized>(
    landmark: &Landmark,
    pose: &CameraPose,
    camera: &C,
    max_range: f64,
) -> bool {
    if !is_in_distance_range(&landmark.center(), &pose.origin(), max_range) {
        log::trace!("landmark {} out of range at {}", landmark.id(), pose.stamp_ns);
        return false;
    }
    if !is_in_angle_range(landmark.yaw(), camera_yaw(pose), deg2rad(MAX_ANGLE_RANGE_DEG)) {
        log::trace!("landmark {} faces away at {}", landmark.id(), pose.stamp_ns);
        return false;
    }
    let top_left = pose.map_to_camera(&landmark.top_left());
    let bottom_right = pose.map_to_camera(&landmark.bottom_right());
    is_in_image_frame(camera, &top_left) || is_in_image_frame(camera, &bottom_right)
}

/// Landmarks visible from at least one of `poses`, in set iteration order.
pub fn select_visible<'a, C: CameraModel + ?Sized>(
    landmarks: &'a LandmarkSet,
    poses: &[CameraPose],
    camera: &C,
    max_range: f64,
) -> Vec<&'a Landmark> {
    landmarks
        .iter()
        .filter(|landmark| landmark.is_actionable())
        .filter(|landmark| {
            poses
                .iter()
                .any(|pose| is_visible_from(landmark, pose, camera, max_range))
        })
        .collect()
}
