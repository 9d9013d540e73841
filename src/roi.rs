//! Image-space regions of interest for map landmarks.
//!
//! Platform vibration is modelled as a margin around each projected corner:
//! an angular term that grows with depth (`sin(angle / 2) * depth`, the lateral
//! displacement of a small rotation) plus a fixed linear term. The top-left
//! corner is pushed up and left, the bottom-right corner down and right.
//!
//! The depth tolerance moves a point along the viewing ray, which shifts its
//! pixel towards or away from the principal point depending on which side of
//! it the corner lies. Both ends of the depth interval are projected and the
//! outermost pixel is kept, so a larger tolerance never shrinks the box.

use nalgebra as na;

use crate::camera_model::CameraModel;
use crate::config::UncertaintyConfig;
use crate::landmark::Landmark;
use crate::types::{CameraPose, Roi};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RoiError {
    #[error("landmark {landmark_id} is behind the camera")]
    BehindCamera { landmark_id: i64 },
    #[error("landmark {landmark_id} projects to a non-finite pixel")]
    NonFinitePixel { landmark_id: i64 },
    #[error("landmark {landmark_id} box collapsed to {width}x{height}")]
    Collapsed {
        landmark_id: i64,
        width: i64,
        height: i64,
    },
    #[error("landmark {landmark_id} has no valid ROI under any pose")]
    NoPoseAccepted { landmark_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    TopLeft,
    BottomRight,
}

/// Margins in camera-frame meters for a point at depth `depth`.
fn vibration_margin(cfg: &UncertaintyConfig, depth: f64) -> na::Vector3<f64> {
    na::Vector3::new(
        (cfg.max_vibration_yaw * 0.5).sin() * depth + cfg.max_vibration_width * 0.5,
        (cfg.max_vibration_pitch * 0.5).sin() * depth + cfg.max_vibration_height * 0.5,
        cfg.max_vibration_depth * 0.5,
    )
}

/// Clamps a raw pixel into the image and truncates to integer coordinates.
fn round_in_image_frame<C: CameraModel + ?Sized>(camera: &C, px: &na::Point2<f64>) -> (u32, u32) {
    let max_x = camera.width().saturating_sub(1) as f64;
    let max_y = camera.height().saturating_sub(1) as f64;
    (px.x.clamp(0.0, max_x) as u32, px.y.clamp(0.0, max_y) as u32)
}

fn project_corner<C: CameraModel + ?Sized>(
    camera: &C,
    landmark_id: i64,
    p_camera: &na::Point3<f64>,
    cfg: &UncertaintyConfig,
    corner: Corner,
) -> Result<(u32, u32), RoiError> {
    let margin = vibration_margin(cfg, p_camera.z);
    let shifted = match corner {
        Corner::TopLeft => na::Point3::new(p_camera.x - margin.x, p_camera.y - margin.y, p_camera.z),
        Corner::BottomRight => {
            na::Point3::new(p_camera.x + margin.x, p_camera.y + margin.y, p_camera.z)
        }
    };
    let near = na::Point3::new(shifted.x, shifted.y, shifted.z - margin.z);
    if near.z <= 0.0 {
        return Err(RoiError::BehindCamera { landmark_id });
    }
    let mut px = camera.project_raw(&near);
    if margin.z > 0.0 {
        let far = camera.project_raw(&na::Point3::new(shifted.x, shifted.y, shifted.z + margin.z));
        px = match corner {
            Corner::TopLeft => na::Point2::new(px.x.min(far.x), px.y.min(far.y)),
            Corner::BottomRight => na::Point2::new(px.x.max(far.x), px.y.max(far.y)),
        };
    }
    if !(px.x.is_finite() && px.y.is_finite()) {
        return Err(RoiError::NonFinitePixel { landmark_id });
    }
    Ok(round_in_image_frame(camera, &px))
}

/// ROI of `landmark` seen from a single pose, enlarged by the vibration margins.
pub fn project_roi<C: CameraModel + ?Sized>(
    pose: &CameraPose,
    camera: &C,
    landmark: &Landmark,
    cfg: &UncertaintyConfig,
) -> Result<Roi, RoiError> {
    let landmark_id = landmark.id();

    let top_left = pose.map_to_camera(&landmark.top_left());
    let (x1, y1) = project_corner(camera, landmark_id, &top_left, cfg, Corner::TopLeft)?;

    let bottom_right = pose.map_to_camera(&landmark.bottom_right());
    let (x2, y2) = project_corner(camera, landmark_id, &bottom_right, cfg, Corner::BottomRight)?;

    let width = x2 as i64 - x1 as i64;
    let height = y2 as i64 - y1 as i64;
    if width < 1 || height < 1 {
        return Err(RoiError::Collapsed {
            landmark_id,
            width,
            height,
        });
    }
    Ok(Roi {
        landmark_id,
        x_offset: x1,
        y_offset: y1,
        width: width as u32,
        height: height as u32,
    })
}

/// Union of the per-pose ROIs of `landmark` over every pose that yields one.
///
/// Fails only if no pose produces a valid ROI.
pub fn aggregate_roi<C: CameraModel + ?Sized>(
    poses: &[CameraPose],
    camera: &C,
    landmark: &Landmark,
    cfg: &UncertaintyConfig,
) -> Result<Roi, RoiError> {
    let rois: Vec<Roi> = poses
        .iter()
        .filter_map(|pose| match project_roi(pose, camera, landmark, cfg) {
            Ok(roi) => Some(roi),
            Err(e) => {
                log::trace!("pose {} rejected: {}", pose.stamp_ns, e);
                None
            }
        })
        .collect();
    if rois.is_empty() {
        return Err(RoiError::NoPoseAccepted {
            landmark_id: landmark.id(),
        });
    }

    let mut x1 = camera.width().saturating_sub(1);
    let mut x2 = 0;
    let mut y1 = camera.height().saturating_sub(1);
    let mut y2 = 0;
    for roi in &rois {
        x1 = x1.min(roi.x_offset);
        x2 = x2.max(roi.right());
        y1 = y1.min(roi.y_offset);
        y2 = y2.max(roi.bottom());
    }
    Ok(Roi {
        landmark_id: landmark.id(),
        x_offset: x1,
        y_offset: y1,
        width: x2 - x1,
        height: y2 - y1,
    })
}
