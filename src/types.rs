use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Camera pose sampled at `stamp_ns`.
///
/// `map_from_camera` is the pose of the optical camera frame (x right, y down,
/// z forward) in the map frame, i.e. it maps camera-frame points into the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub stamp_ns: i64,
    pub map_from_camera: na::Isometry3<f64>,
}

impl CameraPose {
    pub fn new(stamp_ns: i64, map_from_camera: na::Isometry3<f64>) -> CameraPose {
        CameraPose {
            stamp_ns,
            map_from_camera,
        }
    }

    /// Optical camera at `position` looking horizontally along map heading `yaw`.
    pub fn optical_from_yaw(stamp_ns: i64, position: na::Point3<f64>, yaw: f64) -> CameraPose {
        // columns: camera x -> map -y, camera y -> map -z, camera z -> map +x
        let optical = na::Rotation3::from_matrix_unchecked(na::Matrix3::new(
            0.0, 0.0, 1.0, //
            -1.0, 0.0, 0.0, //
            0.0, -1.0, 0.0,
        ));
        let heading = na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), yaw);
        let rotation = na::UnitQuaternion::from_rotation_matrix(&(heading * optical));
        CameraPose::new(
            stamp_ns,
            na::Isometry3::from_parts(na::Translation3::from(position.coords), rotation),
        )
    }

    /// Camera centre in the map frame.
    pub fn origin(&self) -> na::Point3<f64> {
        na::Point3::from(self.map_from_camera.translation.vector)
    }

    /// Camera optical axis expressed in the map frame.
    pub fn forward_axis(&self) -> na::Vector3<f64> {
        self.map_from_camera.rotation * na::Vector3::z()
    }

    pub fn map_to_camera(&self, p_map: &na::Point3<f64>) -> na::Point3<f64> {
        self.map_from_camera.inverse_transform_point(p_map)
    }
}

/// Axis-aligned pixel rectangle bounding one landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roi {
    pub landmark_id: i64,
    pub x_offset: u32,
    pub y_offset: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    pub fn right(&self) -> u32 {
        self.x_offset + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y_offset + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.x_offset as f64 + self.width as f64 * 0.5,
            self.y_offset as f64 + self.height as f64 * 0.5,
        )
    }

    /// `true` if `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Roi) -> bool {
        self.x_offset <= other.x_offset
            && self.y_offset <= other.y_offset
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
    pub stamp_ns: i64,
    pub frame_id: String,
}

impl FrameHeader {
    pub fn new(stamp_ns: i64, frame_id: impl Into<String>) -> FrameHeader {
        FrameHeader {
            stamp_ns,
            frame_id: frame_id.into(),
        }
    }
}

/// ROIs emitted for one camera frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiArray {
    pub header: FrameHeader,
    pub rois: Vec<Roi>,
}

impl RoiArray {
    pub fn empty(header: FrameHeader) -> RoiArray {
        RoiArray {
            header,
            rois: Vec::new(),
        }
    }
}
