//! Map-based traffic mirror detection.
//!
//! Given the mirrors stored in a vector map, a calibrated camera and the
//! camera's pose history, this crate finds the mirrors the camera can see and
//! computes for each one a conservative image ROI that survives pose jitter
//! and timestamp uncertainty, plus the ROI expected at the nominal pose.

pub mod camera_model;
pub mod config;
pub mod detector;
pub mod io;
pub mod landmark;
pub mod map;
pub mod pose_source;
pub mod roi;
pub mod store;
pub mod types;
pub mod util;
pub mod visibility;
pub mod visualization;

pub use camera_model::{CameraConfig, CameraModel, PinholeCamera};
pub use config::{DetectorConfig, UncertaintyConfig};
pub use detector::{DetectError, DetectionOutput, MapBasedDetector};
pub use landmark::{Landmark, LandmarkSet};
pub use pose_source::{PoseLookupError, PoseSource, TrajectoryPoseSource};
pub use store::{LandmarkSnapshot, LandmarkStore};
pub use types::{CameraPose, FrameHeader, Roi, RoiArray};
