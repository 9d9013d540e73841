//! Camera models consumed by the detector.
//!
//! The detector only needs image dimensions and the raw (distorted) pixel of
//! a camera-frame point. Any calibrated model exposing that is usable.

pub mod generic;
pub mod pinhole;

pub use generic::{GenericKind, build_generic_model};
pub use pinhole::{PinholeCamera, RadialTangential};

use nalgebra as na;
use serde::{Deserialize, Serialize};

pub trait CameraModel {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Raw image pixel of `p`, given in the optical camera frame with `p.z > 0`.
    fn project_raw(&self, p: &na::Point3<f64>) -> na::Point2<f64>;
}

impl<C: CameraModel + ?Sized> CameraModel for Box<C> {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn project_raw(&self, p: &na::Point3<f64>) -> na::Point2<f64> {
        (**self).project_raw(p)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CameraConfigError {
    #[error("expected {expected} camera parameters, got {got}")]
    ParamCount { expected: usize, got: usize },
    #[error("image size {width}x{height} is empty")]
    EmptyImage { width: u32, height: u32 },
}

/// Camera description as stored in a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CameraConfig {
    Pinhole(PinholeCamera),
    Generic {
        model: GenericKind,
        params: Vec<f64>,
        width: u32,
        height: u32,
    },
}

impl CameraConfig {
    pub fn build(&self) -> Result<Box<dyn CameraModel>, CameraConfigError> {
        let model: Box<dyn CameraModel> = match self {
            CameraConfig::Pinhole(camera) => Box::new(camera.clone()),
            CameraConfig::Generic {
                model,
                params,
                width,
                height,
            } => Box::new(build_generic_model(*model, params, *width, *height)?),
        };
        if model.width() == 0 || model.height() == 0 {
            return Err(CameraConfigError::EmptyImage {
                width: model.width(),
                height: model.height(),
            });
        }
        Ok(model)
    }
}
