use nalgebra as na;
use serde::{Deserialize, Serialize};

use super::CameraModel;

/// Brown-Conrady radial-tangential distortion coefficients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RadialTangential {
    #[serde(default)]
    pub k1: f64,
    #[serde(default)]
    pub k2: f64,
    #[serde(default)]
    pub p1: f64,
    #[serde(default)]
    pub p2: f64,
    #[serde(default)]
    pub k3: f64,
}

impl RadialTangential {
    /// Coefficients in `[k1, k2, p1, p2, k3]` order; missing trailing ones are zero.
    pub fn from_slice(d: &[f64]) -> RadialTangential {
        let at = |i: usize| d.get(i).copied().unwrap_or(0.0);
        RadialTangential {
            k1: at(0),
            k2: at(1),
            p1: at(2),
            p2: at(3),
            k3: at(4),
        }
    }

    pub fn distort_normalized(&self, xn: f64, yn: f64) -> (f64, f64) {
        let r2 = xn * xn + yn * yn;
        let r4 = r2 * r2;
        let r6 = r4 * r2;
        let radial = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;
        let x_tan = 2.0 * self.p1 * xn * yn + self.p2 * (r2 + 2.0 * xn * xn);
        let y_tan = self.p1 * (r2 + 2.0 * yn * yn) + 2.0 * self.p2 * xn * yn;
        (xn * radial + x_tan, yn * radial + y_tan)
    }
}

/// Calibrated pinhole camera, the shape a ROS `CameraInfo` carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinholeCamera {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub distortion: RadialTangential,
}

impl PinholeCamera {
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64, width: u32, height: u32) -> PinholeCamera {
        PinholeCamera {
            fx,
            fy,
            cx,
            cy,
            width,
            height,
            distortion: RadialTangential::default(),
        }
    }

    pub fn with_distortion(mut self, distortion: RadialTangential) -> PinholeCamera {
        self.distortion = distortion;
        self
    }

    /// Builds the camera from a row-major intrinsic matrix and `plumb_bob` coefficients.
    pub fn from_camera_info(k: &[f64; 9], d: &[f64], width: u32, height: u32) -> PinholeCamera {
        PinholeCamera::new(k[0], k[4], k[2], k[5], width, height)
            .with_distortion(RadialTangential::from_slice(d))
    }

    /// Square-pixel camera centred on the image with horizontal field of view `hfov`.
    pub fn from_horizontal_fov(width: u32, height: u32, hfov: f64) -> PinholeCamera {
        let f = width as f64 * 0.5 / (hfov * 0.5).tan();
        PinholeCamera::new(f, f, width as f64 * 0.5, height as f64 * 0.5, width, height)
    }

    pub fn camera_matrix(&self) -> na::Matrix3<f64> {
        na::Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    /// Ideal (rectified) pixel of a camera-frame point.
    pub fn project_ideal(&self, p: &na::Point3<f64>) -> na::Point2<f64> {
        na::Point2::new(self.fx * p.x / p.z + self.cx, self.fy * p.y / p.z + self.cy)
    }

    /// Maps a rectified pixel to the raw (distorted) image.
    pub fn unrectify(&self, rectified: &na::Point2<f64>) -> na::Point2<f64> {
        let xn = (rectified.x - self.cx) / self.fx;
        let yn = (rectified.y - self.cy) / self.fy;
        let (xd, yd) = self.distortion.distort_normalized(xn, yn);
        na::Point2::new(self.fx * xd + self.cx, self.fy * yd + self.cy)
    }
}

impl CameraModel for PinholeCamera {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn project_raw(&self, p: &na::Point3<f64>) -> na::Point2<f64> {
        self.unrectify(&self.project_ideal(p))
    }
}
