use camera_intrinsic_model::{EUCM, GenericModel, KannalaBrandt4, OpenCVModel5, UCM};
use nalgebra as na;
use serde::{Deserialize, Serialize};

use super::{CameraConfigError, CameraModel};

/// Models from `camera-intrinsic-model` that can be named in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenericKind {
    OpenCV5,
    Ucm,
    Eucm,
    Kb4,
}

impl GenericKind {
    /// Number of intrinsic parameters, focal lengths and principal point included.
    pub fn param_len(&self) -> usize {
        match self {
            GenericKind::OpenCV5 => 9,
            GenericKind::Ucm => 5,
            GenericKind::Eucm => 6,
            GenericKind::Kb4 => 8,
        }
    }
}

pub fn build_generic_model(
    kind: GenericKind,
    params: &[f64],
    width: u32,
    height: u32,
) -> Result<GenericModel<f64>, CameraConfigError> {
    if params.len() != kind.param_len() {
        return Err(CameraConfigError::ParamCount {
            expected: kind.param_len(),
            got: params.len(),
        });
    }
    let params = na::DVector::from_column_slice(params);
    let model = match kind {
        GenericKind::OpenCV5 => GenericModel::OpenCVModel5(OpenCVModel5::new(&params, width, height)),
        GenericKind::Ucm => GenericModel::UCM(UCM::new(&params, width, height)),
        GenericKind::Eucm => GenericModel::EUCM(EUCM::new(&params, width, height)),
        GenericKind::Kb4 => GenericModel::KannalaBrandt4(KannalaBrandt4::new(&params, width, height)),
    };
    Ok(model)
}

impl CameraModel for GenericModel<f64> {
    fn width(&self) -> u32 {
        GenericModel::width(self).round() as u32
    }

    fn height(&self) -> u32 {
        GenericModel::height(self).round() as u32
    }

    fn project_raw(&self, p: &na::Point3<f64>) -> na::Point2<f64> {
        let p2d = self.project_one(&p.coords);
        na::Point2::new(p2d[0], p2d[1])
    }
}
