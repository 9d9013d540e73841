use nalgebra as na;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::landmark::Landmark;
use crate::types::CameraPose;

/// Segment from the camera origin to a landmark centre, in the camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamMarker {
    pub landmark_id: i64,
    pub start: [f64; 3],
    pub end: [f64; 3],
}

pub fn beam_markers(pose: &CameraPose, landmarks: &[&Landmark]) -> Vec<BeamMarker> {
    landmarks
        .iter()
        .map(|landmark| {
            let center: na::Point3<f64> = pose.map_to_camera(&landmark.center());
            BeamMarker {
                landmark_id: landmark.id(),
                start: [0.0, 0.0, 0.0],
                end: [center.x, center.y, center.z],
            }
        })
        .collect()
}

/// Stable pseudo-random colour for a landmark id.
pub fn id_to_color(id: i64) -> (u8, u8, u8, u8) {
    let mut rng = ChaCha8Rng::seed_from_u64(id as u64);
    let color_num = rng.random_range(0..2u32.pow(24));
    (
        ((color_num >> 16) % 256) as u8,
        ((color_num >> 8) % 256) as u8,
        (color_num % 256) as u8,
        255,
    )
}

#[cfg(feature = "visualization")]
pub use self::rerun_log::*;

#[cfg(feature = "visualization")]
mod rerun_log {
    use rerun::{RecordingStream, TimeCell};

    use super::{BeamMarker, id_to_color};
    use crate::types::RoiArray;

    pub fn set_frame_time(recording: &RecordingStream, stamp_ns: i64) {
        recording.set_time("stable", TimeCell::from_timestamp_nanos_since_epoch(stamp_ns));
    }

    /// rerun uses the top-left pixel corner as (0, 0), which matches the ROI convention.
    pub fn log_rois(
        recording: &RecordingStream,
        topic: &str,
        rois: &RoiArray,
    ) -> rerun::RecordingStreamResult<()> {
        let (mins, sizes): (Vec<_>, Vec<_>) = rois
            .rois
            .iter()
            .map(|r| {
                (
                    [r.x_offset as f32, r.y_offset as f32],
                    [r.width as f32, r.height as f32],
                )
            })
            .unzip();
        let colors: Vec<_> = rois.rois.iter().map(|r| id_to_color(r.landmark_id)).collect();
        let labels: Vec<_> = rois.rois.iter().map(|r| r.landmark_id.to_string()).collect();
        recording.log(
            format!("{}/rois", topic),
            &rerun::Boxes2D::from_mins_and_sizes(mins, sizes)
                .with_colors(colors)
                .with_labels(labels),
        )
    }

    pub fn log_beams(
        recording: &RecordingStream,
        topic: &str,
        beams: &[BeamMarker],
    ) -> rerun::RecordingStreamResult<()> {
        let strips: Vec<Vec<[f32; 3]>> = beams
            .iter()
            .map(|b| {
                vec![
                    [b.start[0] as f32, b.start[1] as f32, b.start[2] as f32],
                    [b.end[0] as f32, b.end[1] as f32, b.end[2] as f32],
                ]
            })
            .collect();
        recording.log(
            format!("{}/beams", topic),
            &rerun::LineStrips3D::new(strips)
                .with_colors([rerun::Color::from_rgb(0, 255, 0)])
                .with_radii([0.025]),
        )
    }
}
