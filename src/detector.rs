//! Per-frame driver: candidate poses, visibility, then rough and expected ROIs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::camera_model::CameraModel;
use crate::config::{DetectorConfig, MAX_POSE_SAMPLES};
use crate::pose_source::{PoseLookupError, PoseSource};
use crate::roi::aggregate_roi;
use crate::store::LandmarkSnapshot;
use crate::types::{CameraPose, FrameHeader, RoiArray};
use crate::util::{Throttle, seconds_to_nanos};
use crate::visibility::select_visible;
use crate::visualization::{BeamMarker, beam_markers};

const POSE_WARNING_PERIOD: Duration = Duration::from_millis(5000);

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    #[error("no traffic mirror data available")]
    LandmarksNotReady,
    #[error("cannot get transform from map frame to `{frame_id}` at {stamp_ns} ns: {source}")]
    NominalPoseUnavailable {
        stamp_ns: i64,
        frame_id: String,
        #[source]
        source: PoseLookupError,
    },
}

/// Everything emitted for one camera frame.
///
/// `rough` and `expected` are parallel: entry `i` of both belongs to the same
/// landmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionOutput {
    pub rough: RoiArray,
    pub expected: RoiArray,
    pub beams: Vec<BeamMarker>,
}

/// Poses at `stamp + min_offset`, stepping by `timestamp_sample_len` up to
/// `stamp + max_offset` inclusive. Failed lookups are left out.
///
/// Window bounds saturate at the `i64` range and at most [`MAX_POSE_SAMPLES`]
/// stamps are looked up.
pub fn sample_candidate_poses<P: PoseSource + ?Sized>(
    source: &P,
    header: &FrameHeader,
    config: &DetectorConfig,
) -> Vec<CameraPose> {
    let t1 = header
        .stamp_ns
        .saturating_add(seconds_to_nanos(config.min_timestamp_offset));
    let t2 = header
        .stamp_ns
        .saturating_add(seconds_to_nanos(config.max_timestamp_offset));
    let step = seconds_to_nanos(config.timestamp_sample_len).max(1);

    std::iter::successors(Some(t1), |t| t.checked_add(step))
        .take_while(|t| *t <= t2)
        .take(MAX_POSE_SAMPLES)
        .filter_map(|t| match source.lookup(t, &header.frame_id) {
            Ok(pose) => Some(pose),
            Err(e) => {
                log::debug!("pose sample at {} skipped: {}", t, e);
                None
            }
        })
        .collect()
}

pub struct MapBasedDetector {
    config: DetectorConfig,
    pose_warning: Throttle,
}

impl MapBasedDetector {
    /// Builds a detector, replacing invalid parameters with their defaults.
    pub fn new(config: DetectorConfig) -> MapBasedDetector {
        let (config, _) = config.sanitized();
        log::info!("detector config: {:?}", config);
        MapBasedDetector {
            config,
            pose_warning: Throttle::new(POSE_WARNING_PERIOD),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Runs one detection pass against a fixed landmark snapshot.
    pub fn detect<C, P>(
        &self,
        header: &FrameHeader,
        camera: &C,
        pose_source: &P,
        landmarks: &LandmarkSnapshot,
    ) -> Result<DetectionOutput, DetectError>
    where
        C: CameraModel + ?Sized,
        P: PoseSource + ?Sized,
    {
        let landmark_set = landmarks.authoritative().ok_or(DetectError::LandmarksNotReady)?;

        let mut candidates = sample_candidate_poses(pose_source, header, &self.config);
        let nominal = pose_source
            .lookup(header.stamp_ns, &header.frame_id)
            .map_err(|source| DetectError::NominalPoseUnavailable {
                stamp_ns: header.stamp_ns,
                frame_id: header.frame_id.clone(),
                source,
            })?;
        if candidates.is_empty() {
            candidates.push(nominal);
        }

        let visible = select_visible(
            landmark_set,
            &candidates,
            camera,
            self.config.max_detection_range,
        );

        let rough_cfg = self.config.uncertainty();
        let expected_cfg = rough_cfg.without_vibration();
        let mut rough = RoiArray::empty(header.clone());
        let mut expected = RoiArray::empty(header.clone());
        for landmark in &visible {
            let expect_roi =
                match aggregate_roi(std::slice::from_ref(&nominal), camera, landmark, &expected_cfg) {
                    Ok(roi) => roi,
                    Err(e) => {
                        log::debug!("no expected ROI: {}", e);
                        continue;
                    }
                };
            let rough_roi = match aggregate_roi(&candidates, camera, landmark, &rough_cfg) {
                Ok(roi) => roi,
                Err(e) => {
                    log::debug!("no rough ROI: {}", e);
                    continue;
                }
            };
            rough.rois.push(rough_roi);
            expected.rois.push(expect_roi);
        }

        Ok(DetectionOutput {
            rough,
            expected,
            beams: beam_markers(&nominal, &visible),
        })
    }

    /// [`detect`](Self::detect) with the reporting policy applied: missing map
    /// data is logged at debug level, pose failures as a rate-limited warning.
    pub fn process_frame<C, P>(
        &self,
        header: &FrameHeader,
        camera: &C,
        pose_source: &P,
        landmarks: &LandmarkSnapshot,
    ) -> Option<DetectionOutput>
    where
        C: CameraModel + ?Sized,
        P: PoseSource + ?Sized,
    {
        match self.detect(header, camera, pose_source, landmarks) {
            Ok(output) => Some(output),
            Err(e @ DetectError::LandmarksNotReady) => {
                log::debug!("skipping frame {}: {}", header.stamp_ns, e);
                None
            }
            Err(e @ DetectError::NominalPoseUnavailable { .. }) => {
                if self.pose_warning.ready() {
                    log::warn!("{}", e);
                }
                None
            }
        }
    }
}
