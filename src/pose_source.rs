use std::collections::HashMap;

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::types::CameraPose;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PoseLookupError {
    #[error("no transform history for frame `{0}`")]
    UnknownFrame(String),
    #[error("transform history for frame `{0}` is empty")]
    Empty(String),
    #[error("stamp {stamp_ns} ns is outside the buffered range [{first_ns}, {last_ns}]")]
    Extrapolation {
        stamp_ns: i64,
        first_ns: i64,
        last_ns: i64,
    },
}

/// Looks up the camera pose in the map frame at a given time.
///
/// Implementations must return promptly; a lookup that cannot be served is an
/// `Err`, never a panic or an indefinite wait.
pub trait PoseSource {
    fn lookup(&self, stamp_ns: i64, frame_id: &str) -> Result<CameraPose, PoseLookupError>;
}

impl<F> PoseSource for F
where
    F: Fn(i64, &str) -> Result<CameraPose, PoseLookupError>,
{
    fn lookup(&self, stamp_ns: i64, frame_id: &str) -> Result<CameraPose, PoseLookupError> {
        self(stamp_ns, frame_id)
    }
}

/// One stamped camera pose as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    pub stamp_ns: i64,
    pub translation: [f64; 3],
    pub rotation_xyzw: [f64; 4],
}

impl PoseRecord {
    pub fn to_pose(&self) -> CameraPose {
        let [x, y, z, w] = self.rotation_xyzw;
        let rotation = na::UnitQuaternion::from_quaternion(na::Quaternion::new(w, x, y, z));
        let translation = na::Translation3::new(
            self.translation[0],
            self.translation[1],
            self.translation[2],
        );
        CameraPose::new(self.stamp_ns, na::Isometry3::from_parts(translation, rotation))
    }

    pub fn from_pose(pose: &CameraPose) -> PoseRecord {
        let t = pose.map_from_camera.translation.vector;
        let q = pose.map_from_camera.rotation.quaternion();
        PoseRecord {
            stamp_ns: pose.stamp_ns,
            translation: [t.x, t.y, t.z],
            rotation_xyzw: [q.i, q.j, q.k, q.w],
        }
    }
}

/// Trajectory file: a frame id and its stamped poses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub frame_id: String,
    pub poses: Vec<PoseRecord>,
}

/// In-memory transform history, interpolated between buffered samples.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryPoseSource {
    frames: HashMap<String, Vec<CameraPose>>,
}

impl TrajectoryPoseSource {
    pub fn new() -> TrajectoryPoseSource {
        TrajectoryPoseSource::default()
    }

    pub fn from_trajectory(trajectory: &Trajectory) -> TrajectoryPoseSource {
        let mut source = TrajectoryPoseSource::new();
        source.insert_frame(
            &trajectory.frame_id,
            trajectory.poses.iter().map(PoseRecord::to_pose),
        );
        source
    }

    /// Replaces the history of `frame_id`.
    pub fn insert_frame(&mut self, frame_id: &str, poses: impl IntoIterator<Item = CameraPose>) {
        let mut poses: Vec<CameraPose> = poses.into_iter().collect();
        poses.sort_by_key(|p| p.stamp_ns);
        poses.dedup_by_key(|p| p.stamp_ns);
        self.frames.insert(frame_id.to_string(), poses);
    }
}

impl PoseSource for TrajectoryPoseSource {
    fn lookup(&self, stamp_ns: i64, frame_id: &str) -> Result<CameraPose, PoseLookupError> {
        let poses = self
            .frames
            .get(frame_id)
            .ok_or_else(|| PoseLookupError::UnknownFrame(frame_id.to_string()))?;
        let (first, last) = match (poses.first(), poses.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(PoseLookupError::Empty(frame_id.to_string())),
        };
        if stamp_ns < first.stamp_ns || stamp_ns > last.stamp_ns {
            return Err(PoseLookupError::Extrapolation {
                stamp_ns,
                first_ns: first.stamp_ns,
                last_ns: last.stamp_ns,
            });
        }
        let idx = poses.partition_point(|p| p.stamp_ns < stamp_ns);
        let after = &poses[idx];
        if after.stamp_ns == stamp_ns || idx == 0 {
            return Ok(CameraPose::new(stamp_ns, after.map_from_camera));
        }
        let before = &poses[idx - 1];
        let t = (stamp_ns - before.stamp_ns) as f64 / (after.stamp_ns - before.stamp_ns) as f64;
        let interpolated = before.map_from_camera.lerp_slerp(&after.map_from_camera, t);
        Ok(CameraPose::new(stamp_ns, interpolated))
    }
}
