use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DETECTION_RANGE: f64 = 200.0;
pub const DEFAULT_TIMESTAMP_SAMPLE_LEN: f64 = 0.01;
/// Upper bound on pose lookups per frame across the timestamp window.
pub const MAX_POSE_SAMPLES: usize = 1000;

/// Tolerances applied when projecting one landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyConfig {
    /// Radians.
    pub max_vibration_pitch: f64,
    /// Radians.
    pub max_vibration_yaw: f64,
    /// Meters.
    pub max_vibration_height: f64,
    /// Meters.
    pub max_vibration_width: f64,
    /// Meters.
    pub max_vibration_depth: f64,
    /// Meters.
    pub max_detection_range: f64,
}

impl UncertaintyConfig {
    /// Same range, every vibration term zeroed.
    pub fn without_vibration(&self) -> UncertaintyConfig {
        UncertaintyConfig {
            max_vibration_pitch: 0.0,
            max_vibration_yaw: 0.0,
            max_vibration_height: 0.0,
            max_vibration_width: 0.0,
            max_vibration_depth: 0.0,
            max_detection_range: self.max_detection_range,
        }
    }
}

/// A parameter that was out of range and has been replaced.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid param max_detection_range = {value}, set to default value = {default}")]
    MaxDetectionRange { value: f64, default: f64 },
    #[error("invalid param timestamp_sample_len = {value}, set to default value = {default}")]
    TimestampSampleLen { value: f64, default: f64 },
    #[error("max_timestamp_offset ({max}) < min_timestamp_offset ({min}), set both to 0")]
    TimestampWindow { min: f64, max: f64 },
    #[error(
        "timestamp window needs {samples} pose samples, more than {max}; timestamp_sample_len set to {widened}"
    )]
    TooManySamples {
        samples: f64,
        max: usize,
        widened: f64,
    },
    #[error("invalid param {name} = {value}, set to 0")]
    Vibration { name: &'static str, value: f64 },
}

/// Detector parameters as read from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub max_vibration_pitch: f64,
    pub max_vibration_yaw: f64,
    pub max_vibration_height: f64,
    pub max_vibration_width: f64,
    pub max_vibration_depth: f64,
    /// Seconds, relative to the frame stamp.
    pub min_timestamp_offset: f64,
    /// Seconds, relative to the frame stamp.
    pub max_timestamp_offset: f64,
    /// Seconds between pose samples inside the offset window.
    pub timestamp_sample_len: f64,
    pub max_detection_range: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_vibration_pitch: 0.0,
            max_vibration_yaw: 0.0,
            max_vibration_height: 0.0,
            max_vibration_width: 0.0,
            max_vibration_depth: 0.0,
            min_timestamp_offset: 0.0,
            max_timestamp_offset: 0.0,
            timestamp_sample_len: DEFAULT_TIMESTAMP_SAMPLE_LEN,
            max_detection_range: DEFAULT_MAX_DETECTION_RANGE,
        }
    }
}

impl DetectorConfig {
    /// Replaces out-of-range values with defaults and reports each replacement.
    pub fn sanitized(mut self) -> (DetectorConfig, Vec<ConfigError>) {
        let mut issues = Vec::new();

        if !(self.max_detection_range.is_finite() && self.max_detection_range > 0.0) {
            issues.push(ConfigError::MaxDetectionRange {
                value: self.max_detection_range,
                default: DEFAULT_MAX_DETECTION_RANGE,
            });
            self.max_detection_range = DEFAULT_MAX_DETECTION_RANGE;
        }
        if !(self.timestamp_sample_len.is_finite() && self.timestamp_sample_len > 0.0) {
            issues.push(ConfigError::TimestampSampleLen {
                value: self.timestamp_sample_len,
                default: DEFAULT_TIMESTAMP_SAMPLE_LEN,
            });
            self.timestamp_sample_len = DEFAULT_TIMESTAMP_SAMPLE_LEN;
        }
        // equal offsets are a valid single-instant window
        let window_ok = self.min_timestamp_offset.is_finite()
            && self.max_timestamp_offset.is_finite()
            && self.max_timestamp_offset >= self.min_timestamp_offset
            && (self.max_timestamp_offset - self.min_timestamp_offset).is_finite();
        if !window_ok {
            issues.push(ConfigError::TimestampWindow {
                min: self.min_timestamp_offset,
                max: self.max_timestamp_offset,
            });
            self.min_timestamp_offset = 0.0;
            self.max_timestamp_offset = 0.0;
        }
        let span = self.max_timestamp_offset - self.min_timestamp_offset;
        let samples = (span / self.timestamp_sample_len).floor() + 1.0;
        if samples > MAX_POSE_SAMPLES as f64 {
            let widened = span / (MAX_POSE_SAMPLES - 1) as f64;
            issues.push(ConfigError::TooManySamples {
                samples,
                max: MAX_POSE_SAMPLES,
                widened,
            });
            self.timestamp_sample_len = widened;
        }

        let vibration = [
            ("max_vibration_pitch", &mut self.max_vibration_pitch),
            ("max_vibration_yaw", &mut self.max_vibration_yaw),
            ("max_vibration_height", &mut self.max_vibration_height),
            ("max_vibration_width", &mut self.max_vibration_width),
            ("max_vibration_depth", &mut self.max_vibration_depth),
        ];
        for (name, value) in vibration {
            if !(value.is_finite() && *value >= 0.0) {
                issues.push(ConfigError::Vibration {
                    name,
                    value: *value,
                });
                *value = 0.0;
            }
        }

        for issue in &issues {
            log::error!("{}", issue);
        }
        (self, issues)
    }

    pub fn uncertainty(&self) -> UncertaintyConfig {
        UncertaintyConfig {
            max_vibration_pitch: self.max_vibration_pitch,
            max_vibration_yaw: self.max_vibration_yaw,
            max_vibration_height: self.max_vibration_height,
            max_vibration_width: self.max_vibration_width,
            max_vibration_depth: self.max_vibration_depth,
            max_detection_range: self.max_detection_range,
        }
    }
}
