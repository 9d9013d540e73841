use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::config::DetectorConfig;
use crate::detector::DetectionOutput;

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error("cannot access {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Serializes an object to a pretty-printed JSON file.
pub fn object_to_json<T: Serialize>(output_path: impl AsRef<Path>, object: &T) -> Result<(), IoError> {
    let path = output_path.as_ref();
    let j = serde_json::to_string_pretty(object).map_err(|source| IoError::Json {
        path: path.display().to_string(),
        source,
    })?;
    std::fs::write(path, j).map_err(|source| IoError::File {
        path: path.display().to_string(),
        source,
    })
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T, IoError> {
    let path = file_path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| IoError::File {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| IoError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Replay output written by the CLI.
#[derive(Debug, Serialize)]
pub struct DetectionReport {
    pub generated_at: String,
    pub config: DetectorConfig,
    pub frames_processed: usize,
    pub frames_skipped: usize,
    pub outputs: Vec<DetectionOutput>,
}

impl DetectionReport {
    pub fn new(config: DetectorConfig, frames_processed: usize, outputs: Vec<DetectionOutput>) -> Self {
        let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
        let generated_at = now
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| now.unix_timestamp().to_string());
        DetectionReport {
            generated_at,
            config,
            frames_processed,
            frames_skipped: frames_processed.saturating_sub(outputs.len()),
            outputs,
        }
    }
}
