//! JSON runtime configuration for [`LaneParams`].
//!
//! Missing keys fall back to defaults, so a file only needs the knobs it
//! overrides:
//!
//! ```json
//! { "scan": { "numPoints": 40, "outlierThreshold": 2.5 } }
//! ```
use crate::params::LaneParams;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, reason: String },
    Parse { path: Option<PathBuf>, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, reason } => {
                write!(f, "failed to read config {}: {reason}", path.display())
            }
            ConfigError::Parse {
                path: Some(path),
                reason,
            } => write!(f, "failed to parse config {}: {reason}", path.display()),
            ConfigError::Parse { path: None, reason } => {
                write!(f, "failed to parse config: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl LaneParams {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            path: None,
            reason: e.to_string(),
        })
    }
}

pub fn load_config(path: &Path) -> Result<LaneParams, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: Some(path.to_path_buf()),
        reason: e.to_string(),
    })
}
