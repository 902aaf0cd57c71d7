//! Experiment catalog and storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Experiment catalog and conversation storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentsConfig {
    /// Directory holding experiment definition YAML files
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Directory for persisted conversation data; in-memory storage when unset
    pub data_dir: Option<PathBuf>,
}

impl ExperimentsConfig {
    /// Validate experiments configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptyExperimentDir);
        }
        Ok(())
    }
}

impl Default for ExperimentsConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            data_dir: None,
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("experiments")
}
