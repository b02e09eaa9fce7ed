use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Names of the environment variables that override tool locations
pub const JUPYTER_ENV: &str = "NB_TO_SRC_JUPYTER";
pub const R_ENV: &str = "NB_TO_SRC_R";

/// Locations of the external tools the converters shell out to.
///
/// Both default to bare command names resolved through PATH. A YAML config
/// file or the `NB_TO_SRC_JUPYTER` / `NB_TO_SRC_R` environment variables
/// override them (env wins over file).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolConfig {
    /// Binary invoked as `jupyter nbconvert ...`
    #[serde(default = "default_jupyter_bin")]
    pub jupyter_bin: PathBuf,

    /// Binary invoked as `R -e ...`
    #[serde(default = "default_r_bin")]
    pub r_bin: PathBuf,
}

fn default_jupyter_bin() -> PathBuf {
    PathBuf::from("jupyter")
}

fn default_r_bin() -> PathBuf {
    PathBuf::from("R")
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            jupyter_bin: default_jupyter_bin(),
            r_bin: default_r_bin(),
        }
    }
}

impl ToolConfig {
    /// Resolves the effective config: file values if a path is given,
    /// defaults otherwise, environment overrides applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConvertError::InputNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| ConvertError::Config(format!("Invalid config YAML: {}", e)))
    }

    fn apply_env(&mut self) {
        if let Ok(bin) = env::var(JUPYTER_ENV) {
            if !bin.is_empty() {
                self.jupyter_bin = PathBuf::from(bin);
            }
        }
        if let Ok(bin) = env::var(R_ENV) {
            if !bin.is_empty() {
                self.r_bin = PathBuf::from(bin);
            }
        }
    }
}
