use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::config::ToolConfig;
use crate::error::{ConvertError, Result};
use crate::kernel;
use crate::tools;

use super::DocumentConverter;

/// Converts Jupyter notebooks to source scripts via `jupyter nbconvert`
#[derive(Debug, Clone, Default)]
pub struct NotebookConverter {
    config: ToolConfig,
}

impl NotebookConverter {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }
}

impl DocumentConverter for NotebookConverter {
    fn name(&self) -> &'static str {
        "ipynb"
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["ipynb"]
    }

    fn convert(&self, input: &Path) -> Result<PathBuf> {
        if !input.exists() {
            return Err(ConvertError::InputNotFound(input.to_path_buf()));
        }
        let input = input.canonicalize()?;

        let stem = input
            .file_stem()
            .ok_or_else(|| ConvertError::UnsupportedInput(input.clone()))?
            .to_os_string();
        let parent = input
            .parent()
            .ok_or_else(|| ConvertError::UnsupportedInput(input.clone()))?
            .to_path_buf();

        // The script extension depends on the notebook kernel; peek at the
        // metadata so the output can be located by name afterwards.
        let expected_ext = kernel::peek(&input).and_then(|k| k.script_extension());

        // nbconvert resolves a bare --output name against its working
        // directory, so run it from the notebook's directory to keep the
        // script next to the input.
        tools::run_tool(
            Command::new(&self.config.jupyter_bin)
                .args(["nbconvert", "--to", "script"])
                .arg(&input)
                .arg("--output")
                .arg(&stem)
                .current_dir(&parent),
            "jupyter nbconvert",
        )?;

        let output = locate_script(&input, &stem, expected_ext.as_deref())?;
        info!("converted {} -> {}", input.display(), output.display());
        Ok(output)
    }

    fn check(&self) -> Result<String> {
        let version = tools::jupyter_version(&self.config)?;
        Ok(format!("jupyter nbconvert {}", version))
    }
}

/// Finds the script nbconvert produced for `input`. The predicted name is
/// tried first; kernels the prediction does not know are covered by a scan
/// for a same-stem sibling that is not the notebook itself.
fn locate_script(input: &Path, stem: &OsStr, expected_ext: Option<&str>) -> Result<PathBuf> {
    let parent = input
        .parent()
        .ok_or_else(|| ConvertError::OutputMissing(input.to_path_buf()))?;

    if let Some(ext) = expected_ext {
        let mut name = stem.to_os_string();
        name.push(".");
        name.push(ext);
        let candidate = parent.join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
        debug!(
            "predicted output {} not present, scanning {}",
            candidate.display(),
            parent.display()
        );
    }

    for entry in std::fs::read_dir(parent)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let same_stem = path.file_stem() == Some(stem);
        let is_notebook = path.extension().and_then(|e| e.to_str()) == Some("ipynb");
        if same_stem && !is_notebook {
            return Ok(path);
        }
    }

    Err(ConvertError::OutputMissing(input.to_path_buf()))
}

/// Converts a Jupyter notebook to its source script using the default tool
/// configuration. The script lands next to the notebook and its extension
/// follows the notebook's kernel. Requires `jupyter nbconvert`.
pub fn convert_ipynb(path: impl AsRef<Path>) -> Result<PathBuf> {
    NotebookConverter::default().convert(path.as_ref())
}
