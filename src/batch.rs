use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::converters::{ConverterKind, ConverterRegistry};
use crate::error::{ConvertError, Result};

/// One completed conversion: which document produced which script
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Conversion {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Converts every supported document directly inside `dir` using the
/// default tool configuration.
///
/// Only the immediate directory level is scanned. Under
/// `ConverterKind::Both` every notebook is converted before any R Markdown
/// document, each pass in lexicographic path order. The first failure
/// aborts the batch.
pub fn convert_directory(dir: impl AsRef<Path>, kind: ConverterKind) -> Result<Vec<Conversion>> {
    convert_directory_with(dir.as_ref(), kind, &crate::REGISTRY)
}

/// `convert_directory` against a caller-supplied registry, for custom tool
/// configuration
pub fn convert_directory_with(
    dir: &Path,
    kind: ConverterKind,
    registry: &ConverterRegistry,
) -> Result<Vec<Conversion>> {
    if !dir.is_dir() {
        return Err(ConvertError::NotADirectory(dir.to_path_buf()));
    }

    let mut results = Vec::new();

    for converter in registry.selected(kind) {
        let mut inputs = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let claimed = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| converter.file_extensions().contains(&ext))
                .unwrap_or(false);
            if claimed {
                inputs.push(path);
            }
        }
        inputs.sort();

        debug!(
            "{}: {} file(s) in {}",
            converter.name(),
            inputs.len(),
            dir.display()
        );

        for input in inputs {
            let output = converter.convert(&input)?;
            results.push(Conversion { input, output });
        }
    }

    Ok(results)
}
