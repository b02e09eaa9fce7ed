//! Kernel metadata inspection for Jupyter notebooks.
//!
//! `jupyter nbconvert --to script` names its output after the kernel
//! declared in the notebook. Reading the same metadata up front lets the
//! converter predict the script path instead of relying only on a
//! directory scan afterwards.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ConvertError, Result};

/// Language name to script extension, matching what nbconvert emits
static LANGUAGE_EXTENSIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("python", "py"),
        ("r", "r"),
        ("julia", "jl"),
        ("scala", "scala"),
        ("bash", "sh"),
        ("sh", "sh"),
        ("javascript", "js"),
        ("typescript", "ts"),
        ("ruby", "rb"),
        ("haskell", "hs"),
        ("ocaml", "ml"),
        ("c++", "cpp"),
        ("rust", "rs"),
    ])
});

/// Kernel identity declared in a notebook's metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KernelInfo {
    /// Kernel name from `kernelspec.name` (e.g. "python3", "ir")
    pub kernel_name: Option<String>,
    /// Language from `language_info.name`, or `kernelspec.language` if absent
    pub language: Option<String>,
    /// Extension from `language_info.file_extension` (e.g. ".py")
    pub file_extension: Option<String>,
}

impl KernelInfo {
    /// Predicted script extension without the leading dot, if the metadata
    /// is conclusive. Resolution order: declared `file_extension`, then the
    /// language table, then common kernel names.
    pub fn script_extension(&self) -> Option<String> {
        if let Some(ext) = &self.file_extension {
            let ext = ext.trim_start_matches('.');
            if !ext.is_empty() {
                return Some(ext.to_ascii_lowercase());
            }
        }

        if let Some(lang) = &self.language {
            if let Some(ext) = LANGUAGE_EXTENSIONS.get(lang.to_ascii_lowercase().as_str()) {
                return Some((*ext).to_string());
            }
        }

        self.kernel_name.as_deref().and_then(extension_for_kernel)
    }
}

/// Extension guesses for kernel names seen without any language metadata
fn extension_for_kernel(name: &str) -> Option<String> {
    let name = name.to_ascii_lowercase();
    let ext = if name.starts_with("python") {
        "py"
    } else if name == "ir" {
        "r"
    } else if name.starts_with("julia") {
        "jl"
    } else if name == "bash" {
        "sh"
    } else {
        return None;
    };
    Some(ext.to_string())
}

#[derive(Debug, Default, Deserialize)]
struct RawNotebook {
    #[serde(default)]
    metadata: RawMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    kernelspec: Option<RawKernelspec>,
    language_info: Option<RawLanguageInfo>,
}

#[derive(Debug, Deserialize)]
struct RawKernelspec {
    name: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLanguageInfo {
    name: Option<String>,
    file_extension: Option<String>,
}

/// Reads the kernel metadata from a notebook file
pub fn read(path: &Path) -> Result<KernelInfo> {
    let content = fs::read_to_string(path)?;
    from_str(&content)
}

/// Parses kernel metadata out of notebook JSON
pub fn from_str(content: &str) -> Result<KernelInfo> {
    let raw: RawNotebook = serde_json::from_str(content)
        .map_err(|e| ConvertError::BadMetadata(e.to_string()))?;

    let kernelspec = raw.metadata.kernelspec;
    let language_info = raw.metadata.language_info;

    Ok(KernelInfo {
        kernel_name: kernelspec.as_ref().and_then(|k| k.name.clone()),
        language: language_info
            .as_ref()
            .and_then(|l| l.name.clone())
            .or_else(|| kernelspec.as_ref().and_then(|k| k.language.clone())),
        file_extension: language_info.and_then(|l| l.file_extension),
    })
}

/// Best-effort variant used on the conversion path. Unreadable metadata is
/// logged and ignored so the caller can fall back to a directory scan.
pub fn peek(path: &Path) -> Option<KernelInfo> {
    match read(path) {
        Ok(info) => Some(info),
        Err(e) => {
            debug!("no kernel metadata from {}: {}", path.display(), e);
            None
        }
    }
}
