pub mod ipynb;
pub mod rmd;

pub use ipynb::{convert_ipynb, NotebookConverter};
pub use rmd::{convert_rmd, RmdConverter};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::config::ToolConfig;
use crate::error::{ConvertError, Result};

/// A converter that turns one document format into a source script by
/// driving an external tool
pub trait DocumentConverter: Send + Sync {
    /// Short stable name, also used for `--kind` selection
    fn name(&self) -> &'static str;

    /// Input extensions (without the dot) this converter claims
    fn file_extensions(&self) -> &[&'static str];

    /// Converts one document and returns the path of the produced script
    fn convert(&self, input: &Path) -> Result<PathBuf>;

    /// Verifies the external tool behind this converter is usable; Ok
    /// carries a short status line for display
    fn check(&self) -> Result<String>;
}

/// Selects which converters participate in a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterKind {
    Ipynb,
    Rmd,
    Both,
}

impl ConverterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConverterKind::Ipynb => "ipynb",
            ConverterKind::Rmd => "rmd",
            ConverterKind::Both => "both",
        }
    }

    pub fn selects(&self, converter_name: &str) -> bool {
        match self {
            ConverterKind::Both => true,
            ConverterKind::Ipynb => converter_name == "ipynb",
            ConverterKind::Rmd => converter_name == "rmd",
        }
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConverterKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ipynb" | "notebook" => Ok(ConverterKind::Ipynb),
            "rmd" => Ok(ConverterKind::Rmd),
            "both" | "all" => Ok(ConverterKind::Both),
            other => Err(ConvertError::Config(format!(
                "Unknown converter kind '{}' (expected ipynb, rmd or both)",
                other
            ))),
        }
    }
}

/// Registry mapping input file extensions to document converters
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    extension_map: HashMap<String, String>,
}

impl ConverterRegistry {
    /// Builds the default registry with both converters sharing one tool
    /// config
    pub fn new(config: ToolConfig) -> Self {
        let mut registry = Self {
            converters: HashMap::new(),
            extension_map: HashMap::new(),
        };

        registry.register(Arc::new(NotebookConverter::new(config.clone())));
        registry.register(Arc::new(RmdConverter::new(config)));

        registry
    }

    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        let name = converter.name().to_string();
        for ext in converter.file_extensions() {
            self.extension_map.insert(ext.to_string(), name.clone());
        }
        self.converters.insert(name, converter);
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(name).cloned()
    }

    pub fn get_by_extension(&self, extension: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.extension_map
            .get(extension)
            .and_then(|name| self.converters.get(name))
            .cloned()
    }

    pub fn get_for_file(&self, path: &Path) -> Option<Arc<dyn DocumentConverter>> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.get_by_extension(ext))
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        self.get_for_file(path).is_some()
    }

    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.extension_map.keys().map(|s| s.as_str()).collect();
        extensions.sort();
        extensions
    }

    /// Converters participating in a run of the given kind, in a fixed
    /// order (notebooks before R Markdown)
    pub fn selected(&self, kind: ConverterKind) -> Vec<Arc<dyn DocumentConverter>> {
        let mut selected: Vec<_> = self
            .converters
            .values()
            .filter(|c| kind.selects(c.name()))
            .cloned()
            .collect();
        selected.sort_by(|a, b| a.name().cmp(b.name()));
        selected
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new(ToolConfig::default())
    }
}
