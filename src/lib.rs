pub mod batch;
pub mod config;
pub mod converters;
pub mod error;
pub mod kernel;
pub mod tools;
pub mod walker;

use once_cell::sync::Lazy;

pub use batch::{convert_directory, convert_directory_with, Conversion};
pub use config::ToolConfig;
pub use converters::{
    convert_ipynb, convert_rmd, ConverterKind, ConverterRegistry, DocumentConverter,
    NotebookConverter, RmdConverter,
};
pub use error::{ConvertError, Result};
pub use kernel::KernelInfo;
pub use walker::DocumentWalker;

/// Global converter registry with default tool configuration (lazily initialized)
pub static REGISTRY: Lazy<ConverterRegistry> = Lazy::new(ConverterRegistry::default);
