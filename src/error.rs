use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No converter for input: {}", .0.display())]
    UnsupportedInput(PathBuf),

    #[error("{tool} is not available: {detail}")]
    ToolUnavailable { tool: String, detail: String },

    #[error("{tool} failed ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Converted script not found for: {}", .0.display())]
    OutputMissing(PathBuf),

    #[error("Invalid notebook metadata: {0}")]
    BadMetadata(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
