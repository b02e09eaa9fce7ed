//! Shared subprocess plumbing and tool availability probes.

use std::io;
use std::process::{Command, ExitStatus, Output};

use tracing::debug;

use crate::config::ToolConfig;
use crate::error::{ConvertError, Result};

/// Runs a prepared command and maps the two external failure modes into the
/// crate error taxonomy: a spawn failure because the binary does not exist
/// becomes `ToolUnavailable`, a non-zero exit becomes `ToolFailed` with the
/// captured stderr attached.
pub fn run_tool(command: &mut Command, tool: &str) -> Result<Output> {
    debug!("running {:?}", command);

    let output = command.output().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConvertError::ToolUnavailable {
            tool: tool.to_string(),
            detail: format!("not found on PATH: {}", e),
        },
        _ => ConvertError::Io(e),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(classify_failure(tool, output.status, stderr));
    }

    Ok(output)
}

/// R reports a missing knitr installation as an ordinary script error, so a
/// non-zero exit with that stderr signature is an availability failure
/// rather than a conversion failure.
fn classify_failure(tool: &str, status: ExitStatus, stderr: String) -> ConvertError {
    if stderr.contains("there is no package called") && stderr.contains("knitr") {
        return ConvertError::ToolUnavailable {
            tool: "R package knitr".to_string(),
            detail: stderr,
        };
    }
    ConvertError::ToolFailed {
        tool: tool.to_string(),
        status,
        stderr,
    }
}

/// Probes `jupyter nbconvert --version`; Ok carries the reported version
pub fn jupyter_version(config: &ToolConfig) -> Result<String> {
    let output = run_tool(
        Command::new(&config.jupyter_bin).args(["nbconvert", "--version"]),
        "jupyter nbconvert",
    )?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Probes `R -e 'library(knitr)'`; Ok means both R and knitr are usable
pub fn r_knitr_version(config: &ToolConfig) -> Result<String> {
    let output = run_tool(
        Command::new(&config.r_bin).args(["-e", "library(knitr)"]),
        "R",
    )?;

    // R prints its startup banner on stdout in -e mode
    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout
        .lines()
        .find(|line| line.starts_with("R version"))
        .unwrap_or("R")
        .to_string();
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn test_spawn_missing_binary_is_unavailable() {
        let result = run_tool(
            Command::new("/nonexistent/definitely-not-a-tool").arg("--version"),
            "definitely-not-a-tool",
        );
        match result {
            Err(ConvertError::ToolUnavailable { tool, .. }) => {
                assert_eq!(tool, "definitely-not-a-tool");
            }
            other => panic!("expected ToolUnavailable, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_nonzero_exit_is_failure_with_stderr() {
        let result = run_tool(
            Command::new("sh").args(["-c", "echo boom >&2; exit 3"]),
            "sh",
        );
        match result {
            Err(ConvertError::ToolFailed { tool, stderr, .. }) => {
                assert_eq!(tool, "sh");
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected ToolFailed, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_successful_run_returns_output() {
        let output = run_tool(Command::new("sh").args(["-c", "echo ok"]), "sh").unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok");
    }

    #[test]
    fn test_missing_knitr_classified_as_unavailable() {
        let status = ExitStatus::from_raw(256);
        let stderr = "Error in library(knitr) : there is no package called 'knitr'".to_string();
        match classify_failure("R", status, stderr) {
            ConvertError::ToolUnavailable { tool, .. } => assert_eq!(tool, "R package knitr"),
            other => panic!("expected ToolUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_other_r_errors_stay_failures() {
        let status = ExitStatus::from_raw(256);
        let stderr = "Error: unexpected symbol in \"knitr::purl(\"".to_string();
        assert!(matches!(
            classify_failure("R", status, stderr),
            ConvertError::ToolFailed { .. }
        ));
    }
}
