use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::config::ToolConfig;
use crate::error::{ConvertError, Result};
use crate::tools;

use super::DocumentConverter;

/// Extracts R code from R Markdown documents via `knitr::purl`
#[derive(Debug, Clone, Default)]
pub struct RmdConverter {
    config: ToolConfig,
}

impl RmdConverter {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }
}

/// The expression handed to `R -e`. `documentation = 0` drops the prose and
/// keeps the code chunks in document order.
fn purl_expression(input: &Path, output: &Path) -> String {
    format!(
        r#"knitr::purl(input = "{}", output = "{}", documentation = 0)"#,
        escape_r_string(&input.to_string_lossy()),
        escape_r_string(&output.to_string_lossy()),
    )
}

/// Escapes a string for an R double-quoted literal
fn escape_r_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl DocumentConverter for RmdConverter {
    fn name(&self) -> &'static str {
        "rmd"
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["Rmd", "rmd"]
    }

    fn convert(&self, input: &Path) -> Result<PathBuf> {
        if !input.exists() {
            return Err(ConvertError::InputNotFound(input.to_path_buf()));
        }
        let input = input.canonicalize()?;
        let output = input.with_extension("r");

        tools::run_tool(
            Command::new(&self.config.r_bin)
                .arg("-e")
                .arg(purl_expression(&input, &output)),
            "R",
        )?;

        if !output.is_file() {
            return Err(ConvertError::OutputMissing(input));
        }

        info!("extracted {} -> {}", input.display(), output.display());
        Ok(output)
    }

    fn check(&self) -> Result<String> {
        tools::r_knitr_version(&self.config)
    }
}

/// Extracts the code chunks of an R Markdown document into an `.r` script
/// next to the input, using the default tool configuration. Requires R with
/// the knitr package.
pub fn convert_rmd(path: impl AsRef<Path>) -> Result<PathBuf> {
    RmdConverter::default().convert(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_escape_plain_path() {
        assert_eq!(escape_r_string("/tmp/report.Rmd"), "/tmp/report.Rmd");
    }

    #[test]
    fn test_escape_backslashes() {
        assert_eq!(
            escape_r_string(r"C:\Users\test\report.Rmd"),
            r"C:\\Users\\test\\report.Rmd"
        );
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_r_string(r#"a"b"#), r#"a\"b"#);
    }

    #[test]
    fn test_escape_backslash_before_quote() {
        assert_eq!(escape_r_string(r#"a\"b"#), r#"a\\\"b"#);
    }

    #[test]
    fn test_purl_expression_shape() {
        let expr = purl_expression(Path::new("/data/report.Rmd"), Path::new("/data/report.r"));
        assert_eq!(
            expr,
            r#"knitr::purl(input = "/data/report.Rmd", output = "/data/report.r", documentation = 0)"#
        );
    }

    #[test]
    fn test_no_output_produced_is_missing() {
        let temp = TempDir::new().unwrap();
        let rmd = temp.path().join("report.Rmd");
        fs::write(&rmd, "# title\n").unwrap();

        // Stand-in R that exits 0 without writing anything
        let converter = RmdConverter::new(ToolConfig {
            jupyter_bin: PathBuf::from("jupyter"),
            r_bin: PathBuf::from("true"),
        });
        let result = converter.convert(&rmd);
        assert!(matches!(result, Err(ConvertError::OutputMissing(_))));
    }

    #[test]
    fn test_missing_input_fails_before_spawn() {
        let converter = RmdConverter::new(ToolConfig {
            jupyter_bin: PathBuf::from("jupyter"),
            r_bin: PathBuf::from("/nonexistent/R"),
        });
        let result = converter.convert(Path::new("/nonexistent/report.Rmd"));
        assert!(matches!(result, Err(ConvertError::InputNotFound(_))));
    }

    #[test]
    fn test_missing_tool_is_unavailable() {
        let temp = TempDir::new().unwrap();
        let rmd = temp.path().join("report.Rmd");
        fs::write(&rmd, "# title\n").unwrap();

        let converter = RmdConverter::new(ToolConfig {
            jupyter_bin: PathBuf::from("jupyter"),
            r_bin: PathBuf::from("/nonexistent/R"),
        });
        let result = converter.convert(&rmd);
        assert!(matches!(result, Err(ConvertError::ToolUnavailable { .. })));
    }
}
