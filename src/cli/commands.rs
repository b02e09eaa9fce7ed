use std::path::PathBuf;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use nb_to_src::batch::Conversion;
use nb_to_src::config::ToolConfig;
use nb_to_src::converters::{ConverterKind, ConverterRegistry};
use nb_to_src::error::{ConvertError, Result};
use nb_to_src::walker::DocumentWalker;

#[derive(Parser)]
#[command(name = "nb-to-src")]
#[command(about = "Convert Jupyter notebooks and R Markdown documents to source scripts")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Convert a notebook; the script extension follows the notebook kernel
    nb-to-src convert analysis.ipynb

    # Extract the R code from an R Markdown document
    nb-to-src convert report.Rmd

    # Convert every supported document in a directory
    nb-to-src dir ./notebooks

    # Notebooks only, including subdirectories, with a JSON report
    nb-to-src dir ./notebooks --kind ipynb --recursive --format json

    # Verify the external tools are installed
    nb-to-src check
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a YAML tool configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a single notebook or R Markdown document
    Convert {
        /// Path to the .ipynb or .Rmd file
        path: PathBuf,
    },

    /// Convert every supported document in a directory
    Dir {
        /// Path to the directory to convert
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Which converters to run (ipynb, rmd or both)
        #[arg(long, default_value = "both")]
        kind: String,

        /// Descend into subdirectories
        #[arg(long)]
        recursive: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Verify the external conversion tools are available
    Check,
}

pub fn convert_file(path: &PathBuf, config: ToolConfig) -> Result<()> {
    let registry = ConverterRegistry::new(config);
    let converter = registry
        .get_for_file(path)
        .ok_or_else(|| ConvertError::UnsupportedInput(path.clone()))?;

    let output = converter.convert(path)?;
    println!("{}", output.display());
    Ok(())
}

pub fn convert_dir(
    path: &PathBuf,
    kind: &str,
    recursive: bool,
    format: &str,
    config: ToolConfig,
) -> Result<()> {
    let kind: ConverterKind = kind.parse()?;
    if !path.is_dir() {
        return Err(ConvertError::NotADirectory(path.clone()));
    }

    let registry = ConverterRegistry::new(config.clone());
    let walker = DocumentWalker::new(ConverterRegistry::new(config));
    let files = walker.walk(path, recursive)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap()
        .progress_chars("#>-"),
    );

    let mut conversions = Vec::new();
    for file in files {
        let converter = match registry.get_for_file(&file) {
            Some(c) if kind.selects(c.name()) => c,
            _ => {
                pb.inc(1);
                continue;
            }
        };

        pb.set_message(file.display().to_string());
        let output = converter.convert(&file)?;
        conversions.push(Conversion {
            input: file,
            output,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    print_report(&conversions, format);
    Ok(())
}

pub fn check_tools(config: ToolConfig) -> Result<()> {
    let registry = ConverterRegistry::new(config);

    let mut first_error = None;
    for converter in registry.selected(ConverterKind::Both) {
        match converter.check() {
            Ok(status) => println!("{:<6} ok ({})", converter.name(), status),
            Err(e) => {
                println!("{:<6} unavailable ({})", converter.name(), e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn print_report(conversions: &[Conversion], format: &str) {
    if format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(conversions).unwrap_or_default()
        );
        return;
    }

    for conversion in conversions {
        println!(
            "{} -> {}",
            conversion.input.display(),
            conversion.output.display()
        );
    }
    println!("Converted {} file(s)", conversions.len());
}
