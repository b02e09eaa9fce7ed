mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

use nb_to_src::config::ToolConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nb_to_src=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = ToolConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert { path } => {
            cli::convert_file(&path, config)?;
        }
        Commands::Dir {
            path,
            kind,
            recursive,
            format,
        } => {
            cli::convert_dir(&path, &kind, recursive, &format, config)?;
        }
        Commands::Check => {
            cli::check_tools(config)?;
        }
    }

    Ok(())
}
