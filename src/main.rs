//! Harmonizer CLI
//!
//! Command-line interface for the melody harmonizer.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use harmonizer::cli::{commands, Cli, Commands};
use harmonizer::HarmonizerConfig;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Harmonizer v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Harmonizer v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<ExitCode> {
    match cmd {
        Commands::Harmonize(args) => {
            let report = commands::harmonize(&args).context("harmonization run failed")?;
            if report.has_failures() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Commands::Vocabulary { path } => {
            commands::show_vocabulary(&path)
                .with_context(|| format!("cannot inspect vocabulary {}", path.display()))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Models { vocabulary } => {
            let path = vocabulary.unwrap_or_else(|| HarmonizerConfig::default().vocabulary_path);
            commands::list_models(&path)
                .with_context(|| format!("cannot load vocabulary {}", path.display()))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
