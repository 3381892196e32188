//! CLI entry point for the mediacache tool.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

mod app;
mod app_config;
mod cli;

use app::command_dispatcher;
use app::config_runtime::{default_log_level, resolve_runtime_settings};
use app::context::RunContext;
use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let loaded = app_config::load_default_file_config()?;
    let file_config = loaded.config.as_ref();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config verbosity > info
    let default_level = default_log_level(&args, file_config);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");
    if let Some(path) = &loaded.path {
        debug!(
            path = %path.display(),
            loaded = file_config.is_some(),
            verbosity = file_config
                .and_then(|cfg| cfg.verbosity)
                .map_or("unset", app_config::VerbositySetting::as_str),
            "config file resolved"
        );
    }

    let settings = resolve_runtime_settings(&args, file_config);
    info!(cache_dir = %settings.cache_dir.display(), "mediacache starting");

    let show_progress = !args.quiet && io::stderr().is_terminal();
    let ctx = RunContext::build(&settings, show_progress).await?;
    let outcome = command_dispatcher::dispatch(&args.command, &ctx).await;

    Ok(outcome.into())
}
