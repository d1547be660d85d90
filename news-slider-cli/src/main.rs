//! News slider CLI - build announcement carousels from forum fixtures.

mod commands;
mod fixture;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use news_slider_core::Config;
use news_slider_core::config::Rotation;
use tracing_subscriber::prelude::*;

use commands::{Commands, handle_command};

/// News slider CLI - announcement aggregation and excerpting
#[derive(Parser)]
#[command(name = "news-slider")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a custom config file (overrides default search locations)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Default tracing directives enabling warn-level logs for both crates.
const DEFAULT_DIRECTIVES: &[&str] = &["news_slider_cli=warn", "news_slider_core=warn"];

/// Build the default `EnvFilter`: RUST_LOG (if set) plus our default directives.
fn default_env_filter() -> Result<tracing_subscriber::EnvFilter> {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in DEFAULT_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so stdout stays clean for command output. When
/// `config.logging` is `Some`, a rolling file layer is added.
///
/// Returns the non-blocking writer guard that must be held for the process lifetime.
fn init_tracing(config: &Config) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(ref lc) = config.logging else {
        tracing_subscriber::fmt()
            .with_env_filter(default_env_filter()?)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    if let Err(e) = std::fs::create_dir_all(&lc.directory) {
        eprintln!(
            "Warning: Failed to create log directory '{}': {}. Falling back to stderr-only.",
            lc.directory, e
        );
        tracing_subscriber::fmt()
            .with_env_filter(default_env_filter()?)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    let rotation = match lc.rotation {
        Rotation::Daily => tracing_appender::rolling::Rotation::DAILY,
        Rotation::Hourly => tracing_appender::rolling::Rotation::HOURLY,
        Rotation::Never => tracing_appender::rolling::Rotation::NEVER,
    };

    let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix("news-slider")
        .filename_suffix("log")
        .max_log_files(lc.max_files)
        .build(&lc.directory)
        .context("Failed to create rolling file appender")?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(default_env_filter()?)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Tracing init depends on config, so load it first.
    let config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    let _guard = init_tracing(&config)?;

    handle_command(args.command, &config).await
}
