//! Subcommands for the news-slider CLI.
//!
//! Defines the [`Commands`] enum parsed by `clap` and the
//! [`handle_command`] dispatcher that runs the slider or the truncator.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Subcommand;

use news_slider_core::{
    AggregationContext, Config, DisplayContext, NewsSlider, TruncateOptions, create_cache,
    truncate,
};

use crate::fixture::Fixture;

/// Top-level subcommands for the `news-slider` binary.
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Build the slider for a user and print it as JSON
    Show {
        /// JSON fixture with courses, forums, posts and read state
        #[arg(short, long)]
        fixture: PathBuf,

        /// Viewing user (defaults to the fixture's user_id)
        #[arg(short, long)]
        user: Option<i64>,

        /// Render on this course's page instead of the site page
        #[arg(long)]
        course: Option<i64>,

        /// Reference time in seconds since the Unix epoch (defaults to now)
        #[arg(long)]
        now: Option<i64>,
    },
    /// Truncate text from stdin
    Truncate {
        /// Visible-text budget in bytes
        #[arg(short, long)]
        length: usize,

        /// Marker appended when text is cut
        #[arg(short, long, default_value = "...")]
        ending: String,

        /// Allow cutting in the middle of a word
        #[arg(long)]
        exact: bool,

        /// Treat input as plain text rather than HTML
        #[arg(long)]
        plain: bool,
    },
}

/// Run a subcommand.
pub(crate) async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Show {
            fixture,
            user,
            course,
            now,
        } => show(config, &fixture, user, course, now).await,
        Commands::Truncate {
            length,
            ending,
            exact,
            plain,
        } => {
            let input = read_stdin()?;
            let options = TruncateOptions::new()
                .with_ending(ending)
                .exact(exact)
                .consider_html(!plain);
            println!("{}", truncate(&input, length, &options).text);
            Ok(())
        }
    }
}

async fn show(
    config: &Config,
    fixture_path: &Path,
    user: Option<i64>,
    course: Option<i64>,
    now: Option<i64>,
) -> Result<()> {
    let fixture = Fixture::load(fixture_path)?;
    let ctx = AggregationContext {
        user_id: user.unwrap_or(fixture.user_id),
        display: course.map_or(DisplayContext::Site, DisplayContext::Course),
        now: resolve_now(now)?,
    };

    let source = Arc::new(fixture.forum);
    let mut slider = NewsSlider::new(source.clone(), source, config);
    if let Some(cache_config) = &config.cache {
        let cache = create_cache(cache_config)
            .await
            .context("Failed to open slider cache")?;
        if let Some(cache) = cache {
            slider = slider.with_cache(cache);
        }
    }

    tracing::debug!(
        user_id = ctx.user_id,
        courses = fixture.courses.len(),
        "show: building slider"
    );
    let view = slider
        .build_view(&fixture.courses, &ctx)
        .await
        .context("Failed to build slider")?;

    let json = serde_json::to_string_pretty(&view).context("Failed to encode slider")?;
    println!("{json}");
    Ok(())
}

fn resolve_now(now: Option<i64>) -> Result<DateTime<Utc>> {
    match now {
        Some(secs) => match DateTime::from_timestamp(secs, 0) {
            Some(now) => Ok(now),
            None => bail!("Timestamp out of range: {}", secs),
        },
        None => Ok(Utc::now()),
    }
}

/// Read all of stdin; refuses to wait on an interactive terminal.
fn read_stdin() -> Result<String> {
    if io::stdin().is_terminal() {
        bail!("No input provided: pipe the text to truncate on stdin");
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer.trim_end_matches('\n').to_string())
}
