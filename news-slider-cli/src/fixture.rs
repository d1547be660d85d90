//! JSON fixtures describing a user's courses and forum data.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use news_slider_core::{CourseRef, InMemoryForum};

/// Everything `show` needs besides configuration.
///
/// The forum fields (`forums`, `posts`, `unread`, `last_access`) sit at
/// the top level next to `courses`.
#[derive(Debug, Deserialize)]
pub(crate) struct Fixture {
    /// Viewing user when `--user` is not given.
    #[serde(default)]
    pub user_id: i64,
    /// Courses the user is enrolled in, in display order.
    #[serde(default)]
    pub courses: Vec<CourseRef>,
    #[serde(flatten)]
    pub forum: InMemoryForum,
}

impl Fixture {
    /// Read and parse a fixture file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture '{}'", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse fixture '{}'", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
