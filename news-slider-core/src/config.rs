//! Configuration management for the news slider.
//!
//! Provides configuration loading from TOML files with support for
//! multiple file locations, an environment variable override, and defaults
//! matching the stock block settings.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::labels::{LabelOverrides, Labels, Language};


/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "NEWS_SLIDER_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the configuration file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as TOML.
    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        /// Path to the configuration file that could not be parsed.
        path: PathBuf,
        /// The underlying TOML parse error.
        source: toml::de::Error,
    },
}

/// Which announcement sources a slider shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Site-wide and course announcements.
    #[default]
    All,
    /// Site-wide announcements only.
    Site,
    /// Course announcements only.
    Course,
}

/// Settings driving the aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AggregationConfig {
    /// Title shown next to the carousel.
    #[serde(default = "default_banner_title")]
    pub banner_title: String,

    /// Sources to aggregate.
    #[serde(default)]
    pub display_mode: DisplayMode,

    /// Visible-text budget of the long excerpt; 0 disables truncation.
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,

    /// Visible-text budget of the narrow-layout excerpt.
    #[serde(default = "default_short_excerpt_length")]
    pub short_excerpt_length: usize,

    /// Subjects longer than this are trimmed at a word boundary.
    #[serde(default = "default_subject_max_length")]
    pub subject_max_length: usize,

    /// Maximum number of site-wide announcements.
    #[serde(default = "default_site_items_to_show")]
    pub site_items_to_show: usize,

    /// Maximum number of announcements per course.
    #[serde(default = "default_course_items_to_show")]
    pub course_items_to_show: usize,

    /// Only show site announcements modified within this many days.
    #[serde(default)]
    pub site_items_period_days: Option<u32>,

    /// Only show course announcements modified within this many days.
    #[serde(default)]
    pub course_items_period_days: Option<u32>,

    /// Append a link to the full site news forum to site announcements.
    #[serde(default)]
    pub show_old_news: bool,

    /// Show dot navigation under the carousel.
    #[serde(default = "default_true")]
    pub show_dots: bool,

    /// Keep message markup in excerpts instead of stripping it.
    #[serde(default)]
    pub preserve_markup: bool,

    /// Offset from UTC used for date labels, in minutes.
    #[serde(default)]
    pub timezone_offset_minutes: i32,
}

fn default_banner_title() -> String {
    "Latest News".to_string()
}

fn default_excerpt_length() -> usize {
    110
}

fn default_short_excerpt_length() -> usize {
    50
}

fn default_subject_max_length() -> usize {
    30
}

fn default_site_items_to_show() -> usize {
    4
}

fn default_course_items_to_show() -> usize {
    7
}

fn default_true() -> bool {
    true
}

impl AggregationConfig {
    /// Budget of the short excerpt, never larger than a non-zero long budget.
    pub fn effective_short_excerpt_length(&self) -> usize {
        if self.excerpt_length == 0 {
            self.short_excerpt_length
        } else {
            self.short_excerpt_length.min(self.excerpt_length)
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            banner_title: default_banner_title(),
            display_mode: DisplayMode::default(),
            excerpt_length: default_excerpt_length(),
            short_excerpt_length: default_short_excerpt_length(),
            subject_max_length: default_subject_max_length(),
            site_items_to_show: default_site_items_to_show(),
            course_items_to_show: default_course_items_to_show(),
            site_items_period_days: None,
            course_items_period_days: None,
            show_old_news: false,
            show_dots: true,
            preserve_markup: false,
            timezone_offset_minutes: 0,
        }
    }
}

/// Caching of built slider entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Whether the cache is consulted at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds a built entry list stays valid.
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,

    /// SQLite database URL. An in-process cache is used when unset.
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_cache_ttl() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: default_cache_ttl(),
            database_url: None,
        }
    }
}

/// Log file rotation period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// A new file each day.
    #[default]
    Daily,
    /// A new file each hour.
    Hourly,
    /// A single file.
    Never,
}

/// File logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Directory log files are written to.
    #[serde(default = "default_log_directory")]
    pub directory: String,

    /// Rotation period.
    #[serde(default)]
    pub rotation: Rotation,

    /// Number of rotated files kept.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_max_files() -> usize {
    7
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            rotation: Rotation::default(),
            max_files: default_max_files(),
        }
    }
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Base URL of the host site. Links are root-relative when unset.
    #[serde(default)]
    pub site_url: Option<Url>,

    /// Identifier of the front-page course that owns the site news forum.
    #[serde(default = "default_site_course_id")]
    pub site_course_id: i64,

    /// Language of the built-in labels.
    #[serde(default)]
    pub language: Language,

    /// Pipeline settings.
    #[serde(default)]
    pub slider: AggregationConfig,

    /// Label overrides.
    #[serde(default)]
    pub labels: LabelOverrides,

    /// Optional cache of built entries.
    #[serde(default)]
    pub cache: Option<CacheConfig>,

    /// Optional file logging.
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

fn default_site_course_id() -> i64 {
    1
}

impl Config {
    /// Load configuration from file system.
    ///
    /// Priority order:
    /// 1. `path`, when given
    /// 2. `NEWS_SLIDER_CONFIG` environment variable
    /// 3. `./news-slider.toml` (local directory)
    /// 4. `~/.config/news-slider/config.toml` (user config)
    ///
    /// Returns default config if no config file found.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if a found (or explicitly given) file cannot be read.
    /// Returns [`ConfigError::ParseError`] if a found file is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                return Self::load_from(p);
            }
        }

        let local = PathBuf::from("news-slider.toml");
        if local.exists() {
            return Self::load_from(local);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config/news-slider/config.toml");
            if user_config.exists() {
                return Self::load_from(user_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read.
    /// Returns [`ConfigError::ParseError`] if the file is not valid TOML.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Labels for the configured language with overrides applied.
    pub fn labels(&self) -> Labels {
        Labels::for_language(self.language).with_overrides(&self.labels)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: None,
            site_course_id: default_site_course_id(),
            language: Language::default(),
            slider: AggregationConfig::default(),
            labels: LabelOverrides::default(),
            cache: None,
            logging: None,
        }
    }
}
