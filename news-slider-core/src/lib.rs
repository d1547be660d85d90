//! News slider core library.
//!
//! Provides the HTML-safe excerpt truncator, the announcement aggregation
//! pipeline, collaborator ports with an in-memory adapter, and the slider
//! cache.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod entry;
pub mod format;
pub mod html;
pub mod labels;
pub mod post;
pub mod slider;
pub mod source;
pub mod truncate;

pub use aggregate::{
    AggregateError, AggregationContext, DisplayContext, NewsAggregator, SourceQuery, plan_sources,
};
pub use cache::{CacheError, CachedNews, MemoryCache, SliderCache, SqliteCache, create_cache};
pub use config::{
    AggregationConfig, CacheConfig, Config, ConfigError, DisplayMode, LoggingConfig, Rotation,
};
pub use entry::{DisplayEntry, SliderView, sort_entries};
pub use format::{EntryFormatter, Links, trim_subject};
pub use labels::{LabelOverrides, Labels, Language};
pub use post::{CourseRef, ForumRef, RawPost};
pub use slider::NewsSlider;
pub use source::{ForumSource, InMemoryForum, SourceError, UserStateSource};
pub use truncate::{TruncateOptions, Truncated, truncate, visible_len};
