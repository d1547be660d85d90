//! The slider facade.
//!
//! [`NewsSlider`] plans sources from the display mode, runs the aggregation
//! pipeline, and consults the optional cache for site-page builds.

use std::sync::Arc;

use crate::aggregate::{
    AggregateError, AggregationContext, DisplayContext, NewsAggregator, plan_sources,
};
use crate::cache::{CachedNews, SliderCache};
use crate::config::{AggregationConfig, Config};
use crate::entry::{DisplayEntry, SliderView};
use crate::post::CourseRef;
use crate::source::{ForumSource, UserStateSource};

/// Builds [`SliderView`] values for users.
pub struct NewsSlider {
    aggregator: NewsAggregator,
    config: AggregationConfig,
    cache: Option<Arc<dyn SliderCache>>,
    ttl_seconds: u64,
}

impl NewsSlider {
    /// Create a slider without a cache.
    pub fn new(
        forums: Arc<dyn ForumSource>,
        users: Arc<dyn UserStateSource>,
        config: &Config,
    ) -> Self {
        Self {
            aggregator: NewsAggregator::new(forums, users, config),
            config: config.slider.clone(),
            cache: None,
            ttl_seconds: config.cache.clone().unwrap_or_default().ttl_seconds,
        }
    }

    /// Serve site-page builds through `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn SliderCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the view for `ctx`, given the courses the user is enrolled in.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError`] if aggregation fails; cache failures are
    /// logged and never returned.
    pub async fn build_view(
        &self,
        courses: &[CourseRef],
        ctx: &AggregationContext,
    ) -> Result<SliderView, AggregateError> {
        let news = match (&self.cache, ctx.display) {
            (Some(cache), DisplayContext::Site) => {
                self.cached_entries(cache.as_ref(), courses, ctx).await?
            }
            _ => self.build_entries(courses, ctx).await?,
        };

        Ok(SliderView {
            title: self.config.banner_title.clone(),
            show_dots: self.config.show_dots,
            news,
        })
    }

    async fn build_entries(
        &self,
        courses: &[CourseRef],
        ctx: &AggregationContext,
    ) -> Result<Vec<DisplayEntry>, AggregateError> {
        let sources = plan_sources(self.config.display_mode, courses);
        self.aggregator.aggregate(&sources, ctx).await
    }

    async fn cached_entries(
        &self,
        cache: &dyn SliderCache,
        courses: &[CourseRef],
        ctx: &AggregationContext,
    ) -> Result<Vec<DisplayEntry>, AggregateError> {
        let key = cache_key(ctx.user_id);
        match cache.get(&key).await {
            Ok(Some(cached)) if cached.is_fresh(ctx.now, self.ttl_seconds) => {
                tracing::debug!(key = %key, "slider: cache hit");
                return Ok(cached.entries);
            }
            Ok(_) => tracing::debug!(key = %key, "slider: cache miss"),
            Err(e) => tracing::warn!(key = %key, error = %e, "slider: cache read failed"),
        }

        let entries = self.build_entries(courses, ctx).await?;
        let value = CachedNews::new(ctx.now, entries);
        if let Err(e) = cache.put(&key, &value).await {
            tracing::warn!(key = %key, error = %e, "slider: cache write failed");
        }
        Ok(value.entries)
    }
}

fn cache_key(user_id: i64) -> String {
    format!("slider:{user_id}")
}
