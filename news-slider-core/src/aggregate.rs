//! The news aggregation pipeline.
//!
//! [`NewsAggregator`] fetches posts for each [`SourceQuery`] through the
//! collaborator ports, formats them with [`EntryFormatter`], and merges the
//! result into one ordered list. A failing source is logged and skipped so
//! it cannot blank out the others; the one exception is a site news forum
//! that cannot be resolved while "older posts" links are requested.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::config::{AggregationConfig, Config, DisplayMode};
use crate::entry::{DisplayEntry, sort_entries};
use crate::format::{EntryFormatter, Origin};
use crate::post::{CourseRef, RawPost};
use crate::source::{ForumSource, SourceError, UserStateSource};


/// One place announcements are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceQuery {
    /// The site-wide news forum.
    Site,
    /// A course's announcements forum.
    Course(CourseRef),
}

/// The page the slider is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayContext {
    /// The site front page.
    Site,
    /// A course page.
    Course(i64),
}

/// Who the slider is built for, where, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationContext {
    /// The viewing user.
    pub user_id: i64,
    /// The page being rendered.
    pub display: DisplayContext,
    /// Reference time for look-back windows.
    pub now: DateTime<Utc>,
}

/// Failures that abort aggregation.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// "Older posts" links were requested but the site has no news forum.
    #[error("site news forum not found in course {course_id}")]
    NewsForumNotFound {
        /// Course expected to own the forum.
        course_id: i64,
    },

    /// "Older posts" links were requested and the news forum lookup failed.
    #[error("site news forum lookup failed: {0}")]
    NewsForumLookup(#[source] SourceError),
}

/// Build the list of sources a display mode reads from.
///
/// Courses come first, in enrolment order, followed by the site forum.
pub fn plan_sources(mode: DisplayMode, courses: &[CourseRef]) -> Vec<SourceQuery> {
    let mut sources = Vec::with_capacity(courses.len() + 1);
    if matches!(mode, DisplayMode::All | DisplayMode::Course) {
        sources.extend(courses.iter().cloned().map(SourceQuery::Course));
    }
    if matches!(mode, DisplayMode::All | DisplayMode::Site) {
        sources.push(SourceQuery::Site);
    }
    sources
}

/// Merges announcements from several forums into one display list.
pub struct NewsAggregator {
    forums: Arc<dyn ForumSource>,
    users: Arc<dyn UserStateSource>,
    config: AggregationConfig,
    site_course_id: i64,
    formatter: EntryFormatter,
}

impl NewsAggregator {
    /// Create an aggregator reading through the given collaborators.
    pub fn new(
        forums: Arc<dyn ForumSource>,
        users: Arc<dyn UserStateSource>,
        config: &Config,
    ) -> Self {
        Self {
            forums,
            users,
            config: config.slider.clone(),
            site_course_id: config.site_course_id,
            formatter: EntryFormatter::new(config),
        }
    }

    /// Aggregate `sources` for `ctx` into a sorted, never empty entry list.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError`] only when `show_old_news` is enabled and
    /// the site news forum cannot be resolved.
    pub async fn aggregate(
        &self,
        sources: &[SourceQuery],
        ctx: &AggregationContext,
    ) -> Result<Vec<DisplayEntry>, AggregateError> {
        let mut entries = Vec::new();
        for source in sources {
            match source {
                SourceQuery::Site => self.site_entries(ctx, &mut entries).await?,
                SourceQuery::Course(course) => self.course_entries(course, ctx, &mut entries).await,
            }
        }

        if entries.is_empty() {
            tracing::debug!(user_id = ctx.user_id, "aggregate: no news, using placeholder");
            return Ok(vec![self.formatter.placeholder()]);
        }

        sort_entries(&mut entries);
        tracing::debug!(
            user_id = ctx.user_id,
            count = entries.len(),
            "aggregate: entries built"
        );
        Ok(entries)
    }

    async fn site_entries(
        &self,
        ctx: &AggregationContext,
        entries: &mut Vec<DisplayEntry>,
    ) -> Result<(), AggregateError> {
        let course_id = self.site_course_id;
        let forum = match self.forums.news_forum(course_id).await {
            Ok(Some(forum)) => forum,
            Ok(None) if self.config.show_old_news => {
                return Err(AggregateError::NewsForumNotFound { course_id });
            }
            Ok(None) => {
                tracing::debug!(course_id, "aggregate: site has no news forum");
                return Ok(());
            }
            Err(e) if self.config.show_old_news => {
                return Err(AggregateError::NewsForumLookup(e));
            }
            Err(e) => {
                tracing::warn!(course_id, error = %e, "aggregate: site source skipped");
                return Ok(());
            }
        };

        let posts = match self
            .forums
            .discussions(&forum, Some(self.config.site_items_to_show))
            .await
        {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(forum_id = forum.id, error = %e, "aggregate: site source skipped");
                return Ok(());
            }
        };

        let since = window_start(ctx.now, self.config.site_items_period_days);
        let origin = Origin::Site {
            older_posts: self.config.show_old_news.then_some(forum),
        };
        entries.extend(
            posts
                .iter()
                .filter(|post| since.is_none_or(|since| post.modified_at >= since))
                .map(|post| self.formatter.format(post, origin, ctx.display)),
        );
        Ok(())
    }

    async fn course_entries(
        &self,
        course: &CourseRef,
        ctx: &AggregationContext,
        entries: &mut Vec<DisplayEntry>,
    ) {
        match self.course_posts(course, ctx).await {
            Ok(posts) => entries.extend(
                posts
                    .iter()
                    .map(|post| self.formatter.format(post, Origin::Course(course), ctx.display)),
            ),
            Err(e) => {
                tracing::warn!(
                    course_id = course.id,
                    error = %e,
                    "aggregate: course source skipped"
                );
            }
        }
    }

    /// Unread posts of a course modified since the user's last visit.
    async fn course_posts(
        &self,
        course: &CourseRef,
        ctx: &AggregationContext,
    ) -> Result<Vec<RawPost>, SourceError> {
        let Some(forum) = self.forums.news_forum(course.id).await? else {
            tracing::debug!(course_id = course.id, "aggregate: course has no news forum");
            return Ok(Vec::new());
        };

        let unread = self.forums.unread_discussions(&forum, ctx.user_id).await?;
        if unread.is_empty() {
            return Ok(Vec::new());
        }

        let last_access = self
            .users
            .last_access(ctx.user_id, course.id)
            .await?
            .unwrap_or(0);
        let since = window_start(ctx.now, self.config.course_items_period_days);

        let posts = self.forums.discussions(&forum, None).await?;
        Ok(posts
            .into_iter()
            .filter(|post| unread.contains(&post.discussion_id))
            .filter(|post| post.modified_at > last_access)
            .filter(|post| since.is_none_or(|since| post.modified_at >= since))
            .take(self.config.course_items_to_show)
            .collect())
    }
}

/// Earliest modification time inside a look-back window of `days`.
fn window_start(now: DateTime<Utc>, days: Option<u32>) -> Option<i64> {
    days.map(|days| {
        now.checked_sub_signed(Duration::days(i64::from(days)))
            .map_or(i64::MIN, |start| start.timestamp())
    })
}

impl std::fmt::Debug for NewsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsAggregator")
            .field("config", &self.config)
            .field("site_course_id", &self.site_course_id)
            .finish_non_exhaustive()
    }
}
