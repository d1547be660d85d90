//! In-memory forum and user-state data.
//!
//! Provides [`InMemoryForum`], an implementation of both [`ForumSource`] and
//! [`UserStateSource`] backed by plain vectors. It deserializes from JSON,
//! which makes it usable as a fixture format as well as in tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Deserialize;

use super::{ForumSource, SourceError, UserStateSource};
use crate::post::{ForumRef, RawPost};

/// A post together with the forum it was made in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForumPost {
    /// Forum the discussion belongs to.
    pub forum_id: i64,
    /// The opening post.
    #[serde(flatten)]
    pub post: RawPost,
}

/// A discussion a user has not read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UnreadMark {
    pub user_id: i64,
    pub discussion_id: i64,
}

/// When a user last visited a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LastAccess {
    pub user_id: i64,
    pub course_id: i64,
    /// Seconds since the Unix epoch.
    pub at: i64,
}

/// Forum and user-state collaborator holding everything in memory.
///
/// # Examples
///
/// ```
/// use news_slider_core::post::{ForumRef, RawPost};
/// use news_slider_core::source::{ForumSource, InMemoryForum};
///
/// # async fn example() {
/// let forum = ForumRef { id: 1, course_id: 1 };
/// let post = RawPost {
///     discussion_id: 10,
///     post_id: 11,
///     course_id: 1,
///     course_short_name: String::new(),
///     subject: "Welcome".to_string(),
///     message: String::new(),
///     author_first_name: String::new(),
///     author_last_name: String::new(),
///     author_user_id: 2,
///     modified_at: 100,
///     pinned: None,
/// };
/// let source = InMemoryForum::new().with_forum(forum).with_post(forum.id, post);
///
/// let posts = source.discussions(&forum, None).await.unwrap();
/// assert_eq!(posts.len(), 1);
/// # }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct InMemoryForum {
    #[serde(default)]
    forums: Vec<ForumRef>,
    #[serde(default)]
    posts: Vec<ForumPost>,
    #[serde(default)]
    unread: Vec<UnreadMark>,
    #[serde(default)]
    last_access: Vec<LastAccess>,
    #[serde(skip)]
    unavailable: HashSet<i64>,
    #[serde(skip)]
    failing_lookups: HashSet<i64>,
    #[serde(skip)]
    discussion_requests: AtomicUsize,
}

impl InMemoryForum {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the announcements forum of a course.
    #[must_use]
    pub fn with_forum(mut self, forum: ForumRef) -> Self {
        self.forums.push(forum);
        self
    }

    /// Add a discussion to a forum.
    #[must_use]
    pub fn with_post(mut self, forum_id: i64, post: RawPost) -> Self {
        self.posts.push(ForumPost { forum_id, post });
        self
    }

    /// Mark a discussion as unread for a user.
    #[must_use]
    pub fn with_unread(mut self, user_id: i64, discussion_id: i64) -> Self {
        self.unread.push(UnreadMark {
            user_id,
            discussion_id,
        });
        self
    }

    /// Record a user's last visit to a course.
    #[must_use]
    pub fn with_last_access(mut self, user_id: i64, course_id: i64, at: i64) -> Self {
        self.last_access.push(LastAccess {
            user_id,
            course_id,
            at,
        });
        self
    }

    /// Make every read of a forum fail with [`SourceError::ForumUnavailable`].
    #[must_use]
    pub fn with_unavailable_forum(mut self, forum_id: i64) -> Self {
        self.unavailable.insert(forum_id);
        self
    }

    /// Make the news forum lookup of a course fail with [`SourceError::Backend`].
    #[must_use]
    pub fn with_failing_lookup(mut self, course_id: i64) -> Self {
        self.failing_lookups.insert(course_id);
        self
    }

    /// Number of [`ForumSource::discussions`] calls served so far.
    pub fn discussion_requests(&self) -> usize {
        self.discussion_requests.load(Ordering::Relaxed)
    }

    fn check_available(&self, forum: &ForumRef) -> Result<(), SourceError> {
        if self.unavailable.contains(&forum.id) {
            return Err(SourceError::ForumUnavailable(forum.id));
        }
        Ok(())
    }

    fn forum_posts<'a>(&'a self, forum: &ForumRef) -> impl Iterator<Item = &'a RawPost> {
        let forum_id = forum.id;
        self.posts
            .iter()
            .filter(move |p| p.forum_id == forum_id)
            .map(|p| &p.post)
    }
}

#[async_trait]
impl ForumSource for InMemoryForum {
    async fn discussions(
        &self,
        forum: &ForumRef,
        capacity: Option<usize>,
    ) -> Result<Vec<RawPost>, SourceError> {
        self.discussion_requests.fetch_add(1, Ordering::Relaxed);
        self.check_available(forum)?;

        let mut posts: Vec<RawPost> = self.forum_posts(forum).cloned().collect();
        posts.sort_by(|a, b| {
            let key = |p: &RawPost| (p.pinned == Some(true), p.modified_at);
            key(b).cmp(&key(a))
        });
        if let Some(capacity) = capacity {
            posts.truncate(capacity);
        }
        Ok(posts)
    }

    async fn unread_discussions(
        &self,
        forum: &ForumRef,
        user_id: i64,
    ) -> Result<HashSet<i64>, SourceError> {
        self.check_available(forum)?;

        let in_forum: HashSet<i64> = self.forum_posts(forum).map(|p| p.discussion_id).collect();
        Ok(self
            .unread
            .iter()
            .filter(|m| m.user_id == user_id && in_forum.contains(&m.discussion_id))
            .map(|m| m.discussion_id)
            .collect())
    }

    async fn news_forum(&self, course_id: i64) -> Result<Option<ForumRef>, SourceError> {
        if self.failing_lookups.contains(&course_id) {
            return Err(SourceError::Backend(format!(
                "news forum lookup failed for course {course_id}"
            )));
        }
        Ok(self.forums.iter().find(|f| f.course_id == course_id).copied())
    }
}

#[async_trait]
impl UserStateSource for InMemoryForum {
    async fn last_access(&self, user_id: i64, course_id: i64) -> Result<Option<i64>, SourceError> {
        Ok(self
            .last_access
            .iter()
            .filter(|a| a.user_id == user_id && a.course_id == course_id)
            .map(|a| a.at)
            .max())
    }
}
