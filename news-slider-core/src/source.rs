//! Ports to the host platform's forum and user data.
//!
//! Provides the [`ForumSource`] and [`UserStateSource`] traits the
//! aggregation pipeline reads through, along with their error type and an
//! in-memory adapter.

pub mod memory;

pub use memory::{ForumPost, InMemoryForum, LastAccess, UnreadMark};

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::post::{ForumRef, RawPost};

/// Errors reported by a data collaborator.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The forum exists but cannot be read right now.
    #[error("forum {0} is unavailable")]
    ForumUnavailable(i64),

    /// The backing store failed.
    #[error("source backend error: {0}")]
    Backend(String),
}

/// Port for reading forum discussions.
#[async_trait]
pub trait ForumSource: Send + Sync {
    /// Opening posts of the forum's discussions.
    ///
    /// Ordered pinned first, then by modification time descending. When
    /// `capacity` is set, at most that many posts are returned.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the forum cannot be read.
    async fn discussions(
        &self,
        forum: &ForumRef,
        capacity: Option<usize>,
    ) -> Result<Vec<RawPost>, SourceError>;

    /// Identifiers of the forum's discussions `user_id` has not read yet.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the read state cannot be fetched.
    async fn unread_discussions(
        &self,
        forum: &ForumRef,
        user_id: i64,
    ) -> Result<HashSet<i64>, SourceError>;

    /// The announcements forum of a course.
    ///
    /// Returns `Ok(None)` when the course has no such forum.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the lookup fails.
    async fn news_forum(&self, course_id: i64) -> Result<Option<ForumRef>, SourceError>;
}

/// Port for reading per-user course state.
#[async_trait]
pub trait UserStateSource: Send + Sync {
    /// When `user_id` last visited `course_id`, in seconds since the Unix
    /// epoch; `None` if never.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the state cannot be fetched.
    async fn last_access(&self, user_id: i64, course_id: i64) -> Result<Option<i64>, SourceError>;
}
