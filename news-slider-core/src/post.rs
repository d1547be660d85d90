//! Records handed over by the host platform.
//!
//! Provides [`RawPost`], the first post of a forum discussion as the forum
//! collaborator returns it, plus the small references used to address
//! courses and forums.

use serde::{Deserialize, Serialize};

/// A course the current user is enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    /// Course identifier.
    pub id: i64,
    /// Course short name, shown as the course label.
    pub short_name: String,
}

impl CourseRef {
    /// Create a course reference.
    pub fn new(id: i64, short_name: impl Into<String>) -> Self {
        Self {
            id,
            short_name: short_name.into(),
        }
    }
}

/// A forum activity inside a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForumRef {
    /// Forum identifier.
    pub id: i64,
    /// Course the forum belongs to.
    pub course_id: i64,
}

/// The opening post of a forum discussion.
///
/// Transient: fetched fresh for every aggregation run and never mutated
/// by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    /// Discussion (thread) identifier.
    pub discussion_id: i64,
    /// Identifier of the opening post.
    pub post_id: i64,
    /// Course the discussion lives in.
    pub course_id: i64,
    /// Short name of that course.
    #[serde(default)]
    pub course_short_name: String,
    /// Plain-text subject.
    pub subject: String,
    /// HTML body.
    #[serde(default)]
    pub message: String,
    /// Author first name.
    #[serde(default)]
    pub author_first_name: String,
    /// Author last name.
    #[serde(default)]
    pub author_last_name: String,
    /// Author user identifier.
    pub author_user_id: i64,
    /// Last modification, seconds since the Unix epoch.
    pub modified_at: i64,
    /// Pin state; `None` where pinning does not apply.
    #[serde(default)]
    pub pinned: Option<bool>,
}

impl RawPost {
    /// Full display name of the author.
    pub fn author_name(&self) -> String {
        format!("{} {}", self.author_first_name, self.author_last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> RawPost {
        RawPost {
            discussion_id: 10,
            post_id: 11,
            course_id: 2,
            course_short_name: "CS101".to_string(),
            subject: "Welcome".to_string(),
            message: "<p>Hi</p>".to_string(),
            author_first_name: "Ada".to_string(),
            author_last_name: "Lovelace".to_string(),
            author_user_id: 5,
            modified_at: 1_700_000_000,
            pinned: None,
        }
    }

    #[test]
    fn test_author_name() {
        assert_eq!(post().author_name(), "Ada Lovelace");
    }

    #[test]
    fn test_author_name_missing_last_name() {
        let mut post = post();
        post.author_last_name.clear();
        assert_eq!(post.author_name(), "Ada");
    }

    #[test]
    fn test_raw_post_deserialize_defaults() {
        let json = r#"{
            "discussion_id": 1,
            "post_id": 2,
            "course_id": 1,
            "subject": "Site news",
            "author_user_id": 3,
            "modified_at": 100
        }"#;
        let post: RawPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.message, "");
        assert_eq!(post.pinned, None);
        assert_eq!(post.course_short_name, "");
    }

    #[test]
    fn test_course_ref_new() {
        let course = CourseRef::new(7, "MATH");
        assert_eq!(course.id, 7);
        assert_eq!(course.short_name, "MATH");
    }
}
