//! Display-ready news entries and their ordering.

use serde::{Deserialize, Serialize};

/// One slide of the carousel.
///
/// A one-way projection of a [`RawPost`](crate::post::RawPost): built once
/// per aggregation run and never mutated afterwards. All `*_html` and
/// `*_label` fields are ready to be placed into markup as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEntry {
    /// Discussion the entry was derived from.
    pub discussion_id: Option<i64>,
    /// Course the discussion lives in.
    pub course_id: Option<i64>,
    /// Author of the opening post.
    pub author_user_id: Option<i64>,
    /// Anchor-wrapped, possibly trimmed subject.
    pub headline_html: String,
    /// Message excerpt for wide layouts.
    pub long_excerpt_html: String,
    /// Message excerpt for narrow layouts.
    pub short_excerpt_html: String,
    pub author_label: String,
    pub course_label: String,
    pub date_label: String,
    pub day_of_week_label: String,
    /// Whether the entry is shown, and sorted, as pinned.
    pub pinned: bool,
    /// Last modification, seconds since the Unix epoch.
    pub modified_at: i64,
    /// Discussion URL.
    pub link: Option<String>,
    /// Author profile URL.
    pub profile_link: Option<String>,
    /// Set only on the "no news" entry.
    pub placeholder: bool,
}

/// Ordering key: pinned entries first, then most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct SortKey {
    pinned: bool,
    modified_at: i64,
}

impl DisplayEntry {
    /// The entry standing in for an empty slider.
    pub fn placeholder(message: &str) -> Self {
        Self {
            long_excerpt_html: message.to_string(),
            short_excerpt_html: message.to_string(),
            placeholder: true,
            ..Self::default()
        }
    }

    pub(crate) fn sort_key(&self) -> SortKey {
        SortKey {
            pinned: self.pinned,
            modified_at: self.modified_at,
        }
    }
}

/// Sort `entries` by descending [`SortKey`]. Ties keep their input order.
pub fn sort_entries(entries: &mut [DisplayEntry]) {
    entries.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
}

/// Everything the rendering collaborator needs to draw the carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderView {
    /// Banner title.
    pub title: String,
    /// Whether dot navigation is shown.
    pub show_dots: bool,
    /// Entries in display order; never empty.
    pub news: Vec<DisplayEntry>,
}
