//! Turning raw posts into display entries.
//!
//! [`EntryFormatter`] owns every presentation decision made for a single
//! post: subject trimming, excerpting, links, labels and dates. Ordering and
//! source selection live in [`aggregate`](crate::aggregate).

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};
use url::Url;
use url::form_urlencoded;

use crate::aggregate::DisplayContext;
use crate::config::{AggregationConfig, Config};
use crate::entry::DisplayEntry;
use crate::html::{escape_html, flatten_paragraphs, strip_tags};
use crate::labels::Labels;
use crate::post::{CourseRef, ForumRef, RawPost};
use crate::truncate::{TruncateOptions, floor_char_boundary, truncate};


/// Ending appended to truncated excerpts.
pub const EXCERPT_ENDING: &str = " .. ";

/// Ending appended to trimmed subjects.
pub const SUBJECT_ENDING: &str = " ... ";

/// Builds links into the host site.
///
/// With a base URL links are absolute; without one they are root-relative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    base: Option<Url>,
}

impl Links {
    /// Create a link builder rooted at `base`.
    pub fn new(base: Option<Url>) -> Self {
        Self { base }
    }

    /// The discussion page.
    pub fn discussion(&self, discussion_id: i64) -> String {
        self.build("mod/forum/discuss.php", &[("d", discussion_id.to_string())])
    }

    /// The course main page.
    pub fn course(&self, course_id: i64) -> String {
        self.build("course/view.php", &[("id", course_id.to_string())])
    }

    /// A user's profile as seen from a course.
    pub fn profile(&self, user_id: i64, course_id: i64) -> String {
        self.build(
            "user/view.php",
            &[("id", user_id.to_string()), ("course", course_id.to_string())],
        )
    }

    /// Every discussion of a forum on one page.
    pub fn older_posts(&self, forum_id: i64) -> String {
        self.build(
            "mod/forum/view.php",
            &[("f", forum_id.to_string()), ("showall", "1".to_string())],
        )
    }

    fn build(&self, path: &str, query: &[(&str, String)]) -> String {
        match &self.base {
            Some(base) => {
                let mut url = base.clone();
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().extend(path.split('/'));
                }
                url.set_query(None);
                url.query_pairs_mut().extend_pairs(query);
                url.into()
            }
            None => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(query)
                    .finish();
                format!("/{path}?{query}")
            }
        }
    }
}

/// Shorten a plain-text subject to at most `max_len` bytes plus [`SUBJECT_ENDING`].
///
/// The cut drops the trailing partial word together with the whitespace in
/// front of it. A head without any whitespace is kept whole.
pub fn trim_subject(subject: &str, max_len: usize) -> String {
    if subject.len() <= max_len {
        return subject.to_string();
    }

    let head = &subject[..floor_char_boundary(subject, max_len)];
    let without_word = head.trim_end_matches(|c: char| !c.is_whitespace());
    let kept = if without_word.is_empty() {
        head
    } else {
        without_word.trim_end()
    };
    format!("{kept}{SUBJECT_ENDING}")
}

/// Where a post was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin<'a> {
    /// The site news forum. `older_posts` is set when an "older posts" link
    /// should be appended.
    Site { older_posts: Option<ForumRef> },
    /// A course announcements forum.
    Course(&'a CourseRef),
}

/// Derives [`DisplayEntry`] values from [`RawPost`] values.
#[derive(Debug, Clone)]
pub struct EntryFormatter {
    config: AggregationConfig,
    labels: Labels,
    links: Links,
    site_course_id: i64,
    offset: FixedOffset,
}

impl EntryFormatter {
    /// Create a formatter from the application configuration.
    pub fn new(config: &Config) -> Self {
        let offset_secs = config.slider.timezone_offset_minutes.saturating_mul(60);
        Self {
            config: config.slider.clone(),
            labels: config.labels(),
            links: Links::new(config.site_url.clone()),
            site_course_id: config.site_course_id,
            offset: FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix()),
        }
    }

    /// The entry shown when there is nothing else to show.
    pub fn placeholder(&self) -> DisplayEntry {
        DisplayEntry::placeholder(&escape_html(&self.labels.no_news))
    }

    pub(crate) fn format(
        &self,
        post: &RawPost,
        origin: Origin<'_>,
        display: DisplayContext,
    ) -> DisplayEntry {
        let link = self.links.discussion(post.discussion_id);
        let href = escape_html(&link);

        // Course posts shown on the site page are never pinned.
        let pin_allowed = !(display == DisplayContext::Site && matches!(origin, Origin::Course(_)));
        let pinned = pin_allowed && post.pinned == Some(true);

        let body = self.body(&post.message);
        let (mut long_excerpt_html, long_truncated) = self.long_excerpt(&body, &href);
        if let Origin::Site {
            older_posts: Some(forum),
        } = origin
        {
            if long_truncated {
                long_excerpt_html.push_str(" |");
            }
            long_excerpt_html.push_str(&self.older_posts_link(&forum));
        }

        let (course_id, course_label) = match origin {
            Origin::Course(course) => (course.id, self.course_link(course)),
            Origin::Site { .. } => {
                let label = match display {
                    DisplayContext::Site => escape_html(&self.labels.site_announcement),
                    DisplayContext::Course(_) => String::new(),
                };
                (self.site_course_id, label)
            }
        };

        let author = escape_html(&post.author_name());
        let by = escape_html(&self.labels.by);
        let author_label = if course_label.is_empty() {
            format!("{by} {author}")
        } else {
            format!(", {by} {author}")
        };

        let (date_label, day_of_week_label) = self.date_labels(post.modified_at);

        DisplayEntry {
            discussion_id: Some(post.discussion_id),
            course_id: Some(course_id),
            author_user_id: Some(post.author_user_id),
            headline_html: self.headline(&post.subject, &href, pinned),
            long_excerpt_html,
            short_excerpt_html: self.short_excerpt(&body, &href),
            author_label,
            course_label,
            date_label,
            day_of_week_label,
            pinned,
            modified_at: post.modified_at,
            profile_link: Some(self.links.profile(post.author_user_id, course_id)),
            link: Some(link),
            placeholder: false,
        }
    }

    fn headline(&self, subject: &str, href: &str, pinned: bool) -> String {
        let subject = escape_html(&trim_subject(subject, self.config.subject_max_length));
        let marker = if pinned {
            self.labels.pinned_marker.as_str()
        } else {
            ""
        };
        format!(
            r#"<div class="news_sliderNewsHeadline">{marker}<a href="{href}">{subject}</a></div>"#
        )
    }

    /// The message as it is fed to the truncator.
    fn body(&self, message: &str) -> String {
        let flat = flatten_paragraphs(message);
        if self.config.preserve_markup {
            flat
        } else {
            strip_tags(&flat)
        }
    }

    fn long_excerpt(&self, body: &str, href: &str) -> (String, bool) {
        if self.config.excerpt_length == 0 {
            return (format!(r#"<a href="{href}">{body}</a>"#), false);
        }

        let cut = truncate(body, self.config.excerpt_length, &Self::excerpt_options());
        if cut.truncated {
            (format!("{}{}", cut.text, self.read_more_link(href)), true)
        } else {
            (format!(r#"<a href="{href}">{}</a>"#, cut.text), false)
        }
    }

    fn short_excerpt(&self, body: &str, href: &str) -> String {
        let budget = self.config.effective_short_excerpt_length();
        let cut = truncate(body, budget, &Self::excerpt_options());
        let mut html = format!(r#"<a href="{href}">{} </a>"#, cut.text);
        if cut.truncated {
            html.push_str(&self.read_more_link(href));
        }
        html
    }

    fn excerpt_options() -> TruncateOptions {
        TruncateOptions::new().with_ending(EXCERPT_ENDING)
    }

    fn read_more_link(&self, href: &str) -> String {
        format!(
            r#" <a href="{href}"><strong>[{}]</strong></a>"#,
            escape_html(&self.labels.read_more)
        )
    }

    fn older_posts_link(&self, forum: &ForumRef) -> String {
        format!(
            r#" <a href="{}" title="{}"><strong>[{}]</strong></a>"#,
            escape_html(&self.links.older_posts(forum.id)),
            escape_html(&self.labels.older_posts_title),
            escape_html(&self.labels.older_posts)
        )
    }

    fn course_link(&self, course: &CourseRef) -> String {
        let name = escape_html(&course.short_name);
        format!(
            r#"<a href="{}" title="{} {name}">{name}</a>"#,
            escape_html(&self.links.course(course.id)),
            escape_html(&self.labels.view_course)
        )
    }

    /// `dd/mm/YYYY` and the localized weekday followed by a comma.
    fn date_labels(&self, timestamp: i64) -> (String, String) {
        match DateTime::from_timestamp(timestamp, 0) {
            Some(utc) => {
                let local = utc.with_timezone(&self.offset);
                (
                    local.format("%d/%m/%Y").to_string(),
                    format!("{},", self.labels.weekday(local.weekday())),
                )
            }
            None => (String::new(), String::new()),
        }
    }
}
