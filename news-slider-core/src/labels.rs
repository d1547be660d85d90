//! User-facing strings.
//!
//! Built-in English and French label sets, with per-entry overrides read
//! from the `[labels]` configuration section.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Language of the built-in label set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// French.
    Fr,
}

const WEEKDAYS_EN: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const WEEKDAYS_FR: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

/// Strings used when decorating display entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// Language the weekday names come from.
    pub language: Language,
    /// Text of the "read more" link.
    pub read_more: String,
    /// Text of the "older posts" link.
    pub older_posts: String,
    /// Tooltip of the "older posts" link.
    pub older_posts_title: String,
    /// Word placed before the author name.
    pub by: String,
    /// Message of the placeholder entry.
    pub no_news: String,
    /// Course label of site-wide posts in site context.
    pub site_announcement: String,
    /// Tooltip prefix of course links ("View CS101").
    pub view_course: String,
    /// Markup placed in front of pinned subjects.
    pub pinned_marker: String,
}

/// Optional replacements for individual [`Labels`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LabelOverrides {
    pub read_more: Option<String>,
    pub older_posts: Option<String>,
    pub older_posts_title: Option<String>,
    pub by: Option<String>,
    pub no_news: Option<String>,
    pub site_announcement: Option<String>,
    pub view_course: Option<String>,
    pub pinned_marker: Option<String>,
}

impl Labels {
    /// The built-in label set for `language`.
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::En => Self {
                language,
                read_more: "Read more".to_string(),
                older_posts: "Older posts".to_string(),
                older_posts_title: "Click here to view older posts".to_string(),
                by: "by".to_string(),
                no_news: "You do not have any unread news posts at the moment".to_string(),
                site_announcement: "Site Announcement".to_string(),
                view_course: "View".to_string(),
                pinned_marker: default_pinned_marker("Discussion pinned"),
            },
            Language::Fr => Self {
                language,
                read_more: "Voir plus".to_string(),
                older_posts: "Anciens posts".to_string(),
                older_posts_title: "Cliquez ici pour voir les anciens posts".to_string(),
                by: "posté par".to_string(),
                no_news: "Vous n'avez aucune actualité non consultée".to_string(),
                site_announcement: "Annonce du site".to_string(),
                view_course: "Voir".to_string(),
                pinned_marker: default_pinned_marker("Discussion épinglée"),
            },
        }
    }

    /// Apply every override that is set.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &LabelOverrides) -> Self {
        let pairs = [
            (&mut self.read_more, &overrides.read_more),
            (&mut self.older_posts, &overrides.older_posts),
            (&mut self.older_posts_title, &overrides.older_posts_title),
            (&mut self.by, &overrides.by),
            (&mut self.no_news, &overrides.no_news),
            (&mut self.site_announcement, &overrides.site_announcement),
            (&mut self.view_course, &overrides.view_course),
            (&mut self.pinned_marker, &overrides.pinned_marker),
        ];
        for (label, replacement) in pairs {
            if let Some(text) = replacement {
                label.clone_from(text);
            }
        }
        self
    }

    /// Localized name of `day`.
    pub fn weekday(&self, day: Weekday) -> &'static str {
        let idx = day.num_days_from_monday() as usize;
        match self.language {
            Language::En => WEEKDAYS_EN[idx],
            Language::Fr => WEEKDAYS_FR[idx],
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}

fn default_pinned_marker(title: &str) -> String {
    format!(r#"<span class="news_sliderPinned" title="{title}" aria-label="{title}">&#128204;</span>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels_are_english() {
        let labels = Labels::default();
        assert_eq!(labels.language, Language::En);
        assert_eq!(labels.read_more, "Read more");
        assert_eq!(labels.site_announcement, "Site Announcement");
    }

    #[test]
    fn test_french_labels() {
        let labels = Labels::for_language(Language::Fr);
        assert_eq!(labels.read_more, "Voir plus");
        assert_eq!(labels.by, "posté par");
        assert_eq!(labels.older_posts, "Anciens posts");
    }

    #[test]
    fn test_overrides_replace_only_set_entries() {
        let overrides = LabelOverrides {
            read_more: Some("More".to_string()),
            pinned_marker: Some("[pinned]".to_string()),
            ..Default::default()
        };
        let labels = Labels::default().with_overrides(&overrides);
        assert_eq!(labels.read_more, "More");
        assert_eq!(labels.pinned_marker, "[pinned]");
        assert_eq!(labels.older_posts, "Older posts");
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(Labels::default().weekday(Weekday::Thu), "Thursday");
        assert_eq!(
            Labels::for_language(Language::Fr).weekday(Weekday::Sun),
            "dimanche"
        );
    }

    #[test]
    fn test_language_deserialization() {
        assert_eq!(
            serde_json::from_str::<Language>("\"fr\"").unwrap(),
            Language::Fr
        );
    }
}
