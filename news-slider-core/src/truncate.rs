//! HTML-aware text truncation.
//!
//! Cuts announcement bodies down to a budget of visible text without ever
//! emitting malformed markup. Tags are copied through without counting
//! against the budget, character references count as a single unit and are
//! never split, and every element left open by the cut is closed again in
//! last-opened-first-closed order.
//!
//! Lengths are UTF-8 byte counts. A cut never lands inside a code point.

use crate::html::{Segment, Segments, TagKind, classify_tag, entity_len};

#[cfg(test)]
mod tests;

/// Ending appended by [`TruncateOptions::default`].
pub const DEFAULT_ENDING: &str = "...";

/// How [`truncate`] cuts and marks its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncateOptions {
    /// Appended after the cut, only when something was actually cut.
    pub ending: String,
    /// When false, a cut that lands inside a word backs off to the last whitespace.
    pub exact: bool,
    /// When true, markup is copied through uncounted and kept balanced.
    pub consider_html: bool,
}

impl Default for TruncateOptions {
    fn default() -> Self {
        Self {
            ending: DEFAULT_ENDING.to_string(),
            exact: false,
            consider_html: true,
        }
    }
}

impl TruncateOptions {
    /// Word-safe, HTML-aware options with the default `...` ending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the marker appended when truncation occurs.
    #[must_use]
    pub fn with_ending(mut self, ending: impl Into<String>) -> Self {
        self.ending = ending.into();
        self
    }

    /// Allow cutting in the middle of a word.
    #[must_use]
    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    /// Treat the input as HTML (`true`) or as opaque bytes (`false`).
    #[must_use]
    pub fn consider_html(mut self, consider_html: bool) -> Self {
        self.consider_html = consider_html;
        self
    }
}

/// Result of [`truncate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    /// The (possibly shortened) text.
    pub text: String,
    /// Whether anything was cut. The ending is present exactly when this is true.
    pub truncated: bool,
}

impl Truncated {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            truncated: false,
        }
    }

    /// Consume the result, keeping only the text.
    pub fn into_string(self) -> String {
        self.text
    }
}

/// Shorten `text` to at most `max_len` bytes of visible text.
///
/// With `consider_html` the budget covers text content only: tags are free,
/// each character reference costs one, and the ending is not counted. Text
/// already within budget is returned untouched. Without `consider_html` the
/// whole string, ending included, must fit in `max_len` bytes.
///
/// Never fails: unbalanced or stray markup is tolerated and the output is
/// always balanced for the elements it opens.
///
/// # Examples
///
/// ```
/// use news_slider_core::truncate::{TruncateOptions, truncate};
///
/// let result = truncate(
///     "<p>Hello <b>world</b>, this is a test</p>",
///     5,
///     &TruncateOptions::new(),
/// );
/// assert_eq!(result.text, "<p>Hello...</p>");
/// assert!(result.truncated);
/// ```
pub fn truncate(text: &str, max_len: usize, options: &TruncateOptions) -> Truncated {
    if options.consider_html {
        truncate_html(text, max_len, options)
    } else {
        truncate_plain(text, max_len, options)
    }
}

/// Length of `html` with tags removed and each character reference counted once.
pub fn visible_len(html: &str) -> usize {
    Segments::new(html)
        .map(|segment| match segment {
            Segment::Text(text) => Units::new(text).map(|u| u.weight).sum(),
            Segment::Tag(_) => 0,
        })
        .sum()
}

fn truncate_plain(text: &str, max_len: usize, options: &TruncateOptions) -> Truncated {
    if text.len() <= max_len {
        return Truncated::unchanged(text);
    }

    let keep = floor_char_boundary(text, max_len.saturating_sub(options.ending.len()));
    let mut cut = &text[..keep];
    if !options.exact {
        cut = back_off_word(cut, text[keep..].chars().next());
    }

    let mut out = String::with_capacity(cut.len() + options.ending.len());
    out.push_str(cut);
    out.push_str(&options.ending);
    Truncated {
        text: out,
        truncated: true,
    }
}

fn truncate_html(text: &str, max_len: usize, options: &TruncateOptions) -> Truncated {
    if visible_len(text) <= max_len {
        return Truncated::unchanged(text);
    }

    let budget = visible_budget(text, max_len, options.exact);
    let mut out = String::with_capacity(text.len().min(max_len * 2) + options.ending.len());
    let mut open_tags: Vec<String> = Vec::new();
    let mut used = 0usize;

    for segment in Segments::new(text) {
        // Tags are copied eagerly, but only while there is budget left for
        // the content they introduce.
        if used >= budget {
            break;
        }

        match segment {
            Segment::Tag(tag) => {
                track_tag(&mut open_tags, tag);
                out.push_str(tag);
            }
            Segment::Text(run) => {
                let fit = fitting_prefix(run, budget - used);
                out.push_str(&run[..fit]);
                used += Units::new(&run[..fit]).map(|u| u.weight).sum::<usize>();
            }
        }
    }

    out.push_str(&options.ending);
    for tag in open_tags.iter().rev() {
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    Truncated {
        text: out,
        truncated: true,
    }
}

/// Visible weight to keep from `text` when cutting it down to `max_len`.
///
/// Words are judged on the visible text alone, so a word split by markup
/// (`wor</b>ld`) is still one word. Unless `exact`, a cut inside a word backs
/// off to the last whitespace and trailing whitespace is dropped. A first
/// word longer than the budget is cut exactly.
fn visible_budget(text: &str, max_len: usize, exact: bool) -> usize {
    let units: Vec<Unit> = Segments::new(text)
        .filter_map(|segment| match segment {
            Segment::Text(run) => Some(run),
            Segment::Tag(_) => None,
        })
        .flat_map(Units::new)
        .collect();

    let mut kept = 0;
    let mut weight = 0;
    for unit in &units {
        if weight + unit.weight > max_len {
            break;
        }
        weight += unit.weight;
        kept += 1;
    }

    if !exact {
        let is_space = |idx: usize| units.get(idx).is_some_and(|unit| unit.space);
        let splits_word = kept > 0 && kept < units.len() && !is_space(kept) && !is_space(kept - 1);
        if splits_word {
            kept = (0..kept).rev().find(|&idx| is_space(idx)).unwrap_or(kept);
        }
        while kept > 0 && is_space(kept - 1) {
            kept -= 1;
        }
    }

    units[..kept].iter().map(|unit| unit.weight).sum()
}

/// Update the open-element stack for one tag.
///
/// A closer pops the most recent matching opener; a closer with no matching
/// opener is ignored.
fn track_tag(open_tags: &mut Vec<String>, tag: &str) {
    match classify_tag(tag) {
        TagKind::Open(name) => open_tags.push(name),
        TagKind::Close(name) => {
            if let Some(idx) = open_tags.iter().rposition(|t| *t == name) {
                open_tags.remove(idx);
            }
        }
        TagKind::Standalone => {}
    }
}

/// Byte length of the longest prefix of `run` whose visible weight fits in `budget`.
fn fitting_prefix(run: &str, budget: usize) -> usize {
    let mut weight = 0;
    let mut len = 0;
    for unit in Units::new(run) {
        if weight + unit.weight > budget {
            break;
        }
        weight += unit.weight;
        len += unit.len;
    }
    len
}

/// Drop a trailing partial word from `fragment`.
///
/// `next` is the character right after the cut. A fragment with no
/// whitespace to back off to is kept as an exact cut.
fn back_off_word(fragment: &str, next: Option<char>) -> &str {
    let splits_word = next.is_some_and(|c| !c.is_whitespace())
        && fragment.chars().last().is_some_and(|c| !c.is_whitespace());
    if !splits_word {
        return fragment.trim_end();
    }

    match fragment.rfind(char::is_whitespace) {
        Some(pos) => fragment[..pos].trim_end(),
        None => fragment,
    }
}

/// Round `idx` down to the nearest valid UTF-8 character boundary in `s`.
pub(crate) fn floor_char_boundary(s: &str, idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    let mut i = idx;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// A countable piece of a text run: one character reference or one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Unit {
    /// Bytes the unit occupies in the source.
    len: usize,
    /// Bytes the unit costs against the budget.
    weight: usize,
    /// Whitespace character. Character references never count as whitespace.
    space: bool,
}

struct Units<'a> {
    rest: &'a str,
}

impl<'a> Units<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl Iterator for Units<'_> {
    type Item = Unit;

    fn next(&mut self) -> Option<Unit> {
        let ch = self.rest.chars().next()?;
        let unit = match entity_len(self.rest) {
            Some(len) => Unit {
                len,
                weight: 1,
                space: false,
            },
            None => Unit {
                len: ch.len_utf8(),
                weight: ch.len_utf8(),
                space: ch.is_whitespace(),
            },
        };
        self.rest = &self.rest[unit.len..];
        Some(unit)
    }
}
