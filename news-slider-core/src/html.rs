//! Small HTML utilities shared by the truncator and the entry formatter.
//!
//! None of this is a real HTML parser. Forum messages are scanned as an
//! alternating sequence of tags and text runs, which is all the excerpting
//! code needs and which tolerates whatever markup the host hands over.

/// Elements that never take a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// One piece of scanned markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// A complete `<...>` tag, including the angle brackets.
    Tag(&'a str),
    /// Plain text between tags. Entities are left encoded.
    Text(&'a str),
}

/// What a tag does to the open-element stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TagKind {
    /// An opening tag for an element that needs a closer. Name is lowercased.
    Open(String),
    /// A closing tag. Name is lowercased.
    Close(String),
    /// Void and self-closing elements, comments, doctype, processing instructions.
    Standalone,
}

/// Iterator over the tags and text runs of an HTML string.
pub(crate) struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    pub(crate) fn new(html: &'a str) -> Self {
        Self { rest: html }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        if let Some(len) = tag_len(self.rest) {
            let (tag, rest) = self.rest.split_at(len);
            self.rest = rest;
            return Some(Segment::Tag(tag));
        }

        // A `<` that does not start a tag is ordinary text, so only stop
        // at the next one that does.
        let end = self
            .rest
            .match_indices('<')
            .map(|(i, _)| i)
            .find(|&i| i > 0 && tag_len(&self.rest[i..]).is_some())
            .unwrap_or(self.rest.len());
        let (text, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Segment::Text(text))
    }
}

/// Byte length of the tag starting at the beginning of `s`, if there is one.
///
/// A tag is `<` followed by a letter, `/`, `!` or `?`, running to the first `>`.
fn tag_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }
    match bytes.get(1) {
        Some(b) if b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?') => {}
        _ => return None,
    }
    s[1..].find('>').map(|end| end + 2)
}

/// Classify a tag produced by [`Segments`].
pub(crate) fn classify_tag(tag: &str) -> TagKind {
    let inner = tag
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(tag)
        .trim();

    if let Some(rest) = inner.strip_prefix('/') {
        let name = rest.split_ascii_whitespace().next().unwrap_or("");
        if name.is_empty() {
            return TagKind::Standalone;
        }
        return TagKind::Close(name.to_ascii_lowercase());
    }

    if inner.starts_with(['!', '?']) || inner.ends_with('/') {
        return TagKind::Standalone;
    }

    let name = inner
        .split(|c: char| c.is_ascii_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    if name.is_empty() || VOID_ELEMENTS.contains(&name.as_str()) {
        return TagKind::Standalone;
    }
    TagKind::Open(name)
}

/// Byte length of the character reference at the start of `s`, if any.
///
/// Recognises `&name;` (2-8 alphanumerics), `&#123;` (1-7 digits) and
/// `&#x1F600;` (1-6 hex digits).
pub(crate) fn entity_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'&') {
        return None;
    }

    if bytes.get(1) == Some(&b'#') {
        let hex = matches!(bytes.get(2), Some(b'x' | b'X'));
        let start = if hex { 3 } else { 2 };
        let max_digits = if hex { 6 } else { 7 };
        let digits = bytes
            .get(start..)
            .unwrap_or(&[])
            .iter()
            .take_while(|b| {
                if hex {
                    b.is_ascii_hexdigit()
                } else {
                    b.is_ascii_digit()
                }
            })
            .count();
        if digits == 0 || digits > max_digits || bytes.get(start + digits) != Some(&b';') {
            return None;
        }
        return Some(start + digits + 1);
    }

    let name = bytes[1..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if (2..=8).contains(&name) && bytes.get(1 + name) == Some(&b';') {
        Some(name + 2)
    } else {
        None
    }
}

/// Escape text for use inside HTML content or a double-quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Remove every tag, keeping text runs (and their entities) as they are.
pub fn strip_tags(html: &str) -> String {
    Segments::new(html)
        .filter_map(|segment| match segment {
            Segment::Text(text) => Some(text),
            Segment::Tag(_) => None,
        })
        .collect()
}

/// Flatten the paragraph and line-break wrappers the host editor injects
/// so that adjacent paragraphs do not run together once tags are stripped.
///
/// Every `<p>` opener is dropped whatever its attributes, each `</p>` and
/// `<br>` becomes a space, and all other markup is kept.
pub fn flatten_paragraphs(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    for segment in Segments::new(html) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Tag(tag) => match classify_tag(tag) {
                TagKind::Open(name) if name == "p" => {}
                TagKind::Close(name) if name == "p" => out.push(' '),
                TagKind::Standalone if element_name(tag) == "br" => out.push(' '),
                _ => out.push_str(tag),
            },
        }
    }
    out
}

/// Lowercased element name of a tag, empty for comments and the like.
fn element_name(tag: &str) -> String {
    tag.trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase()
}
