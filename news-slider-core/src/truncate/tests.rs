use super::*;

/// Assert that every closer in `html` matches the innermost open element
/// and that nothing is left open at the end.
fn assert_balanced(html: &str) {
    let mut stack: Vec<String> = Vec::new();
    for segment in Segments::new(html) {
        if let Segment::Tag(tag) = segment {
            match classify_tag(tag) {
                TagKind::Open(name) => stack.push(name),
                TagKind::Close(name) => {
                    assert_eq!(
                        stack.pop().as_deref(),
                        Some(name.as_str()),
                        "mismatched closer in {html}"
                    );
                }
                TagKind::Standalone => {}
            }
        }
    }
    assert!(stack.is_empty(), "unclosed tags {stack:?} in {html}");
}

fn html(ending: &str) -> TruncateOptions {
    TruncateOptions::new().with_ending(ending)
}

fn plain(ending: &str) -> TruncateOptions {
    TruncateOptions::new()
        .with_ending(ending)
        .consider_html(false)
}

const SAMPLE: &str = "<div class=\"x\"><p>Alpha &amp; <b>beta</b> gamma&#39;s <i>delta <u>epsilon</u></i></p><br/>zeta &hellip; eta</div>";

// --- HTML mode ---

#[test]
fn test_truncate_word_boundary_fixture() {
    let result = truncate("<p>Hello <b>world</b>, this is a test</p>", 5, &html("..."));
    assert_eq!(result.text, "<p>Hello...</p>");
    assert!(result.truncated);
}

#[test]
fn test_truncate_backs_off_to_last_space() {
    let result = truncate("<p>Hello world again</p>", 8, &html("..."));
    assert_eq!(result.text, "<p>Hello...</p>");
}

#[test]
fn test_truncate_exact_cuts_mid_word() {
    let result = truncate("<p>Hello world again</p>", 8, &html("...").exact(true));
    assert_eq!(result.text, "<p>Hello wo...</p>");
}

#[test]
fn test_truncate_drops_fragment_that_starts_a_word() {
    let result = truncate("<p>Hello <b>world</b>, this</p>", 8, &html("..."));
    assert_eq!(result.text, "<p>Hello...</p>");
}

#[test]
fn test_truncate_backs_off_word_split_by_markup() {
    let result = truncate("Hello <b>wor</b>ld again", 9, &html("..."));
    assert_eq!(result.text, "Hello...");

    let result = truncate("one <i>tw</i>o three", 6, &html("..."));
    assert_eq!(result.text, "one...");
}

#[test]
fn test_truncate_backs_off_when_run_fills_budget_mid_word() {
    // "wor" fits exactly, but the word carries on after the closer.
    let result = truncate("Hello <b>wor</b>ld again", 9, &html("...").exact(true));
    assert_eq!(result.text, "Hello <b>wor...</b>");

    let result = truncate("Go <em>al</em>pha beta", 5, &html("..."));
    assert_eq!(result.text, "Go...");
}

#[test]
fn test_truncate_single_word_split_by_markup_is_cut_exactly() {
    let result = truncate("<b>Hel</b>lo world", 4, &html("..."));
    assert_eq!(result.text, "<b>Hel</b>l...");
}

#[test]
fn test_truncate_trims_space_when_run_fills_budget() {
    let result = truncate("Hello <b>world</b>", 6, &html("..."));
    assert_eq!(result.text, "Hello...");

    let result = truncate("Hello <b>world</b>", 6, &html("...").exact(true));
    assert_eq!(result.text, "Hello ...");
}

#[test]
fn test_truncate_closes_tags_in_lifo_order() {
    let result = truncate(
        "<div><p><em>one two three</em></p></div>",
        7,
        &html(".."),
    );
    assert_eq!(result.text, "<div><p><em>one two..</em></p></div>");
}

#[test]
fn test_truncate_keeps_attributes_verbatim() {
    let result = truncate(
        "<a href=\"x.html\" title=\"t\">Click here now</a>",
        10,
        &html("..."),
    );
    assert_eq!(result.text, "<a href=\"x.html\" title=\"t\">Click here...</a>");
}

#[test]
fn test_truncate_lowercases_injected_closers() {
    let result = truncate("<DIV>Some words here</DIV>", 4, &html(""));
    assert_eq!(result.text, "<DIV>Some</div>");
}

#[test]
fn test_truncate_void_elements_are_not_closed() {
    let result = truncate(
        "<p>Line one<br>Line two is longer</p>",
        12,
        &html("\u{2026}"),
    );
    assert_eq!(result.text, "<p>Line one<br>Line\u{2026}</p>");
}

#[test]
fn test_truncate_comment_is_copied_not_tracked() {
    let result = truncate("<!-- note --><b>Hello world</b>", 5, &html("..."));
    assert_eq!(result.text, "<!-- note --><b>Hello...</b>");
}

#[test]
fn test_truncate_orphan_closer_is_tolerated() {
    let result = truncate("</b>Hello world again", 8, &html("..."));
    assert_eq!(result.text, "</b>Hello...");
}

#[test]
fn test_truncate_stops_before_tags_after_budget() {
    let result = truncate("<b>abc</b><i>def</i>", 3, &html("..."));
    assert_eq!(result.text, "<b>abc...</b>");
}

#[test]
fn test_truncate_stray_less_than_is_text() {
    let result = truncate("x < y is true for small numbers", 8, &html("..."));
    assert_eq!(result.text, "x < y is...");
}

// --- Entities ---

#[test]
fn test_truncate_entity_counts_as_one() {
    let result = truncate("Fish &amp; chips are great", 6, &html("...").exact(true));
    assert_eq!(result.text, "Fish &amp;...");
}

#[test]
fn test_truncate_never_splits_entity() {
    let result = truncate("Fish &amp; chips are great", 5, &html("...").exact(true));
    assert_eq!(result.text, "Fish ...");
}

#[test]
fn test_visible_len_counts_entities_once() {
    assert_eq!(visible_len("<p>Short &amp; sweet</p>"), 13);
    assert_eq!(visible_len("&#x1F600;&hellip;"), 2);
}

#[test]
fn test_truncate_entity_atomicity_for_all_budgets() {
    for budget in 0..=visible_len(SAMPLE) {
        let result = truncate(SAMPLE, budget, &html("").exact(true));
        let text = &result.text;
        for (idx, _) in text.match_indices('&') {
            assert!(
                entity_len(&text[idx..]).is_some(),
                "partial entity at budget {budget}: {text}"
            );
        }
    }
}

// --- Invariants ---

#[test]
fn test_truncate_idempotent_when_within_budget() {
    let text = "<p>Short &amp; sweet</p>";
    let result = truncate(text, 13, &html("..."));
    assert_eq!(result.text, text);
    assert!(!result.truncated);
}

#[test]
fn test_truncate_plain_text_within_budget_unchanged() {
    let result = truncate("already short", 100, &TruncateOptions::default());
    assert_eq!(result.text, "already short");
    assert!(!result.truncated);
}

#[test]
fn test_truncate_output_balanced_for_all_budgets() {
    for exact in [true, false] {
        for budget in 0..=visible_len(SAMPLE) + 1 {
            let result = truncate(SAMPLE, budget, &html("...").exact(exact));
            assert_balanced(&result.text);
        }
    }
}

#[test]
fn test_truncate_respects_budget_for_all_budgets() {
    for exact in [true, false] {
        for budget in 0..=visible_len(SAMPLE) {
            let result = truncate(SAMPLE, budget, &html("").exact(exact));
            assert!(
                visible_len(&result.text) <= budget,
                "budget {budget} exceeded: {}",
                result.text
            );
        }
    }
}

#[test]
fn test_truncate_word_boundary_for_all_budgets() {
    let text = "<p>alpha beta <b>gamma delta</b> ep<i>si</i>lon <u>ze</u>ta</p>";
    let words = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"];
    // Below the first word's length there is no boundary to back off to.
    for budget in "alpha".len()..visible_len(text) {
        let result = truncate(text, budget, &html("|"));
        assert_balanced(&result.text);
        let body = crate::html::strip_tags(&result.text);
        let body = body.strip_suffix('|').unwrap_or(&body);
        assert_eq!(body, body.trim_end(), "trailing space at budget {budget}");
        for word in body.split_whitespace() {
            assert!(
                words.contains(&word),
                "partial word {word:?} at budget {budget}: {}",
                result.text
            );
        }
    }
}

#[test]
fn test_truncate_zero_budget_yields_ending_only() {
    let result = truncate("<p><b>bold</b> text</p>", 0, &html("..."));
    assert_eq!(result.text, "...");
    assert!(result.truncated);
}

#[test]
fn test_truncate_zero_budget_plain_text() {
    let result = truncate("some text", 0, &html(""));
    assert_eq!(result.text, "");
    assert!(result.truncated);
}

#[test]
fn test_truncate_empty_input() {
    let result = truncate("", 0, &html("..."));
    assert_eq!(result.text, "");
    assert!(!result.truncated);
}

#[test]
fn test_truncate_multibyte_never_splits_code_point() {
    let result = truncate("<b>h\u{e9}llo w\u{f6}rld</b>", 2, &html("..."));
    assert_eq!(result.text, "<b>h...</b>");

    let result = truncate("<b>h\u{e9}llo w\u{f6}rld</b>", 3, &html("..."));
    assert_eq!(result.text, "<b>h\u{e9}...</b>");
}

// --- Plain mode ---

#[test]
fn test_truncate_plain_counts_ending_in_budget() {
    let result = truncate("The quick brown fox", 12, &plain("..."));
    assert_eq!(result.text, "The quick...");
    assert!(result.text.len() <= 12);
}

#[test]
fn test_truncate_plain_backs_off_mid_word() {
    let result = truncate("The quick brown fox", 10, &plain("..."));
    assert_eq!(result.text, "The...");
}

#[test]
fn test_truncate_plain_exact() {
    let result = truncate("The quick brown fox", 10, &plain("...").exact(true));
    assert_eq!(result.text, "The qui...");
}

#[test]
fn test_truncate_plain_ignores_markup() {
    let result = truncate("<b>bold text</b>", 8, &plain("").exact(true));
    assert_eq!(result.text, "<b>bold ");
}

#[test]
fn test_truncate_plain_ending_longer_than_budget() {
    let result = truncate("abcdef", 2, &plain("..."));
    assert_eq!(result.text, "...");
}

// --- Options ---

#[test]
fn test_truncate_options_default() {
    let options = TruncateOptions::default();
    assert_eq!(options.ending, "...");
    assert!(!options.exact);
    assert!(options.consider_html);
}

#[test]
fn test_truncated_into_string() {
    let result = truncate("one two three", 3, &html("!"));
    assert_eq!(result.into_string(), "one!");
}

#[test]
fn test_floor_char_boundary() {
    let s = "a\u{e9}b";
    assert_eq!(floor_char_boundary(s, 0), 0);
    assert_eq!(floor_char_boundary(s, 2), 1);
    assert_eq!(floor_char_boundary(s, 3), 3);
    assert_eq!(floor_char_boundary(s, 99), s.len());
}
