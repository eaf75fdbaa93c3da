//! Reply text formatting.
//!
//! Messages use a small markup dialect: blank-line separated paragraphs,
//! `**bold**`, `_italic_`, and numbered list items ("1. like this"). The
//! formatter is a fixed pipeline per paragraph (item marking, then bold,
//! then italic) followed by container classification. It has no failure
//! mode: unmatched delimiters stay literal, and any input produces
//! blocks.
//!
//! Classification is deliberately a literal-prefix check: a paragraph is
//! an ordered-list container only when its transformed content *begins*
//! with an item, never because it merely contains one. A paragraph like
//! "see below:\n1. first" therefore renders as a plain paragraph that
//! happens to contain an item segment. This is preserved compatibility
//! behavior, not an oversight.

use regex::Regex;
use std::sync::LazyLock;

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+\.\s)(.+)").expect("LIST_ITEM_RE is a valid static regex pattern")
});

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(.*?)\*\*").expect("BOLD_RE is a valid static regex pattern")
});

static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(.*?)_").expect("ITALIC_RE is a valid static regex pattern"));

/// An inline run within a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
    Emph(String),
}

/// A paragraph-level run: plain text, or a numbered-list item with its
/// numeric prefix already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(Vec<Inline>),
    Item(Vec<Inline>),
}

/// Container classification for one paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    OrderedList,
}

/// One renderable block. Exactly one block per paragraph, in input
/// order; classification is all-or-nothing per paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub segments: Vec<Segment>,
}

/// Format one message's raw text into renderable blocks.
pub fn format_message(text: &str) -> Vec<Block> {
    split_paragraphs(text).map(format_paragraph).collect()
}

/// Paragraphs are separated by the literal blank line. Empty paragraphs
/// are preserved rather than dropped.
pub fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n")
}

fn format_paragraph(paragraph: &str) -> Block {
    let segments = mark_list_items(paragraph);
    let kind = classify(&segments);
    Block { kind, segments }
}

/// Step one: every match of "digits, period, whitespace, rest of line"
/// drops the numeric prefix and wraps the remainder as an item segment.
/// The match is global, so one paragraph can yield several items with
/// interstitial text between them.
fn mark_list_items(paragraph: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in LIST_ITEM_RE.captures_iter(paragraph) {
        let whole = caps.get(0).expect("regex match has a whole capture");
        if whole.start() > cursor {
            segments.push(Segment::Text(parse_inlines(&paragraph[cursor..whole.start()])));
        }
        let rest = caps.get(2).expect("LIST_ITEM_RE has two capture groups");
        segments.push(Segment::Item(parse_inlines(rest.as_str())));
        cursor = whole.end();
    }

    if cursor < paragraph.len() || segments.is_empty() {
        segments.push(Segment::Text(parse_inlines(&paragraph[cursor..])));
    }

    segments
}

/// Step two and three: bold, then italic. Bold pairs are consumed first;
/// italic delimiters are only recognized in the text left between bold
/// runs, so an underscore inside a bold span stays literal.
fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut cursor = 0;

    for caps in BOLD_RE.captures_iter(text) {
        let whole = caps.get(0).expect("regex match has a whole capture");
        if whole.start() > cursor {
            parse_italic(&text[cursor..whole.start()], &mut inlines);
        }
        let content = caps.get(1).expect("BOLD_RE has one capture group");
        inlines.push(Inline::Strong(content.as_str().to_string()));
        cursor = whole.end();
    }
    if cursor < text.len() {
        parse_italic(&text[cursor..], &mut inlines);
    }

    inlines
}

fn parse_italic(text: &str, inlines: &mut Vec<Inline>) {
    let mut cursor = 0;

    for caps in ITALIC_RE.captures_iter(text) {
        let whole = caps.get(0).expect("regex match has a whole capture");
        if whole.start() > cursor {
            inlines.push(Inline::Text(text[cursor..whole.start()].to_string()));
        }
        let content = caps.get(1).expect("ITALIC_RE has one capture group");
        inlines.push(Inline::Emph(content.as_str().to_string()));
        cursor = whole.end();
    }
    if cursor < text.len() {
        inlines.push(Inline::Text(text[cursor..].to_string()));
    }
}

/// The literal-prefix check described in the module docs.
fn classify(segments: &[Segment]) -> BlockKind {
    match segments.first() {
        Some(Segment::Item(_)) => BlockKind::OrderedList,
        _ => BlockKind::Paragraph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn strong(s: &str) -> Inline {
        Inline::Strong(s.to_string())
    }

    fn emph(s: &str) -> Inline {
        Inline::Emph(s.to_string())
    }

    #[test]
    fn plain_text_is_one_paragraph_block() {
        let blocks = format_message("just some plain text");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(
            blocks[0].segments,
            vec![Segment::Text(vec![text("just some plain text")])]
        );
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let blocks = format_message("para one\n\npara two");

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(blocks[0].segments, vec![Segment::Text(vec![text("para one")])]);
        assert_eq!(blocks[1].segments, vec![Segment::Text(vec![text("para two")])]);
    }

    #[test]
    fn empty_paragraphs_are_preserved() {
        let blocks = format_message("a\n\n\n\nb");

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].segments, vec![Segment::Text(vec![])]);
    }

    #[test]
    fn bold_run_becomes_strong() {
        let blocks = format_message("**bold**");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[0].segments, vec![Segment::Text(vec![strong("bold")])]);
    }

    #[test]
    fn italic_run_becomes_emph() {
        let blocks = format_message("before _within_ after");

        assert_eq!(
            blocks[0].segments,
            vec![Segment::Text(vec![
                text("before "),
                emph("within"),
                text(" after"),
            ])]
        );
    }

    #[test]
    fn bold_is_resolved_before_italic() {
        let blocks = format_message("**a** and _b_");

        assert_eq!(
            blocks[0].segments,
            vec![Segment::Text(vec![strong("a"), text(" and "), emph("b")])]
        );
    }

    #[test]
    fn underscores_inside_bold_stay_literal() {
        let blocks = format_message("**snake_case_name**");

        assert_eq!(
            blocks[0].segments,
            vec![Segment::Text(vec![strong("snake_case_name")])]
        );
    }

    #[test]
    fn unmatched_delimiters_stay_literal() {
        let blocks = format_message("**not closed and _still open");

        assert_eq!(
            blocks[0].segments,
            vec![Segment::Text(vec![text("**not closed and _still open")])]
        );
    }

    #[test]
    fn numbered_items_in_one_paragraph_classify_as_a_list() {
        // A single paragraph with an embedded newline, no blank-line
        // split: both items are transformed, the prefix digits are
        // dropped, and the block is a list because the first item sits at
        // the very start.
        let blocks = format_message("1. first\n2. second");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::OrderedList);
        assert_eq!(
            blocks[0].segments,
            vec![
                Segment::Item(vec![text("first")]),
                Segment::Text(vec![text("\n")]),
                Segment::Item(vec![text("second")]),
            ]
        );
    }

    #[test]
    fn classifies_by_literal_prefix_only() {
        // The item is transformed either way, but text ahead of it keeps
        // the paragraph classification.
        let blocks = format_message("shopping:\n1. apples");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(
            blocks[0].segments,
            vec![
                Segment::Text(vec![text("shopping:\n")]),
                Segment::Item(vec![text("apples")]),
            ]
        );
    }

    #[test]
    fn multi_digit_prefixes_are_items_but_missing_space_is_not() {
        let blocks = format_message("12. twelfth");
        assert_eq!(blocks[0].kind, BlockKind::OrderedList);
        assert_eq!(blocks[0].segments, vec![Segment::Item(vec![text("twelfth")])]);

        let blocks = format_message("1.no space");
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[0].segments, vec![Segment::Text(vec![text("1.no space")])]);
    }

    #[test]
    fn emphasis_applies_inside_list_items() {
        let blocks = format_message("1. **loud** and _quiet_");

        assert_eq!(blocks[0].kind, BlockKind::OrderedList);
        assert_eq!(
            blocks[0].segments,
            vec![Segment::Item(vec![
                strong("loud"),
                text(" and "),
                emph("quiet"),
            ])]
        );
    }

    #[test]
    fn list_and_paragraph_blocks_keep_input_order() {
        let blocks = format_message("intro text\n\n1. one\n2. two\n\noutro");

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[1].kind, BlockKind::OrderedList);
        assert_eq!(blocks[2].kind, BlockKind::Paragraph);
    }
}
