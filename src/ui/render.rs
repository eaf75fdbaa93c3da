//! Transcript rendering: formatter blocks onto themed terminal lines.
//!
//! Every message is re-derived on each draw: raw text through
//! [`crate::ui::markup::format_message`], then onto [`Line`]s with the
//! sender prefix attached to the first line. Nothing here is cached or
//! persisted.

use std::collections::VecDeque;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::message::{Message, Sender};
use crate::ui::markup::{self, Block, BlockKind, Inline, Segment};
use crate::ui::theme::Theme;

pub fn build_display_lines(messages: &VecDeque<Message>, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for msg in messages {
        append_message_lines(&mut lines, msg, theme);
        // Spacing line between messages
        lines.push(Line::from(""));
    }
    lines
}

pub fn max_scroll_offset(total_lines: u16, available_height: u16) -> u16 {
    total_lines.saturating_sub(available_height)
}

fn append_message_lines(lines: &mut Vec<Line<'static>>, msg: &Message, theme: &Theme) {
    let (prefix_style, text_style) = match &msg.sender {
        Sender::User => (theme.user_prefix_style, theme.user_text_style),
        Sender::Persona(_) => (theme.persona_prefix_style, theme.persona_text_style),
        Sender::System => (theme.system_text_style, theme.system_text_style),
    };

    let prefix = Span::styled(format!("{}: ", msg.sender.label()), prefix_style);

    let mut body = Vec::new();
    for block in markup::format_message(&msg.text) {
        body.extend(block_lines(&block, text_style));
    }

    match body.split_first() {
        Some((first, rest)) => {
            let mut spans = vec![prefix.clone()];
            spans.extend(first.spans.iter().cloned());
            lines.push(Line::from(spans));
            lines.extend(rest.iter().cloned());
        }
        None => lines.push(Line::from(prefix)),
    }
}

fn block_lines(block: &Block, text_style: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    match block.kind {
        BlockKind::OrderedList => {
            let mut number = 0;
            for segment in &block.segments {
                match segment {
                    Segment::Item(inlines) => {
                        number += 1;
                        let mut spans = vec![Span::styled(format!("{number}. "), text_style)];
                        spans.extend(single_line_spans(inlines, text_style));
                        lines.push(Line::from(spans));
                    }
                    // Separator whitespace between items collapses.
                    Segment::Text(inlines) if is_blank(inlines) => {}
                    Segment::Text(inlines) => extend_text_lines(&mut lines, inlines, text_style),
                }
            }
        }
        BlockKind::Paragraph => {
            for segment in &block.segments {
                match segment {
                    Segment::Item(inlines) => {
                        let spans = single_line_spans(inlines, text_style);
                        lines.push(Line::from(spans));
                    }
                    Segment::Text(inlines) => extend_text_lines(&mut lines, inlines, text_style),
                }
            }
            if lines.is_empty() {
                lines.push(Line::from(""));
            }
        }
    }

    lines
}

/// Item contents never span lines (the item pattern stops at the line
/// end), so they render as a single run of spans.
fn single_line_spans(inlines: &[Inline], text_style: Style) -> Vec<Span<'static>> {
    inlines
        .iter()
        .map(|inline| inline_span(inline, text_style))
        .collect()
}

/// Plain runs may carry embedded newlines; split them into lines while
/// keeping emphasis spans intact.
fn extend_text_lines(lines: &mut Vec<Line<'static>>, inlines: &[Inline], text_style: Style) {
    let mut current: Vec<Span<'static>> = Vec::new();

    for inline in inlines {
        match inline {
            Inline::Text(text) if text.contains('\n') => {
                let mut parts = text.split('\n');
                if let Some(first) = parts.next() {
                    if !first.is_empty() {
                        current.push(Span::styled(first.to_string(), text_style));
                    }
                }
                for part in parts {
                    lines.push(Line::from(std::mem::take(&mut current)));
                    if !part.is_empty() {
                        current.push(Span::styled(part.to_string(), text_style));
                    }
                }
            }
            other => current.push(inline_span(other, text_style)),
        }
    }

    if !current.is_empty() {
        lines.push(Line::from(current));
    }
}

fn inline_span(inline: &Inline, text_style: Style) -> Span<'static> {
    match inline {
        Inline::Text(text) => Span::styled(text.clone(), text_style),
        Inline::Strong(text) => {
            Span::styled(text.clone(), text_style.add_modifier(Modifier::BOLD))
        }
        Inline::Emph(text) => {
            Span::styled(text.clone(), text_style.add_modifier(Modifier::ITALIC))
        }
    }
}

fn is_blank(inlines: &[Inline]) -> bool {
    inlines.iter().all(|inline| match inline {
        Inline::Text(text) => text.trim().is_empty(),
        _ => false,
    })
}
