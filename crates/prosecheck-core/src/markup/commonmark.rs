//! CommonMark scanning via pulldown-cmark.
//!
//! Offsets come from the parser's offset iterator, so markers point back into
//! the original document and fenced or indented code never yields markers.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use super::Marker;
use crate::text::Span;

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

pub(super) fn find_markers(text: &str) -> Vec<Marker> {
    let mut markers = Vec::new();

    for (event, range) in Parser::new_ext(text, options()).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                markers.push(Marker::heading(
                    Span::new(range.start, range.end),
                    Some(level as u8),
                ));
            }
            Event::Start(Tag::Link { .. }) => {
                markers.push(Marker::link(Span::new(range.start, range.end)));
            }
            _ => {}
        }
    }

    markers
}

/// Spans of the outermost prose blocks: paragraphs, headings, list items and
/// tables. Code, HTML and metadata blocks are never part of a span, even when
/// they contain blank lines.
pub(super) fn block_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut covered = 0;

    for (event, range) in Parser::new_ext(text, options()).into_offset_iter() {
        let Event::Start(tag) = event else {
            continue;
        };
        let is_block = matches!(
            tag,
            Tag::Paragraph | Tag::Heading { .. } | Tag::Item | Tag::Table(_)
        );
        if !is_block || range.start < covered {
            continue;
        }
        covered = range.end;

        let slice = &text[range.start..range.end];
        let lead = slice.len() - slice.trim_start().len();
        let trimmed = slice.trim();
        if !trimmed.is_empty() {
            let start = range.start + lead;
            spans.push(Span::new(start, start + trimmed.len()));
        }
    }

    spans
}

/// Visible prose: text, link text and heading text without syntax.
pub(super) fn visible_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut skip_depth: usize = 0;

    for event in Parser::new_ext(text, options()) {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::MetadataBlock(_)) => skip_depth += 1,
            Event::End(TagEnd::CodeBlock | TagEnd::MetadataBlock(_)) => {
                skip_depth = skip_depth.saturating_sub(1);
            }
            Event::Text(t) if skip_depth == 0 => out.push_str(&t),
            Event::SoftBreak | Event::HardBreak if skip_depth == 0 => out.push(' '),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::TableCell,
            ) if skip_depth == 0 => out.push(' '),
            _ => {}
        }
    }

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out
}
