//! Structural marker recognition under a pluggable markup dialect.
//!
//! A [`MarkupDialect`] bundles what the engine needs to know about how a
//! document encodes structure:
//!
//! - where headings are, and their nesting level when the markup has one
//! - where hyperlinks are
//! - what separates paragraphs
//! - how to strip markup syntax before words are counted
//!
//! Tag- and emphasis-based dialects are driven by regex pattern tables
//! ([`DialectPatterns`] for user-defined ones). Markdown is scanned with a
//! CommonMark parser so fenced code never yields markers. Callers choose the
//! dialect; the engine never infers it.

mod commonmark;
mod patterns;

use std::borrow::Cow;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::DialectKind;
use crate::error::{ValidationError, ValidationResult};
use crate::text::{Span, split_paragraphs};

pub use patterns::{DialectPatterns, HeadingPatternSpec, StripPatternSpec};

use patterns::PatternTable;

/// What a [`Marker`] denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// A heading or sub-heading.
    Heading,
    /// A hyperlink.
    Link,
}

impl MarkerKind {
    /// Returns the kind as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Link => "link",
        }
    }
}

/// A located structural element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Marker {
    /// Heading or link.
    pub kind: MarkerKind,
    /// Byte offsets of the whole construct in the document.
    pub span: Span,
    /// Heading level (1-6) when the dialect encodes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl Marker {
    /// A heading marker.
    pub const fn heading(span: Span, level: Option<u8>) -> Self {
        Self {
            kind: MarkerKind::Heading,
            span,
            level,
        }
    }

    /// A link marker.
    pub const fn link(span: Span) -> Self {
        Self {
            kind: MarkerKind::Link,
            span,
            level: None,
        }
    }

    /// Returns `true` for heading markers.
    pub fn is_heading(&self) -> bool {
        self.kind == MarkerKind::Heading
    }

    /// Returns `true` for link markers.
    pub fn is_link(&self) -> bool {
        self.kind == MarkerKind::Link
    }
}

#[derive(Debug, Clone)]
enum Scanner {
    Patterns(PatternTable),
    CommonMark,
}

/// How a document encodes headings, links and paragraphs.
#[derive(Debug, Clone)]
pub struct MarkupDialect {
    name: String,
    scanner: Scanner,
    paragraph_separator: Regex,
    normalize: bool,
}

impl MarkupDialect {
    /// HTML heading tags (`<h1>`..`<h6>`) and `<a href>` anchors.
    pub fn html() -> Self {
        Self {
            name: DialectKind::Html.as_str().to_string(),
            scanner: Scanner::Patterns(patterns::html()),
            paragraph_separator: patterns::LINE_BREAKS.clone(),
            normalize: true,
        }
    }

    /// CommonMark headings and links; paragraphs are the parser's blocks.
    pub fn markdown() -> Self {
        Self {
            name: DialectKind::Markdown.as_str().to_string(),
            scanner: Scanner::CommonMark,
            paragraph_separator: patterns::BLANK_LINES.clone(),
            normalize: true,
        }
    }

    /// Lines consisting solely of bold text act as headings (no levels).
    pub fn bold_headings() -> Self {
        Self {
            name: DialectKind::BoldHeadings.as_str().to_string(),
            scanner: Scanner::Patterns(patterns::bold_headings()),
            paragraph_separator: patterns::LINE_BREAKS.clone(),
            normalize: true,
        }
    }

    /// Elements whose `class` names a heading level (`h2`, `heading-3`).
    pub fn class_spans() -> Self {
        Self {
            name: DialectKind::ClassSpans.as_str().to_string(),
            scanner: Scanner::Patterns(patterns::class_spans()),
            paragraph_separator: patterns::LINE_BREAKS.clone(),
            normalize: true,
        }
    }

    /// Compile a dialect from user-supplied pattern tables.
    pub fn from_patterns(patterns: &DialectPatterns) -> ValidationResult<Self> {
        let table = patterns.compile()?;
        let paragraph_separator = match patterns.paragraph_separator {
            Some(ref pattern) => patterns::compile(pattern)?,
            None => patterns::LINE_BREAKS.clone(),
        };
        Ok(Self {
            name: DialectKind::Custom.as_str().to_string(),
            scanner: Scanner::Patterns(table),
            paragraph_separator,
            normalize: true,
        })
    }

    /// Build the dialect selected by `kind`.
    ///
    /// `custom` needs a pattern table; the built-in kinds ignore `patterns`.
    pub fn from_kind(kind: DialectKind, patterns: Option<&DialectPatterns>) -> ValidationResult<Self> {
        match kind {
            DialectKind::Html => Ok(Self::html()),
            DialectKind::Markdown => Ok(Self::markdown()),
            DialectKind::BoldHeadings => Ok(Self::bold_headings()),
            DialectKind::ClassSpans => Ok(Self::class_spans()),
            DialectKind::Custom => {
                let patterns = patterns.ok_or(ValidationError::MissingPatterns)?;
                Self::from_patterns(patterns)
            }
        }
    }

    /// Turn markup stripping before word counting on or off.
    #[must_use]
    pub const fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Dialect name (`html`, `markdown`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether markup syntax is stripped before counting.
    pub const fn normalizes(&self) -> bool {
        self.normalize
    }

    /// The regex that separates paragraphs in tag- and pattern-based dialects.
    pub const fn paragraph_separator(&self) -> &Regex {
        &self.paragraph_separator
    }

    /// Paragraph spans of `text`, trimmed, in document order.
    ///
    /// Markdown takes its blocks from the CommonMark parser so a fenced code
    /// block with blank lines inside stays out of the prose. Other dialects
    /// cut on the paragraph separator.
    pub fn paragraph_spans(&self, text: &str) -> Vec<Span> {
        match self.scanner {
            Scanner::Patterns(_) => split_paragraphs(text, &self.paragraph_separator),
            Scanner::CommonMark => commonmark::block_spans(text),
        }
    }

    /// Remove structural syntax from `text`, keeping visible words.
    ///
    /// Returns `text` untouched when normalization is disabled.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !self.normalize {
            return Cow::Borrowed(text);
        }
        match self.scanner {
            Scanner::Patterns(ref table) => table.strip(text),
            Scanner::CommonMark => Cow::Owned(commonmark::visible_text(text)),
        }
    }

    /// Locate heading and link markers, ordered by position.
    pub fn find_markers(&self, text: &str) -> Vec<Marker> {
        let mut markers = match self.scanner {
            Scanner::Patterns(ref table) => table.find_markers(text),
            Scanner::CommonMark => commonmark::find_markers(text),
        };
        markers.sort_by_key(|m| (m.span.start, m.span.end));
        markers
    }
}

impl Default for MarkupDialect {
    fn default() -> Self {
        Self::html()
    }
}

/// Locate heading and link markers in `text` under `dialect`.
#[tracing::instrument(skip_all, fields(text_len = text.len(), dialect = dialect.name()))]
pub fn find_markers(text: &str, dialect: &MarkupDialect) -> Vec<Marker> {
    let markers = dialect.find_markers(text);
    tracing::debug!(count = markers.len(), "markers located");
    markers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headings(markers: &[Marker]) -> Vec<Option<u8>> {
        markers
            .iter()
            .filter(|m| m.is_heading())
            .map(|m| m.level)
            .collect()
    }

    #[test]
    fn html_headings_and_links() {
        let text = "<h2>Intro</h2>\nSee <a href=\"https://x.dev\">docs</a>.\n<h3>More</h3>";
        let markers = find_markers(text, &MarkupDialect::html());
        assert_eq!(headings(&markers), vec![Some(2), Some(3)]);
        assert_eq!(markers.iter().filter(|m| m.is_link()).count(), 1);
        assert_eq!(&text[markers[0].span.start..markers[0].span.end], "<h2>Intro</h2>");
    }

    #[test]
    fn html_unclosed_heading_is_absent() {
        let text = "<h2>Never closed\nBody text.";
        let markers = find_markers(text, &MarkupDialect::html());
        assert!(markers.is_empty());
    }

    #[test]
    fn html_anchor_without_href_is_not_a_link() {
        let markers = find_markers("<a name=\"top\">top</a>", &MarkupDialect::html());
        assert!(markers.is_empty());
    }

    #[test]
    fn markdown_headings_skip_code_blocks() {
        let text = "# Title\n\n```\n## not a heading\n```\n\n## Real\n\nA [link](https://x.dev).";
        let markers = find_markers(text, &MarkupDialect::markdown());
        assert_eq!(headings(&markers), vec![Some(1), Some(2)]);
        let link = markers.iter().find(|m| m.is_link()).unwrap();
        assert_eq!(&text[link.span.start..link.span.end], "[link](https://x.dev)");
    }

    #[test]
    fn bold_lines_are_levelless_headings() {
        let text = "**Getting started**\nThis has **inline bold** inside.\n__Next__";
        let markers = find_markers(text, &MarkupDialect::bold_headings());
        assert_eq!(headings(&markers), vec![None, None]);
    }

    #[test]
    fn class_spans_read_level_from_class() {
        let text = "<span class=\"title h2\">A</span>\n<div class='heading-3'>B</div>";
        let markers = find_markers(text, &MarkupDialect::class_spans());
        assert_eq!(headings(&markers), vec![Some(2), Some(3)]);
    }

    #[test]
    fn swapping_dialects_changes_only_recognition() {
        let text = "<h2>Intro</h2>\n**Intro**";
        let html = find_markers(text, &MarkupDialect::html());
        let bold = find_markers(text, &MarkupDialect::bold_headings());
        assert_eq!(html.len(), 1);
        assert_eq!(bold.len(), 1);
        assert_ne!(html[0].span, bold[0].span);
    }

    #[test]
    fn normalization_strips_tags() {
        let dialect = MarkupDialect::html();
        assert_eq!(dialect.normalize("<b>bold</b> text"), "bold text");
        let raw = dialect.with_normalization(false);
        assert_eq!(raw.normalize("<b>bold</b> text"), "<b>bold</b> text");
    }

    #[test]
    fn block_tags_separate_words() {
        let dialect = MarkupDialect::html();
        let out = dialect.normalize("<td>a</td><td>b</td><br>c<b>d</b>e");
        assert_eq!(out.split_whitespace().collect::<Vec<_>>(), vec!["a", "b", "c", "de"]);
    }

    #[test]
    fn markdown_normalization_keeps_link_text() {
        let dialect = MarkupDialect::markdown();
        let out = dialect.normalize("Read [the guide](https://x.dev/a.html) **now**.");
        assert!(out.contains("the guide"));
        assert!(out.contains("now"));
        assert!(!out.contains("x.dev"));
        assert!(!out.contains("**"));
    }

    #[test]
    fn custom_dialect_requires_patterns() {
        let err = MarkupDialect::from_kind(DialectKind::Custom, None).unwrap_err();
        assert!(matches!(err, ValidationError::MissingPatterns));
    }

    #[test]
    fn custom_dialect_uses_supplied_tables() {
        let patterns = DialectPatterns {
            headings: vec![HeadingPatternSpec {
                pattern: r"(?m)^=(\d)= .+$".to_string(),
                level: None,
                level_group: Some(1),
            }],
            links: vec![r"\{link:[^}]+\}".to_string()],
            ..Default::default()
        };
        let dialect = MarkupDialect::from_kind(DialectKind::Custom, Some(&patterns)).unwrap();
        let markers = find_markers("=2= Setup\nUse {link:docs} here.", &dialect);
        assert_eq!(headings(&markers), vec![Some(2)]);
        assert_eq!(markers.iter().filter(|m| m.is_link()).count(), 1);
    }
}
