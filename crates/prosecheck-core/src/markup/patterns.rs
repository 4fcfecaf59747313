//! Regex pattern tables for tag- and emphasis-based dialects.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Marker;
use crate::error::{ValidationError, ValidationResult};
use crate::text::Span;

/// One or more line breaks, `<br>` or a closing `</p>`.
pub(super) static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\r?\n|<br\s*/?>|</p\s*>)+").expect("valid regex")
});

/// Two or more line breaks, allowing whitespace-only lines in between.
pub(super) static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n[ \t]*){2,}").expect("valid regex"));

/// `<h1>`..`<h6>` with a matching closing tag. One regex per level because the
/// regex crate has no backreferences.
static HTML_HEADINGS: LazyLock<Vec<(Regex, u8)>> = LazyLock::new(|| {
    (1..=6u8)
        .map(|level| {
            let re = Regex::new(&format!(r"(?is)<h{level}\b[^>]*>.*?</h{level}\s*>"))
                .expect("valid regex");
            (re, level)
        })
        .collect()
});

/// `<a ... href="...">...</a>`; anchors without `href` or a closing tag are ignored.
static HTML_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?\bhref\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)[^>]*>.*?</a\s*>"#)
        .expect("valid regex")
});

/// Inline markdown link `[text](target)`.
static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]\n]+)\]\([^)\s]+(?:\s+[^)]*)?\)").expect("valid regex"));

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("valid regex"));

/// Opening or closing block-level tags and `<br>`; these separate words.
static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)</?(?:address|article|aside|blockquote|br|caption|dd|div|dl|dt|figcaption|figure|footer|h[1-6]|header|hr|li|main|nav|ol|p|pre|section|table|tbody|td|tfoot|th|thead|tr|ul)\b[^<>]*>",
    )
    .expect("valid regex")
});

/// Strip rules shared by the tag-based dialects: block tags become a space,
/// any other tag disappears so inline markup never splits a word.
fn tag_strip() -> [(Regex, String); 2] {
    [
        (BLOCK_TAG.clone(), " ".to_string()),
        (HTML_TAG.clone(), String::new()),
    ]
}

static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*|__").expect("valid regex"));

/// A line holding nothing but bold text, optionally followed by a colon.
static BOLD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:\*\*[^*\n]+\*\*|__[^_\n]+__)[ \t]*:?[ \t]*\r?$").expect("valid regex")
});

static STRONG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*<strong>[^<\n]+</strong>[ \t]*:?[ \t]*\r?$").expect("valid regex")
});

static B_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*<b>[^<\n]+</b>[ \t]*:?[ \t]*\r?$").expect("valid regex")
});

/// `<span|div|p class="... h2 ...">` or `class="heading-2"`; level is group 1.
static CLASS_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<(?:span|div|p)\b[^>]*?\bclass\s*=\s*["'][^"']*?\b(?:h|heading-?)([1-6])\b[^"']*["'][^>]*>.*?</(?:span|div|p)\s*>"#,
    )
    .expect("valid regex")
});

/// Where a heading pattern gets its level from.
#[derive(Debug, Clone, Copy)]
enum LevelSource {
    Fixed(u8),
    Capture(usize),
    Unknown,
}

#[derive(Debug, Clone)]
struct HeadingPattern {
    regex: Regex,
    level: LevelSource,
}

/// Compiled pattern table for one dialect.
#[derive(Debug, Clone, Default)]
pub(super) struct PatternTable {
    headings: Vec<HeadingPattern>,
    links: Vec<Regex>,
    strip: Vec<(Regex, String)>,
}

impl PatternTable {
    pub(super) fn find_markers(&self, text: &str) -> Vec<Marker> {
        let mut markers = Vec::new();

        for pattern in &self.headings {
            for caps in pattern.regex.captures_iter(text) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let level = match pattern.level {
                    LevelSource::Fixed(level) => Some(level),
                    LevelSource::Capture(group) => caps
                        .get(group)
                        .and_then(|m| m.as_str().parse::<u8>().ok())
                        .filter(|level| (1..=6).contains(level)),
                    LevelSource::Unknown => None,
                };
                markers.push(Marker::heading(Span::new(whole.start(), whole.end()), level));
            }
        }

        for link in &self.links {
            for m in link.find_iter(text) {
                markers.push(Marker::link(Span::new(m.start(), m.end())));
            }
        }

        markers
    }

    /// Apply the strip table in order.
    pub(super) fn strip<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(text);
        for (regex, replacement) in &self.strip {
            let replaced = match regex.replace_all(&out, replacement.as_str()) {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(s) = replaced {
                out = Cow::Owned(s);
            }
        }
        out
    }
}

pub(super) fn html() -> PatternTable {
    PatternTable {
        headings: HTML_HEADINGS
            .iter()
            .map(|(regex, level)| HeadingPattern {
                regex: regex.clone(),
                level: LevelSource::Fixed(*level),
            })
            .collect(),
        links: vec![HTML_LINK.clone()],
        strip: tag_strip().into(),
    }
}

pub(super) fn bold_headings() -> PatternTable {
    PatternTable {
        headings: [&BOLD_LINE, &STRONG_LINE, &B_LINE]
            .into_iter()
            .map(|regex| HeadingPattern {
                regex: Regex::clone(regex),
                level: LevelSource::Unknown,
            })
            .collect(),
        links: vec![MARKDOWN_LINK.clone(), HTML_LINK.clone()],
        strip: std::iter::once((MARKDOWN_LINK.clone(), "${1}".to_string()))
            .chain(tag_strip())
            .chain([(EMPHASIS.clone(), String::new())])
            .collect(),
    }
}

pub(super) fn class_spans() -> PatternTable {
    PatternTable {
        headings: vec![HeadingPattern {
            regex: CLASS_HEADING.clone(),
            level: LevelSource::Capture(1),
        }],
        links: vec![HTML_LINK.clone()],
        strip: tag_strip().into(),
    }
}

pub(super) fn compile(pattern: &str) -> ValidationResult<Regex> {
    Regex::new(pattern).map_err(|e| ValidationError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// User-defined pattern tables for the `custom` dialect.
///
/// ```toml
/// dialect = "custom"
///
/// [[patterns.headings]]
/// pattern = '(?m)^=(\d)= .+$'
/// level_group = 1
///
/// [patterns]
/// links = ['\{link:[^}]+\}']
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct DialectPatterns {
    /// Heading patterns, each with an optional level.
    pub headings: Vec<HeadingPatternSpec>,
    /// Link patterns.
    pub links: Vec<String>,
    /// Replacements applied, in order, to strip markup before word counting.
    pub strip: Vec<StripPatternSpec>,
    /// Paragraph separator regex (default: line breaks, `<br>`, `</p>`).
    pub paragraph_separator: Option<String>,
}

/// A heading pattern in a custom dialect.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct HeadingPatternSpec {
    /// Regex matching the whole heading construct.
    pub pattern: String,
    /// Fixed level (1-6) for every match.
    pub level: Option<u8>,
    /// Capture group holding the level digit.
    pub level_group: Option<usize>,
}

/// A strip replacement in a custom dialect.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct StripPatternSpec {
    /// Regex to replace.
    pub pattern: String,
    /// Replacement text; `${1}` keeps a capture group.
    pub replace: String,
}

impl DialectPatterns {
    pub(super) fn compile(&self) -> ValidationResult<PatternTable> {
        let mut headings = Vec::with_capacity(self.headings.len());
        for spec in &self.headings {
            let regex = compile(&spec.pattern)?;
            let level = match (spec.level, spec.level_group) {
                (Some(_), Some(_)) => {
                    return Err(ValidationError::InvalidPattern {
                        pattern: spec.pattern.clone(),
                        reason: "set either level or level_group, not both".to_string(),
                    });
                }
                (Some(level), None) if !(1..=6).contains(&level) => {
                    return Err(ValidationError::InvalidPattern {
                        pattern: spec.pattern.clone(),
                        reason: format!("heading level {level} is outside 1-6"),
                    });
                }
                (Some(level), None) => LevelSource::Fixed(level),
                (None, Some(group)) if group >= regex.captures_len() => {
                    return Err(ValidationError::InvalidPattern {
                        pattern: spec.pattern.clone(),
                        reason: format!("capture group {group} does not exist"),
                    });
                }
                (None, Some(group)) => LevelSource::Capture(group),
                (None, None) => LevelSource::Unknown,
            };
            headings.push(HeadingPattern { regex, level });
        }

        let links = self
            .links
            .iter()
            .map(|p| compile(p))
            .collect::<ValidationResult<Vec<_>>>()?;

        let strip = self
            .strip
            .iter()
            .map(|s| Ok((compile(&s.pattern)?, s.replace.clone())))
            .collect::<ValidationResult<Vec<_>>>()?;

        Ok(PatternTable {
            headings,
            links,
            strip,
        })
    }
}
