//! Tokenization into paragraphs, sentences and words.
//!
//! Paragraphs are cut from the raw document so their spans point back into
//! it (on the dialect's separator, or on CommonMark blocks for markdown). Each paragraph is then normalized under the active dialect before
//! sentence and word splitting, so markup syntax never counts as words
//! (unless normalization is turned off).

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::markup::MarkupDialect;

/// One or more sentence terminators.
static TERMINATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Byte offsets `[start, end)` into the document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Create a span.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for a zero-length span.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `offset` lies within the span.
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// A sentence, after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Sentence {
    /// Sentence text with whitespace runs collapsed, terminator removed.
    pub text: String,
    /// Number of whitespace-separated words.
    pub word_count: usize,
    /// First word, lowercased, surrounding punctuation trimmed. May be empty.
    pub first_word: String,
    /// Index of the paragraph the sentence belongs to.
    pub paragraph: usize,
}

/// A paragraph of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Paragraph {
    /// Location in the raw document, surrounding whitespace excluded.
    pub span: Span,
    /// Words after normalization.
    pub word_count: usize,
    /// Sentences after normalization.
    pub sentence_count: usize,
}

/// Tokenizer output for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tokens {
    /// Sentences in document order.
    pub sentences: Vec<Sentence>,
    /// Every word in document order.
    pub words: Vec<String>,
    /// Paragraphs in document order; the first is the introduction.
    pub paragraphs: Vec<Paragraph>,
}

impl Tokens {
    /// Total number of words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Total number of sentences.
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// The introduction paragraph, if the document has any paragraph.
    pub fn introduction(&self) -> Option<&Paragraph> {
        self.paragraphs.first()
    }
}

/// Split `text` into paragraphs, sentences and words under `dialect`.
#[tracing::instrument(skip_all, fields(text_len = text.len(), dialect = dialect.name()))]
pub fn tokenize(text: &str, dialect: &MarkupDialect) -> Tokens {
    let mut tokens = Tokens::default();

    for span in dialect.paragraph_spans(text) {
        let normalized = dialect.normalize(&text[span.start..span.end]);
        let words = split_words(&normalized);
        if words.is_empty() {
            continue;
        }

        let index = tokens.paragraphs.len();
        let sentences = split_sentences(&normalized);
        tokens.paragraphs.push(Paragraph {
            span,
            word_count: words.len(),
            sentence_count: sentences.len(),
        });

        for sentence in sentences {
            let words = split_words(sentence);
            tokens.sentences.push(Sentence {
                text: words.join(" "),
                word_count: words.len(),
                first_word: words.first().map(|w| clean_word(w)).unwrap_or_default(),
                paragraph: index,
            });
        }
        tokens.words.extend(words.into_iter().map(str::to_string));
    }

    tracing::debug!(
        paragraphs = tokens.paragraphs.len(),
        sentences = tokens.sentences.len(),
        words = tokens.words.len(),
        "tokenized"
    );
    tokens
}

/// Paragraph spans: the gaps between `separator` matches, trimmed, blanks dropped.
pub fn split_paragraphs(text: &str, separator: &Regex) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut push = |start: usize, end: usize| {
        let slice = &text[start..end];
        let trimmed = slice.trim_start();
        let lead = slice.len() - trimmed.len();
        let trimmed = trimmed.trim_end();
        if !trimmed.is_empty() {
            spans.push(Span::new(start + lead, start + lead + trimmed.len()));
        }
    };

    let mut last = 0;
    for m in separator.find_iter(text) {
        push(last, m.start());
        last = m.end();
    }
    push(last, text.len());

    spans
}

/// Cut on runs of `.`, `!`, `?`; trimmed, pieces without words dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    TERMINATORS
        .split(text)
        .map(str::trim)
        .filter(|s| s.split_whitespace().next().is_some())
        .collect()
}

/// Whitespace-separated words.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Lowercase `word` and trim punctuation, keeping inner apostrophes and hyphens.
pub(crate) fn clean_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
        .trim_matches(|c: char| c == '\'' || c == '-')
        .to_lowercase()
}
