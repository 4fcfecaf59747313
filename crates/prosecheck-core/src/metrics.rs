//! Document-level metrics computed once per validation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::markup::Marker;
use crate::passive_voice::passive_voice_ratio;
use crate::readability::flesch_reading_ease;
use crate::syllables::total_syllables;
use crate::text::Tokens;
use crate::transitions::{TransitionMatcher, transition_word_ratio};

/// Words per link, or the absence of links.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum LinkDensity {
    /// The document has no link markers.
    NoLinks,
    /// `word_count / link_count`.
    WordsPerLink(f64),
}

impl LinkDensity {
    /// Density for `words` and `links`.
    pub fn new(words: usize, links: usize) -> Self {
        if links == 0 {
            Self::NoLinks
        } else {
            Self::WordsPerLink(words as f64 / links as f64)
        }
    }
}

/// Numeric measurements the rules are evaluated against.
///
/// Ratios are fractions in 0.0-1.0; `None` means undefined (no sentences).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Metrics {
    /// Total words.
    pub word_count: usize,
    /// Total sentences.
    pub sentence_count: usize,
    /// Total syllables.
    pub syllable_count: usize,
    /// Flesch Reading Ease score.
    pub readability_score: Option<f64>,
    /// Fraction of sentences read as passive.
    pub passive_sentence_ratio: Option<f64>,
    /// Fraction of sentences containing a transition.
    pub transition_sentence_ratio: Option<f64>,
    /// Number of link markers.
    pub link_count: usize,
    /// Words per link.
    pub link_density: LinkDensity,
}

impl Metrics {
    /// Compute metrics from tokenizer and recognizer output.
    #[tracing::instrument(skip_all, fields(words = tokens.word_count()))]
    pub fn compute(
        tokens: &Tokens,
        markers: &[Marker],
        passive_window: usize,
        transitions: &TransitionMatcher,
    ) -> Self {
        let word_count = tokens.word_count();
        let sentence_count = tokens.sentence_count();
        let syllable_count = total_syllables(&tokens.words);
        let link_count = markers.iter().filter(|m| m.is_link()).count();

        Self {
            word_count,
            sentence_count,
            syllable_count,
            readability_score: flesch_reading_ease(word_count, sentence_count, syllable_count),
            passive_sentence_ratio: passive_voice_ratio(&tokens.sentences, passive_window),
            transition_sentence_ratio: transition_word_ratio(&tokens.sentences, transitions),
            link_count,
            link_density: LinkDensity::new(word_count, link_count),
        }
    }
}
