//! Passive voice detection.
//!
//! A heuristic, not a parser: a sentence reads as passive when a form of "be"
//! is followed within a few words by a word ending in `-ed`. Irregular
//! participles ("was written") are missed and predicate adjectives
//! ("is red") are over-reported.

use crate::text::{Sentence, clean_word};

/// Auxiliary verbs that introduce passive constructions.
///
/// "has been" and "have been" are covered by `been`.
const PASSIVE_AUXILIARIES: &[&str] = &["is", "was", "were", "be", "been", "being"];

/// Default number of words after the auxiliary searched for a participle.
pub const DEFAULT_WINDOW: usize = 3;

/// A word ending in `-ed` with at least one letter before the suffix.
fn is_regular_participle(word: &str) -> bool {
    word.len() > 2 && word.ends_with("ed")
}

/// Returns `true` if `sentence` contains an auxiliary + `-ed` construction
/// within `window` words.
pub fn is_passive(sentence: &str, window: usize) -> bool {
    let words: Vec<String> = sentence.split_whitespace().map(clean_word).collect();

    words.iter().enumerate().any(|(i, word)| {
        PASSIVE_AUXILIARIES.contains(&word.as_str())
            && words
                .iter()
                .skip(i + 1)
                .take(window)
                .any(|w| is_regular_participle(w))
    })
}

/// Fraction (0.0-1.0) of `sentences` that read as passive.
///
/// Returns `None` when there are no sentences.
#[tracing::instrument(skip_all, fields(sentences = sentences.len(), window))]
pub fn passive_voice_ratio(sentences: &[Sentence], window: usize) -> Option<f64> {
    if sentences.is_empty() {
        return None;
    }
    let passive = sentences
        .iter()
        .filter(|s| is_passive(&s.text, window))
        .count();
    tracing::debug!(passive, "passive sentences");
    Some(passive as f64 / sentences.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupDialect;
    use crate::text::tokenize;

    fn sentences(text: &str) -> Vec<Sentence> {
        tokenize(text, &MarkupDialect::html()).sentences
    }

    #[test]
    fn detects_simple_passive() {
        assert!(is_passive("The report was reviewed by the team", DEFAULT_WINDOW));
    }

    #[test]
    fn participle_within_window() {
        assert!(is_passive("It was very carefully tested", DEFAULT_WINDOW));
        assert!(!is_passive("It was not at all very carefully tested", DEFAULT_WINDOW));
    }

    #[test]
    fn has_been_is_covered() {
        assert!(is_passive("The bug has been fixed", DEFAULT_WINDOW));
    }

    #[test]
    fn irregular_participles_are_missed() {
        assert!(!is_passive("The report was written by Alice", DEFAULT_WINDOW));
    }

    #[test]
    fn active_sentence_is_not_passive() {
        assert!(!is_passive("The team reviewed the report", DEFAULT_WINDOW));
    }

    #[test]
    fn ratio_calculation() {
        let s = sentences("The code was tested. The team celebrated. The bug was fixed. We ship.");
        let ratio = passive_voice_ratio(&s, DEFAULT_WINDOW).unwrap();
        assert!((ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn no_sentences_is_undefined() {
        assert_eq!(passive_voice_ratio(&[], DEFAULT_WINDOW), None);
    }
}
