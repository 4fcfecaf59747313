//! Transition word detection.
//!
//! Vocabulary entries are matched case-insensitively and must stand as whole
//! words: "so" matches in "So it goes" but not in "also".

use aho_corasick::{AhoCorasick, MatchKind};

use crate::error::{ValidationError, ValidationResult};
use crate::text::Sentence;

/// Default transition vocabulary, single words and multi-word phrases.
pub const DEFAULT_TRANSITIONS: &[&str] = &[
    "additionally",
    "after",
    "also",
    "although",
    "and",
    "as",
    "because",
    "before",
    "besides",
    "but",
    "consequently",
    "conversely",
    "finally",
    "for example",
    "for instance",
    "furthermore",
    "hence",
    "however",
    "in addition",
    "in conclusion",
    "in contrast",
    "in fact",
    "indeed",
    "instead",
    "likewise",
    "meanwhile",
    "moreover",
    "nevertheless",
    "next",
    "nonetheless",
    "on the contrary",
    "on the other hand",
    "otherwise",
    "similarly",
    "so",
    "subsequently",
    "then",
    "therefore",
    "thus",
    "ultimately",
    "whereas",
    "while",
    "yet",
];

/// Compiled matcher over a transition vocabulary.
#[derive(Debug, Clone)]
pub struct TransitionMatcher {
    automaton: AhoCorasick,
}

impl TransitionMatcher {
    /// Build a matcher from `vocabulary`. Blank entries are rejected.
    pub fn new<S: AsRef<str>>(vocabulary: &[S]) -> ValidationResult<Self> {
        let mut entries = Vec::with_capacity(vocabulary.len());
        for entry in vocabulary {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                return Err(ValidationError::InvalidVocabulary(
                    "vocabulary entries must not be blank".to_string(),
                ));
            }
            entries.push(entry);
        }

        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&entries)
            .map_err(|e| ValidationError::InvalidVocabulary(e.to_string()))?;

        Ok(Self { automaton })
    }

    /// Matcher over [`DEFAULT_TRANSITIONS`].
    pub fn default_vocabulary() -> ValidationResult<Self> {
        Self::new(DEFAULT_TRANSITIONS)
    }

    /// Returns `true` if any vocabulary entry occurs in `text` as whole words.
    pub fn contains_transition(&self, text: &str) -> bool {
        self.automaton.find_overlapping_iter(text).any(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
    }
}

/// Fraction (0.0-1.0) of `sentences` containing at least one transition.
///
/// Returns `None` when there are no sentences.
#[tracing::instrument(skip_all, fields(sentences = sentences.len()))]
pub fn transition_word_ratio(sentences: &[Sentence], matcher: &TransitionMatcher) -> Option<f64> {
    if sentences.is_empty() {
        return None;
    }
    let with = sentences
        .iter()
        .filter(|s| matcher.contains_transition(&s.text))
        .count();
    tracing::debug!(with, "sentences with transitions");
    Some(with as f64 / sentences.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupDialect;
    use crate::text::tokenize;

    fn matcher() -> TransitionMatcher {
        TransitionMatcher::default_vocabulary().unwrap()
    }

    #[test]
    fn default_vocabulary_size() {
        assert_eq!(DEFAULT_TRANSITIONS.len(), 43);
    }

    #[test]
    fn matches_whole_words_only() {
        let m = matcher();
        assert!(m.contains_transition("So it goes"));
        assert!(!m.contains_transition("Salsa dancing is fun"));
        assert!(!m.contains_transition("Nextcloud syncs files"));
    }

    #[test]
    fn matches_phrases_case_insensitively() {
        let m = matcher();
        assert!(m.contains_transition("On The Other Hand, it rained"));
        assert!(m.contains_transition("It rained, for example"));
    }

    #[test]
    fn overlapping_entries_still_find_a_boundary_match() {
        // "as" inside "ask" fails the boundary check; the standalone "as" passes.
        let m = TransitionMatcher::new(&["as"]).unwrap();
        assert!(m.contains_transition("ask as needed"));
        assert!(!m.contains_transition("ask away"));
    }

    #[test]
    fn custom_vocabulary() {
        let m = TransitionMatcher::new(&["to be sure"]).unwrap();
        assert!(m.contains_transition("To be sure, it works"));
        assert!(!m.contains_transition("However it works"));
    }

    #[test]
    fn blank_entries_are_rejected() {
        let err = TransitionMatcher::new(&["however", "  "]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVocabulary(_)));
    }

    #[test]
    fn ratio_counts_sentences_not_matches() {
        let sentences = tokenize(
            "However, thus and so. Plain words here. More plain words. Then done.",
            &MarkupDialect::html(),
        )
        .sentences;
        let ratio = transition_word_ratio(&sentences, &matcher()).unwrap();
        assert!((ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn no_sentences_is_undefined() {
        assert_eq!(transition_word_ratio(&[], &matcher()), None);
    }
}
