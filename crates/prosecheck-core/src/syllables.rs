//! Heuristic English syllable counting.
//!
//! Vowel-group counting with silent-ending adjustments. Not locale-aware and
//! not dictionary-backed; good enough for a readability score.

use std::sync::LazyLock;

use regex::Regex;

/// Silent endings: `-es`/`-e` after a consonant other than `l`, and `-ed`.
static SILENT_ENDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").expect("valid regex"));

/// A leading `y` acts as a consonant.
static LEADING_Y: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^y").expect("valid regex"));

static VOWEL_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[aeiouy]+").expect("valid regex"));

/// Count syllables in a single word. Never returns less than one.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    if word.chars().count() <= 3 {
        return 1;
    }

    let trimmed = SILENT_ENDING.replace(&word, "");
    let trimmed = LEADING_Y.replace(&trimmed, "");
    VOWEL_GROUP.find_iter(&trimmed).count().max(1)
}

/// Sum syllables over `words`, ignoring tokens with no letters.
///
/// Each word is trimmed of leading and trailing non-alphabetic characters
/// first, so `"cat."` and `"(cat)"` both count as `cat`.
pub fn total_syllables<S: AsRef<str>>(words: &[S]) -> usize {
    words
        .iter()
        .map(|w| w.as_ref().trim_matches(|c: char| !c.is_alphabetic()))
        .filter(|w| !w.is_empty())
        .map(count_syllables)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_words_are_one_syllable() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("a"), 1);
    }

    #[test]
    fn empty_word_floors_at_one() {
        assert_eq!(count_syllables(""), 1);
    }

    #[test]
    fn vowel_groups() {
        assert_eq!(count_syllables("hello"), 2);
        assert_eq!(count_syllables("running"), 2);
        assert_eq!(count_syllables("beautiful"), 3);
    }

    #[test]
    fn silent_endings_are_dropped() {
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("jumped"), 1);
        assert_eq!(count_syllables("readable"), 3);
    }

    #[test]
    fn leading_y_is_a_consonant() {
        assert_eq!(count_syllables("yellow"), 2);
    }

    #[test]
    fn case_does_not_matter() {
        assert_eq!(count_syllables("Beautiful"), count_syllables("beautiful"));
    }

    #[test]
    fn total_skips_punctuation_tokens() {
        assert_eq!(total_syllables(&["cat.", "--", "(hello)"]), 3);
    }
}
