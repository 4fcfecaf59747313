//! Readability scoring using Flesch Reading Ease.
//!
//! Formula: `206.835 - 1.015 * (words/sentences) - 84.6 * (syllables/words)`
//!
//! Higher score = easier to read. Plain English lands around 60-70.

/// Compute the Flesch Reading Ease score.
///
/// Returns `None` when `words` or `sentences` is zero; the score is
/// undefined there rather than infinite.
pub fn flesch_reading_ease(words: usize, sentences: usize, syllables: usize) -> Option<f64> {
    if words == 0 || sentences == 0 {
        return None;
    }

    let words_per_sentence = words as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words as f64;
    Some(1.015f64.mul_add(-words_per_sentence, 84.6f64.mul_add(-syllables_per_word, 206.835)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_score() {
        let score = flesch_reading_ease(100, 5, 150).unwrap();
        assert!((score - 59.635).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn simple_text_scores_high() {
        let score = flesch_reading_ease(12, 2, 12).unwrap();
        assert!(score > 100.0);
    }

    #[test]
    fn zero_denominators_are_undefined() {
        assert_eq!(flesch_reading_ease(0, 5, 0), None);
        assert_eq!(flesch_reading_ease(10, 0, 12), None);
    }
}
