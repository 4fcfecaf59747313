//! Rule predicates.

use super::options::ZeroLinkPolicy;
use super::{Outcome, RuleInput};
use crate::metrics::LinkDensity;
use crate::text::{Paragraph, split_words};

const NO_SENTENCES: &str = "no sentences found";
const NO_PARAGRAPHS: &str = "no paragraphs found";
const NO_WORDS: &str = "no words found";

fn fail(message: &str) -> Outcome {
    (false, message.to_string())
}

fn percent(ratio: f64) -> f64 {
    ratio * 100.0
}

/// The first paragraph, or the failing outcome for a document without one.
fn introduction<'a>(input: &RuleInput<'a>) -> Result<&'a Paragraph, Outcome> {
    input.tokens.introduction().ok_or_else(|| fail(NO_PARAGRAPHS))
}

pub(super) fn sentence_length(input: &RuleInput<'_>) -> Outcome {
    let sentences = &input.tokens.sentences;
    if sentences.is_empty() {
        return fail(NO_SENTENCES);
    }
    let opts = &input.config.sentence_length;
    let long = sentences
        .iter()
        .filter(|s| s.word_count > opts.max_words)
        .count();
    let pct = percent(long as f64 / sentences.len() as f64);
    (
        pct <= opts.max_long_percent,
        format!(
            "{pct:.1}% of sentences exceed {} words ({long} of {}; limit {}%)",
            opts.max_words,
            sentences.len(),
            opts.max_long_percent
        ),
    )
}

pub(super) fn paragraph_length(input: &RuleInput<'_>) -> Outcome {
    let paragraphs = &input.tokens.paragraphs;
    let Some(longest) = paragraphs.iter().map(|p| p.word_count).max() else {
        return fail(NO_PARAGRAPHS);
    };
    let max = input.config.paragraph_length.max_words;
    let over = paragraphs.iter().filter(|p| p.word_count > max).count();
    if over == 0 {
        (true, format!("longest paragraph has {longest} words (limit {max})"))
    } else {
        (
            false,
            format!("{over} paragraph(s) exceed {max} words; longest has {longest}"),
        )
    }
}

/// Sections are built from the tokenized paragraphs, so their word counts
/// add up the same way as the document's. A paragraph that a heading cuts
/// through is counted piece by piece; heading text belongs to no section.
pub(super) fn subheading_distribution(input: &RuleInput<'_>) -> Outcome {
    if input.metrics.word_count == 0 {
        return fail(NO_WORDS);
    }

    let count = |start: usize, end: usize| {
        split_words(&input.dialect.normalize(&input.document[start..end])).len()
    };

    let mut headings = input.markers.iter().filter(|m| m.is_heading()).peekable();
    let mut sections = vec![0usize];
    let mut covered = 0;
    for paragraph in &input.tokens.paragraphs {
        let span = paragraph.span;
        let mut cursor = span.start.max(covered);
        let mut words = 0;
        while let Some(heading) = headings.next_if(|h| h.span.start < span.end) {
            if heading.span.start > cursor {
                words += count(cursor, heading.span.start);
            }
            if let Some(last) = sections.last_mut() {
                *last += words;
            }
            words = 0;
            sections.push(0);
            cursor = cursor.max(heading.span.end);
            covered = covered.max(heading.span.end);
        }
        words += if cursor == span.start {
            paragraph.word_count
        } else if cursor < span.end {
            count(cursor, span.end)
        } else {
            0
        };
        if let Some(last) = sections.last_mut() {
            *last += words;
        }
    }

    let longest = sections.into_iter().max().unwrap_or(0);
    let max = input.config.subheading_distribution.max_words;
    (
        longest <= max,
        format!("longest section without a heading has {longest} words (limit {max})"),
    )
}

pub(super) fn consecutive_sentence_starts(input: &RuleInput<'_>) -> Outcome {
    let sentences = &input.tokens.sentences;
    if sentences.is_empty() {
        return fail(NO_SENTENCES);
    }

    let mut longest: (usize, &str) = (0, "");
    let mut run: (usize, &str) = (0, "");
    for sentence in sentences {
        let word = sentence.first_word.as_str();
        if word.is_empty() {
            run = (0, "");
            continue;
        }
        run = if run.0 > 0 && run.1 == word {
            (run.0 + 1, word)
        } else {
            (1, word)
        };
        if run.0 > longest.0 {
            longest = run;
        }
    }

    let max = input.config.consecutive_sentence_starts.max_run;
    let (length, word) = longest;
    if length > max {
        (
            false,
            format!("{length} consecutive sentences start with \"{word}\" (limit {max})"),
        )
    } else {
        (
            true,
            format!("longest run of sentences with the same first word is {length} (limit {max})"),
        )
    }
}

pub(super) fn passive_voice(input: &RuleInput<'_>) -> Outcome {
    let Some(ratio) = input.metrics.passive_sentence_ratio else {
        return fail(NO_SENTENCES);
    };
    let max = input.config.passive_voice.max_percent;
    let pct = percent(ratio);
    (
        pct <= max,
        format!("{pct:.1}% of sentences use passive voice (limit {max}%)"),
    )
}

pub(super) fn transition_words(input: &RuleInput<'_>) -> Outcome {
    let Some(ratio) = input.metrics.transition_sentence_ratio else {
        return fail(NO_SENTENCES);
    };
    let min = input.config.transition_words.min_percent;
    let pct = percent(ratio);
    (
        pct >= min,
        format!("{pct:.1}% of sentences contain a transition (minimum {min}%)"),
    )
}

pub(super) fn readability(input: &RuleInput<'_>) -> Outcome {
    let Some(score) = input.metrics.readability_score else {
        return fail(NO_SENTENCES);
    };
    let min = input.config.readability.min_score;
    (
        score >= min,
        format!("Flesch Reading Ease score is {score:.1} (minimum {min})"),
    )
}

pub(super) fn content_length(input: &RuleInput<'_>) -> Outcome {
    let words = input.metrics.word_count;
    let min = input.config.content_length.min_words;
    (words >= min, format!("{words} words (minimum {min})"))
}

pub(super) fn intro_shape(input: &RuleInput<'_>) -> Outcome {
    let intro = match introduction(input) {
        Ok(intro) => intro,
        Err(outcome) => return outcome,
    };
    let starts_with_heading = input
        .markers
        .iter()
        .any(|m| m.is_heading() && m.span.start <= intro.span.start);
    if starts_with_heading {
        return fail("introduction absent: the document begins with a heading");
    }

    let opts = &input.config.intro_shape;
    let n = intro.sentence_count;
    (
        (opts.min_sentences..=opts.max_sentences).contains(&n),
        format!(
            "introduction has {n} sentence(s) (expected {}-{})",
            opts.min_sentences, opts.max_sentences
        ),
    )
}

pub(super) fn no_heading_before_intro(input: &RuleInput<'_>) -> Outcome {
    let intro = match introduction(input) {
        Ok(intro) => intro,
        Err(outcome) => return outcome,
    };
    match input
        .markers
        .iter()
        .find(|m| m.is_heading() && m.span.start < intro.span.end)
    {
        Some(heading) => (
            false,
            format!(
                "heading at byte {} comes before the end of the introduction",
                heading.span.start
            ),
        ),
        None => (true, "introduction precedes every heading".to_string()),
    }
}

pub(super) fn heading_nesting(input: &RuleInput<'_>) -> Outcome {
    let mut seen = [false; 7];
    let mut checked = 0usize;

    for heading in input.markers.iter().filter(|m| m.is_heading()) {
        let Some(level) = heading.level else {
            continue;
        };
        let level = usize::from(level).min(6);
        checked += 1;
        if level >= 3 && !seen[2..level].iter().any(|&s| s) {
            return (
                false,
                format!(
                    "h{level} at byte {} has no preceding heading between h2 and h{}",
                    heading.span.start,
                    level - 1
                ),
            );
        }
        seen[level] = true;
        // A shallower heading closes every deeper section under the previous one.
        seen[level + 1..].fill(false);
    }

    (true, format!("{checked} leveled heading(s) nested correctly"))
}

pub(super) fn no_links_in_intro(input: &RuleInput<'_>) -> Outcome {
    let intro = match introduction(input) {
        Ok(intro) => intro,
        Err(outcome) => return outcome,
    };
    let links = input
        .markers
        .iter()
        .filter(|m| m.is_link() && intro.span.contains(m.span.start))
        .count();
    if links == 0 {
        (true, "no links in the introduction".to_string())
    } else {
        (false, format!("{links} link(s) in the introduction"))
    }
}

pub(super) fn link_density(input: &RuleInput<'_>) -> Outcome {
    if input.metrics.word_count == 0 {
        return fail(NO_WORDS);
    }
    let opts = &input.config.link_density;
    match input.metrics.link_density {
        LinkDensity::NoLinks => match opts.zero_links {
            ZeroLinkPolicy::Pass => (true, "no links".to_string()),
            ZeroLinkPolicy::Fail => fail("no links found"),
        },
        LinkDensity::WordsPerLink(density) => (
            density >= opts.words_per_link,
            format!(
                "{density:.1} words per link across {} link(s) (minimum {})",
                input.metrics.link_count, opts.words_per_link
            ),
        ),
    }
}

pub(super) fn single_top_level_heading(input: &RuleInput<'_>) -> Outcome {
    let top = input
        .markers
        .iter()
        .filter(|m| m.is_heading() && m.level == Some(1))
        .count();
    if top == 0 {
        (true, "no level-1 headings in the body".to_string())
    } else {
        (
            false,
            format!("{top} level-1 heading(s) in the body; the title belongs outside it"),
        )
    }
}
