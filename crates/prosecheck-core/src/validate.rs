//! Validation entry points.
//!
//! [`validate`] runs tokenizer and marker recognizer over the document,
//! computes metrics once, evaluates every registered rule and aggregates the
//! verdicts. [`measure`] stops after the metrics.

use crate::error::ValidationResult;
use crate::markup::{MarkupDialect, find_markers};
use crate::metrics::Metrics;
use crate::report::{ValidationReport, aggregate};
use crate::rules::{self, RuleConfig, RuleInput};
use crate::text::tokenize;
use crate::transitions::TransitionMatcher;

/// Validate `document` under `dialect` against `config`.
///
/// Configuration faults (unknown rule ids, out-of-range thresholds, a blank
/// transition vocabulary entry) are reported as errors before any work is
/// done. Degenerate documents never error; they produce failing verdicts.
#[tracing::instrument(skip_all, fields(text_len = document.len(), dialect = dialect.name()))]
pub fn validate(
    document: &str,
    dialect: &MarkupDialect,
    config: &RuleConfig,
) -> ValidationResult<ValidationReport> {
    config.validate_thresholds()?;
    let registered = config.registered()?;
    let transitions = transition_matcher(config)?;

    let tokens = tokenize(document, dialect);
    let markers = find_markers(document, dialect);
    let metrics = Metrics::compute(
        &tokens,
        &markers,
        config.passive_voice.window,
        &transitions,
    );

    let input = RuleInput {
        document,
        dialect,
        tokens: &tokens,
        markers: &markers,
        metrics: &metrics,
        config,
    };
    let verdicts = rules::evaluate(&registered, &input);
    let report = aggregate(&registered, verdicts, metrics)?;

    tracing::info!(
        rules = report.len(),
        failed = report.failures().count(),
        "validation complete"
    );
    Ok(report)
}

/// Compute the metrics for `document` without evaluating rules.
///
/// Only the passive-voice window and transition vocabulary of `config` are
/// consulted.
#[tracing::instrument(skip_all, fields(text_len = document.len(), dialect = dialect.name()))]
pub fn measure(
    document: &str,
    dialect: &MarkupDialect,
    config: &RuleConfig,
) -> ValidationResult<Metrics> {
    config.validate_thresholds()?;
    let transitions = transition_matcher(config)?;
    let tokens = tokenize(document, dialect);
    let markers = find_markers(document, dialect);
    Ok(Metrics::compute(
        &tokens,
        &markers,
        config.passive_voice.window,
        &transitions,
    ))
}

fn transition_matcher(config: &RuleConfig) -> ValidationResult<TransitionMatcher> {
    match config.transition_words.vocabulary {
        Some(ref vocabulary) => TransitionMatcher::new(vocabulary.as_slice()),
        None => TransitionMatcher::default_vocabulary(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::rules::{ALL_RULES, RuleId};

    fn sample() -> String {
        let intro = "Writing guides help teams. They set shared rules. However, rules need care.";
        let body = "Short sentences read well. Therefore, we keep them short. \
                    Next, we add headings. Also, we link sources.";
        format!("{intro}\n<h2>Details</h2>\n{body}\n<h3>More</h3>\n{body}")
    }

    #[test]
    fn one_verdict_per_rule_in_order() {
        let report = validate(&sample(), &MarkupDialect::html(), &RuleConfig::default()).unwrap();
        let order: Vec<_> = report.iter().map(|v| v.rule).collect();
        assert_eq!(order, ALL_RULES);
    }

    #[test]
    fn identical_inputs_yield_identical_reports() {
        let dialect = MarkupDialect::html();
        let config = RuleConfig::default();
        let a = validate(&sample(), &dialect, &config).unwrap();
        let b = validate(&sample(), &dialect, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_document_fails_without_panicking() {
        let report = validate("", &MarkupDialect::html(), &RuleConfig::default()).unwrap();
        assert_eq!(report.len(), ALL_RULES.len());
        assert!(!report.passed());
        assert_eq!(
            report.get(RuleId::Readability).unwrap().message,
            "no sentences found"
        );
        assert!(report.get(RuleId::HeadingNesting).unwrap().passed);
    }

    #[test]
    fn structural_rules_on_sample() {
        let report = validate(&sample(), &MarkupDialect::html(), &RuleConfig::default()).unwrap();
        assert!(report.get(RuleId::IntroShape).unwrap().passed);
        assert!(report.get(RuleId::NoHeadingBeforeIntro).unwrap().passed);
        assert!(report.get(RuleId::HeadingNesting).unwrap().passed);
        assert!(report.get(RuleId::SingleTopLevelHeading).unwrap().passed);
        assert!(!report.get(RuleId::ContentLength).unwrap().passed);
    }

    #[test]
    fn disabled_rules_are_absent() {
        let mut config = RuleConfig::default();
        config.disable = vec!["content-length".to_string()];
        let report = validate(&sample(), &MarkupDialect::html(), &config).unwrap();
        assert_eq!(report.len(), ALL_RULES.len() - 1);
        assert!(report.get(RuleId::ContentLength).is_none());
    }

    #[test]
    fn invalid_thresholds_are_rejected_up_front() {
        let mut config = RuleConfig::default();
        config.readability.min_score = f64::INFINITY;
        let err = validate(&sample(), &MarkupDialect::html(), &config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidThreshold { .. }));
    }

    #[test]
    fn blank_vocabulary_entry_is_rejected() {
        let mut config = RuleConfig::default();
        config.transition_words.vocabulary = Some(vec![String::new()]);
        let err = validate(&sample(), &MarkupDialect::html(), &config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVocabulary(_)));
    }

    #[test]
    fn dialect_swap_changes_structure_not_api() {
        let md = "Intro one. Intro two. Intro three.\n\n## Section\n\nBody text here.";
        let report = validate(md, &MarkupDialect::markdown(), &RuleConfig::default()).unwrap();
        assert!(report.get(RuleId::NoHeadingBeforeIntro).unwrap().passed);
        assert!(report.get(RuleId::IntroShape).unwrap().passed);
    }

    #[test]
    fn measure_matches_report_metrics() {
        let dialect = MarkupDialect::html();
        let config = RuleConfig::default();
        let report = validate(&sample(), &dialect, &config).unwrap();
        let metrics = measure(&sample(), &dialect, &config).unwrap();
        assert_eq!(report.metrics, metrics);
    }
}
