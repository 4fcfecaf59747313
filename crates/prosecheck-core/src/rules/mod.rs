//! The rule set.
//!
//! Rules are an ordered, declarative table of independent predicates. Each
//! consumes the tokenizer, recognizer and metric output for one document and
//! yields a pass/fail verdict with a message carrying the measured value.
//! Rules never see each other's results, and degenerate input produces a
//! failing verdict rather than an error.

mod checks;
mod options;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::markup::{Marker, MarkupDialect};
use crate::metrics::Metrics;
use crate::report::RuleVerdict;
use crate::text::Tokens;

pub use options::{
    ConsecutiveStartsOptions, ContentLengthOptions, IntroShapeOptions, LinkDensityOptions,
    ParagraphLengthOptions, PassiveVoiceOptions, ReadabilityOptions, RuleConfig,
    SentenceLengthOptions, SubheadingDistributionOptions, TransitionWordsOptions, ZeroLinkPolicy,
    parse_setting,
};

/// Identifier of a rule in the table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    /// Share of long sentences.
    SentenceLength,
    /// Longest paragraph.
    ParagraphLength,
    /// Longest stretch of text without a heading.
    SubheadingDistribution,
    /// Runs of sentences opening with the same word.
    ConsecutiveSentenceStarts,
    /// Share of passive sentences.
    PassiveVoice,
    /// Share of sentences with a transition.
    TransitionWords,
    /// Flesch Reading Ease score.
    Readability,
    /// Total word count.
    ContentLength,
    /// Sentence count of the introduction.
    IntroShape,
    /// No heading ahead of the introduction.
    NoHeadingBeforeIntro,
    /// Deep headings sit under a shallower one.
    HeadingNesting,
    /// No links in the introduction.
    NoLinksInIntro,
    /// Words per link.
    LinkDensity,
    /// No level-1 heading in the body.
    SingleTopLevelHeading,
}

/// Every rule, in registration order.
pub const ALL_RULES: &[RuleId] = &[
    RuleId::SentenceLength,
    RuleId::ParagraphLength,
    RuleId::SubheadingDistribution,
    RuleId::ConsecutiveSentenceStarts,
    RuleId::PassiveVoice,
    RuleId::TransitionWords,
    RuleId::Readability,
    RuleId::ContentLength,
    RuleId::IntroShape,
    RuleId::NoHeadingBeforeIntro,
    RuleId::HeadingNesting,
    RuleId::NoLinksInIntro,
    RuleId::LinkDensity,
    RuleId::SingleTopLevelHeading,
];

impl RuleId {
    /// The kebab-case identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SentenceLength => "sentence-length",
            Self::ParagraphLength => "paragraph-length",
            Self::SubheadingDistribution => "subheading-distribution",
            Self::ConsecutiveSentenceStarts => "consecutive-sentence-starts",
            Self::PassiveVoice => "passive-voice",
            Self::TransitionWords => "transition-words",
            Self::Readability => "readability",
            Self::ContentLength => "content-length",
            Self::IntroShape => "intro-shape",
            Self::NoHeadingBeforeIntro => "no-heading-before-intro",
            Self::HeadingNesting => "heading-nesting",
            Self::NoLinksInIntro => "no-links-in-intro",
            Self::LinkDensity => "link-density",
            Self::SingleTopLevelHeading => "single-top-level-heading",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        definition(*self).title
    }

    /// Comma-separated list of every rule id, for error messages.
    pub fn available() -> String {
        ALL_RULES
            .iter()
            .map(RuleId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_RULES
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownRule {
                id: s.to_string(),
                available: Self::available(),
            })
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// The raw document.
    pub document: &'a str,
    /// Dialect the document was read under.
    pub dialect: &'a MarkupDialect,
    /// Tokenizer output.
    pub tokens: &'a Tokens,
    /// Recognized markers, ordered by position.
    pub markers: &'a [Marker],
    /// Document metrics.
    pub metrics: &'a Metrics,
    /// Thresholds.
    pub config: &'a RuleConfig,
}

/// Outcome of a single predicate: pass flag and message.
pub type Outcome = (bool, String);

/// One row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct RuleDef {
    /// Rule identifier.
    pub id: RuleId,
    /// Human-readable title.
    pub title: &'static str,
    /// The predicate.
    pub evaluate: fn(&RuleInput<'_>) -> Outcome,
}

/// The rule table, in registration order.
pub const RULE_TABLE: &[RuleDef] = &[
    RuleDef {
        id: RuleId::SentenceLength,
        title: "Sentence length",
        evaluate: checks::sentence_length,
    },
    RuleDef {
        id: RuleId::ParagraphLength,
        title: "Paragraph length",
        evaluate: checks::paragraph_length,
    },
    RuleDef {
        id: RuleId::SubheadingDistribution,
        title: "Subheading distribution",
        evaluate: checks::subheading_distribution,
    },
    RuleDef {
        id: RuleId::ConsecutiveSentenceStarts,
        title: "Consecutive sentence starts",
        evaluate: checks::consecutive_sentence_starts,
    },
    RuleDef {
        id: RuleId::PassiveVoice,
        title: "Passive voice",
        evaluate: checks::passive_voice,
    },
    RuleDef {
        id: RuleId::TransitionWords,
        title: "Transition words",
        evaluate: checks::transition_words,
    },
    RuleDef {
        id: RuleId::Readability,
        title: "Readability",
        evaluate: checks::readability,
    },
    RuleDef {
        id: RuleId::ContentLength,
        title: "Content length",
        evaluate: checks::content_length,
    },
    RuleDef {
        id: RuleId::IntroShape,
        title: "Introduction length",
        evaluate: checks::intro_shape,
    },
    RuleDef {
        id: RuleId::NoHeadingBeforeIntro,
        title: "No heading before introduction",
        evaluate: checks::no_heading_before_intro,
    },
    RuleDef {
        id: RuleId::HeadingNesting,
        title: "Heading nesting",
        evaluate: checks::heading_nesting,
    },
    RuleDef {
        id: RuleId::NoLinksInIntro,
        title: "No links in introduction",
        evaluate: checks::no_links_in_intro,
    },
    RuleDef {
        id: RuleId::LinkDensity,
        title: "Link density",
        evaluate: checks::link_density,
    },
    RuleDef {
        id: RuleId::SingleTopLevelHeading,
        title: "No top-level heading in body",
        evaluate: checks::single_top_level_heading,
    },
];

/// Table row for `id`.
pub fn definition(id: RuleId) -> &'static RuleDef {
    // RULE_TABLE is indexed by discriminant; the table test keeps them aligned.
    &RULE_TABLE[id as usize]
}

/// Run each rule in `registered` against `input`, in order.
#[tracing::instrument(skip_all, fields(rules = registered.len()))]
pub fn evaluate(registered: &[RuleId], input: &RuleInput<'_>) -> Vec<RuleVerdict> {
    registered
        .iter()
        .map(|&id| {
            let (passed, message) = (definition(id).evaluate)(input);
            tracing::debug!(rule = %id, passed, %message, "rule evaluated");
            RuleVerdict {
                rule: id,
                passed,
                message,
            }
        })
        .collect()
}

/// A rule with its effective thresholds, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleSummary {
    /// Rule id.
    pub id: RuleId,
    /// Human-readable title.
    pub title: String,
    /// Whether the rule is registered under the config.
    pub enabled: bool,
    /// Option names and their effective values.
    pub options: BTreeMap<String, String>,
}

/// Describe every rule in table order under `config`.
pub fn describe(config: &RuleConfig) -> ValidationResult<Vec<RuleSummary>> {
    let registered = config.registered()?;
    Ok(ALL_RULES
        .iter()
        .map(|&id| RuleSummary {
            id,
            title: id.title().to_string(),
            enabled: registered.contains(&id),
            options: config
                .options(id)
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        })
        .collect())
}
