//! Rule thresholds.
//!
//! Keys mirror rule ids so a config file reads like the rule table:
//!
//! ```toml
//! [rules]
//! disable = ["content-length"]
//!
//! [rules.sentence-length]
//! max-words = 25
//!
//! [rules.link-density]
//! zero-links = "fail"
//! ```

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{ALL_RULES, RuleId};
use crate::error::{ValidationError, ValidationResult};
use crate::passive_voice::DEFAULT_WINDOW;

/// `sentence-length` thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SentenceLengthOptions {
    /// A sentence with more words than this is long.
    pub max_words: usize,
    /// Highest acceptable share of long sentences, in percent.
    pub max_long_percent: f64,
}

impl Default for SentenceLengthOptions {
    fn default() -> Self {
        Self {
            max_words: 20,
            max_long_percent: 25.0,
        }
    }
}

/// `paragraph-length` thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ParagraphLengthOptions {
    /// Most words a paragraph may hold.
    pub max_words: usize,
}

impl Default for ParagraphLengthOptions {
    fn default() -> Self {
        Self { max_words: 150 }
    }
}

/// `subheading-distribution` thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SubheadingDistributionOptions {
    /// Most words between two headings (or a heading and either end).
    pub max_words: usize,
}

impl Default for SubheadingDistributionOptions {
    fn default() -> Self {
        Self { max_words: 300 }
    }
}

/// `consecutive-sentence-starts` thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConsecutiveStartsOptions {
    /// Longest allowed run of sentences opening with the same word.
    pub max_run: usize,
}

impl Default for ConsecutiveStartsOptions {
    fn default() -> Self {
        Self { max_run: 2 }
    }
}

/// `passive-voice` thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PassiveVoiceOptions {
    /// Highest acceptable share of passive sentences, in percent.
    pub max_percent: f64,
    /// Words after an auxiliary searched for an `-ed` participle.
    pub window: usize,
}

impl Default for PassiveVoiceOptions {
    fn default() -> Self {
        Self {
            max_percent: 20.0,
            window: DEFAULT_WINDOW,
        }
    }
}

/// `transition-words` thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TransitionWordsOptions {
    /// Lowest acceptable share of sentences with a transition, in percent.
    pub min_percent: f64,
    /// Replacement vocabulary. Omit for the built-in list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vec<String>>,
}

impl Default for TransitionWordsOptions {
    fn default() -> Self {
        Self {
            min_percent: 30.0,
            vocabulary: None,
        }
    }
}

/// `readability` thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReadabilityOptions {
    /// Lowest acceptable Flesch Reading Ease score.
    pub min_score: f64,
}

impl Default for ReadabilityOptions {
    fn default() -> Self {
        Self { min_score: 60.0 }
    }
}

/// `content-length` thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ContentLengthOptions {
    /// Fewest words the document may hold.
    pub min_words: usize,
}

impl Default for ContentLengthOptions {
    fn default() -> Self {
        Self { min_words: 450 }
    }
}

/// `intro-shape` thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct IntroShapeOptions {
    /// Fewest sentences in the introduction.
    pub min_sentences: usize,
    /// Most sentences in the introduction.
    pub max_sentences: usize,
}

impl Default for IntroShapeOptions {
    fn default() -> Self {
        Self {
            min_sentences: 3,
            max_sentences: 4,
        }
    }
}

/// Verdict for a document without any links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ZeroLinkPolicy {
    /// No links is fine.
    #[default]
    Pass,
    /// At least one link is required.
    Fail,
}

impl ZeroLinkPolicy {
    /// Returns the policy as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

impl FromStr for ZeroLinkPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass" => Ok(Self::Pass),
            "fail" => Ok(Self::Fail),
            other => Err(format!("expected pass or fail, got '{other}'")),
        }
    }
}

/// `link-density` thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LinkDensityOptions {
    /// Fewest words per link.
    pub words_per_link: f64,
    /// Verdict when there are no links at all.
    pub zero_links: ZeroLinkPolicy,
}

impl Default for LinkDensityOptions {
    fn default() -> Self {
        Self {
            words_per_link: 200.0,
            zero_links: ZeroLinkPolicy::Pass,
        }
    }
}

/// Thresholds for every rule, plus the set of disabled rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuleConfig {
    /// Rule ids to leave out of the report.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disable: Vec<String>,
    /// `sentence-length` thresholds.
    pub sentence_length: SentenceLengthOptions,
    /// `paragraph-length` thresholds.
    pub paragraph_length: ParagraphLengthOptions,
    /// `subheading-distribution` thresholds.
    pub subheading_distribution: SubheadingDistributionOptions,
    /// `consecutive-sentence-starts` thresholds.
    pub consecutive_sentence_starts: ConsecutiveStartsOptions,
    /// `passive-voice` thresholds.
    pub passive_voice: PassiveVoiceOptions,
    /// `transition-words` thresholds.
    pub transition_words: TransitionWordsOptions,
    /// `readability` thresholds.
    pub readability: ReadabilityOptions,
    /// `content-length` thresholds.
    pub content_length: ContentLengthOptions,
    /// `intro-shape` thresholds.
    pub intro_shape: IntroShapeOptions,
    /// `link-density` thresholds.
    pub link_density: LinkDensityOptions,
}

/// Split `rule.option=value` into its key and value.
pub fn parse_setting(setting: &str) -> ValidationResult<(&str, &str)> {
    let (key, value) = setting
        .split_once('=')
        .ok_or_else(|| ValidationError::MalformedSetting(setting.to_string()))?;
    let key = key.trim();
    if key.is_empty() || !key.contains('.') {
        return Err(ValidationError::MalformedSetting(setting.to_string()));
    }
    Ok((key, value.trim()))
}

fn invalid(rule: RuleId, option: &str, reason: impl fmt::Display) -> ValidationError {
    ValidationError::InvalidThreshold {
        rule: rule.as_str().to_string(),
        option: option.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T>(rule: RuleId, option: &str, value: &str) -> ValidationResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .parse()
        .map_err(|e| invalid(rule, option, format!("'{value}': {e}")))
}

fn check_percent(rule: RuleId, option: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(rule, option, format!("{value} is not a percentage in 0-100")))
    }
}

fn check_positive(rule: RuleId, option: &str, value: usize) -> ValidationResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(invalid(rule, option, "must be greater than zero"))
    }
}

impl RuleConfig {
    /// Option names a rule accepts, in display order.
    pub const fn option_names(rule: RuleId) -> &'static [&'static str] {
        match rule {
            RuleId::SentenceLength => &["max-words", "max-long-percent"],
            RuleId::ParagraphLength
            | RuleId::SubheadingDistribution => &["max-words"],
            RuleId::ConsecutiveSentenceStarts => &["max-run"],
            RuleId::PassiveVoice => &["max-percent", "window"],
            RuleId::TransitionWords => &["min-percent", "vocabulary"],
            RuleId::Readability => &["min-score"],
            RuleId::ContentLength => &["min-words"],
            RuleId::IntroShape => &["min-sentences", "max-sentences"],
            RuleId::LinkDensity => &["words-per-link", "zero-links"],
            RuleId::NoHeadingBeforeIntro
            | RuleId::HeadingNesting
            | RuleId::NoLinksInIntro
            | RuleId::SingleTopLevelHeading => &[],
        }
    }

    /// Effective option values for `rule`, as `(name, value)` pairs.
    pub fn options(&self, rule: RuleId) -> Vec<(&'static str, String)> {
        match rule {
            RuleId::SentenceLength => vec![
                ("max-words", self.sentence_length.max_words.to_string()),
                ("max-long-percent", self.sentence_length.max_long_percent.to_string()),
            ],
            RuleId::ParagraphLength => {
                vec![("max-words", self.paragraph_length.max_words.to_string())]
            }
            RuleId::SubheadingDistribution => {
                vec![("max-words", self.subheading_distribution.max_words.to_string())]
            }
            RuleId::ConsecutiveSentenceStarts => {
                vec![("max-run", self.consecutive_sentence_starts.max_run.to_string())]
            }
            RuleId::PassiveVoice => vec![
                ("max-percent", self.passive_voice.max_percent.to_string()),
                ("window", self.passive_voice.window.to_string()),
            ],
            RuleId::TransitionWords => vec![
                ("min-percent", self.transition_words.min_percent.to_string()),
                (
                    "vocabulary",
                    self.transition_words
                        .vocabulary
                        .as_ref()
                        .map_or_else(|| "default".to_string(), |v| format!("{} entries", v.len())),
                ),
            ],
            RuleId::Readability => vec![("min-score", self.readability.min_score.to_string())],
            RuleId::ContentLength => {
                vec![("min-words", self.content_length.min_words.to_string())]
            }
            RuleId::IntroShape => vec![
                ("min-sentences", self.intro_shape.min_sentences.to_string()),
                ("max-sentences", self.intro_shape.max_sentences.to_string()),
            ],
            RuleId::LinkDensity => vec![
                ("words-per-link", self.link_density.words_per_link.to_string()),
                ("zero-links", self.link_density.zero_links.as_str().to_string()),
            ],
            RuleId::NoHeadingBeforeIntro
            | RuleId::HeadingNesting
            | RuleId::NoLinksInIntro
            | RuleId::SingleTopLevelHeading => Vec::new(),
        }
    }

    /// Set one option from its string form.
    ///
    /// `key` is `rule.option`, e.g. `sentence-length.max-words`. The
    /// `transition-words.vocabulary` value is a comma-separated list.
    pub fn set(&mut self, key: &str, value: &str) -> ValidationResult<()> {
        let (rule, option) = key
            .split_once('.')
            .ok_or_else(|| ValidationError::MalformedSetting(format!("{key}={value}")))?;
        let rule: RuleId = rule.parse()?;

        match (rule, option) {
            (RuleId::SentenceLength, "max-words") => {
                self.sentence_length.max_words = parse_value(rule, option, value)?;
            }
            (RuleId::SentenceLength, "max-long-percent") => {
                self.sentence_length.max_long_percent = parse_value(rule, option, value)?;
            }
            (RuleId::ParagraphLength, "max-words") => {
                self.paragraph_length.max_words = parse_value(rule, option, value)?;
            }
            (RuleId::SubheadingDistribution, "max-words") => {
                self.subheading_distribution.max_words = parse_value(rule, option, value)?;
            }
            (RuleId::ConsecutiveSentenceStarts, "max-run") => {
                self.consecutive_sentence_starts.max_run = parse_value(rule, option, value)?;
            }
            (RuleId::PassiveVoice, "max-percent") => {
                self.passive_voice.max_percent = parse_value(rule, option, value)?;
            }
            (RuleId::PassiveVoice, "window") => {
                self.passive_voice.window = parse_value(rule, option, value)?;
            }
            (RuleId::TransitionWords, "min-percent") => {
                self.transition_words.min_percent = parse_value(rule, option, value)?;
            }
            (RuleId::TransitionWords, "vocabulary") => {
                self.transition_words.vocabulary = Some(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|w| !w.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            }
            (RuleId::Readability, "min-score") => {
                self.readability.min_score = parse_value(rule, option, value)?;
            }
            (RuleId::ContentLength, "min-words") => {
                self.content_length.min_words = parse_value(rule, option, value)?;
            }
            (RuleId::IntroShape, "min-sentences") => {
                self.intro_shape.min_sentences = parse_value(rule, option, value)?;
            }
            (RuleId::IntroShape, "max-sentences") => {
                self.intro_shape.max_sentences = parse_value(rule, option, value)?;
            }
            (RuleId::LinkDensity, "words-per-link") => {
                self.link_density.words_per_link = parse_value(rule, option, value)?;
            }
            (RuleId::LinkDensity, "zero-links") => {
                self.link_density.zero_links = parse_value(rule, option, value)?;
            }
            _ => {
                let names = Self::option_names(rule);
                return Err(ValidationError::UnknownOption {
                    rule: rule.as_str().to_string(),
                    option: option.to_string(),
                    available: if names.is_empty() {
                        "(rule has no options)".to_string()
                    } else {
                        names.join(", ")
                    },
                });
            }
        }

        tracing::debug!(rule = %rule, option, value, "rule option set");
        Ok(())
    }

    /// Apply a `rule.option=value` setting.
    pub fn apply_setting(&mut self, setting: &str) -> ValidationResult<()> {
        let (key, value) = parse_setting(setting)?;
        self.set(key, value)
    }

    /// Reject thresholds no document could be meaningfully checked against.
    pub fn validate_thresholds(&self) -> ValidationResult<()> {
        use RuleId as R;

        for id in &self.disable {
            id.parse::<RuleId>()?;
        }

        check_positive(R::SentenceLength, "max-words", self.sentence_length.max_words)?;
        check_percent(
            R::SentenceLength,
            "max-long-percent",
            self.sentence_length.max_long_percent,
        )?;
        check_positive(R::ParagraphLength, "max-words", self.paragraph_length.max_words)?;
        check_positive(
            R::SubheadingDistribution,
            "max-words",
            self.subheading_distribution.max_words,
        )?;
        check_positive(
            R::ConsecutiveSentenceStarts,
            "max-run",
            self.consecutive_sentence_starts.max_run,
        )?;
        check_percent(R::PassiveVoice, "max-percent", self.passive_voice.max_percent)?;
        check_positive(R::PassiveVoice, "window", self.passive_voice.window)?;
        check_percent(R::TransitionWords, "min-percent", self.transition_words.min_percent)?;

        if !self.readability.min_score.is_finite() {
            return Err(invalid(R::Readability, "min-score", "must be a finite number"));
        }

        let intro = &self.intro_shape;
        if intro.min_sentences > intro.max_sentences {
            return Err(invalid(
                R::IntroShape,
                "min-sentences",
                format!(
                    "min-sentences ({}) exceeds max-sentences ({})",
                    intro.min_sentences, intro.max_sentences
                ),
            ));
        }

        let wpl = self.link_density.words_per_link;
        if !wpl.is_finite() || wpl <= 0.0 {
            return Err(invalid(R::LinkDensity, "words-per-link", "must be a finite number above zero"));
        }

        Ok(())
    }

    /// Rules that take part in validation, in registration order.
    pub fn registered(&self) -> ValidationResult<Vec<RuleId>> {
        let disabled = self
            .disable
            .iter()
            .map(|id| id.parse::<RuleId>())
            .collect::<ValidationResult<Vec<_>>>()?;
        Ok(ALL_RULES
            .iter()
            .copied()
            .filter(|id| !disabled.contains(id))
            .collect())
    }
}
