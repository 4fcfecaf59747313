//! Error types for prosecheck-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised at validation-call time.
///
/// Degenerate documents never produce these; they are reported as failing
/// verdicts instead. Only configuration faults and internal invariant
/// violations surface here.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A rule identifier that is not part of the rule table.
    #[error("unknown rule: {id}. Use: {available}")]
    UnknownRule {
        /// The rule id that was requested.
        id: String,
        /// Comma-separated list of known rule ids.
        available: String,
    },

    /// An option name the rule does not recognize.
    #[error("unknown option for {rule}: {option}. Use: {available}")]
    UnknownOption {
        /// The rule the option was addressed to.
        rule: String,
        /// The option that was requested.
        option: String,
        /// Comma-separated list of options the rule accepts.
        available: String,
    },

    /// A threshold value outside its valid range or not parseable.
    #[error("invalid threshold {rule}.{option}: {reason}")]
    InvalidThreshold {
        /// The rule the threshold belongs to.
        rule: String,
        /// The option name.
        option: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An override was not written as `rule.option=value`.
    #[error("malformed setting '{0}': expected rule.option=value")]
    MalformedSetting(String),

    /// A user-supplied dialect pattern failed to compile or is out of range.
    #[error("invalid dialect pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern text.
        pattern: String,
        /// Why the pattern was rejected.
        reason: String,
    },

    /// The `custom` dialect was selected without a pattern table.
    #[error("dialect 'custom' requires a `patterns` table in the configuration")]
    MissingPatterns,

    /// The transition vocabulary could not be compiled into a matcher.
    #[error("invalid transition vocabulary: {0}")]
    InvalidVocabulary(String),

    /// The aggregator received verdicts that do not match the registered rules.
    #[error("incomplete report: {0}")]
    IncompleteReport(String),
}

/// Result type alias using [`ValidationError`].
pub type ValidationResult<T> = Result<T, ValidationError>;
