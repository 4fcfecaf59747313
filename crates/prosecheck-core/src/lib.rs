//! Core library for prosecheck.
//!
//! A writing-style rule engine: documents go in, a report with one verdict
//! per registered rule comes out. The pipeline is
//! tokenize ([`text`]) → locate markers ([`markup`]) → compute metrics once
//! ([`metrics`]) → evaluate rules ([`rules`]) → aggregate ([`report`]).
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`markup`] - Markup dialects and heading/link markers
//! - [`text`] - Paragraph, sentence and word segmentation
//! - [`metrics`] - Document-level measurements
//! - [`rules`] - The rule table and per-rule thresholds
//! - [`report`] - Verdicts and their aggregation
//! - [`overrides`] - Path-scoped configuration overrides
//!
//! # Quick Start
//!
//! ```
//! use prosecheck_core::{MarkupDialect, RuleConfig, validate};
//!
//! let doc = "<h1>Title</h1>\nA short intro. It has two sentences.";
//! let report = validate(doc, &MarkupDialect::html(), &RuleConfig::default())
//!     .expect("default thresholds are valid");
//!
//! for verdict in &report {
//!     println!("{}: {}", verdict.rule, verdict.message);
//! }
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod markup;
pub mod metrics;
pub mod overrides;
pub mod passive_voice;
pub mod readability;
pub mod report;
pub mod rules;
pub mod syllables;
pub mod text;
pub mod transitions;
pub mod validate;

pub use config::{Config, ConfigLoader, DialectKind, LogLevel};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationResult};
pub use markup::{Marker, MarkerKind, MarkupDialect, find_markers};
pub use metrics::{LinkDensity, Metrics};
pub use passive_voice::passive_voice_ratio;
pub use readability::flesch_reading_ease;
pub use report::{RuleVerdict, ValidationReport, aggregate};
pub use rules::{ALL_RULES, RuleConfig, RuleId};
pub use syllables::count_syllables;
pub use text::{Tokens, tokenize};
pub use transitions::transition_word_ratio;
pub use validate::{measure, validate};

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
