//! Path-scoped overrides.
//!
//! Matches file paths against configured glob overrides and accumulates
//! their settings. When several overrides match, all contribute. Conflicts
//! (the same option or the dialect set by more than one override) are
//! resolved by specificity: the pattern with more literal (non-wildcard)
//! path segments wins. Ties go to the earlier override.

use std::collections::BTreeMap;

use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};

use crate::config::DialectKind;
use crate::error::ValidationResult;
use crate::rules::RuleConfig;

/// A path-scoped override.
///
/// ```toml
/// [[overrides]]
/// paths = ["docs/**/*.md"]
/// dialect = "markdown"
///
/// [overrides.set]
/// "content-length.min-words" = 300
/// "transition-words.vocabulary" = ["however", "therefore"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Override {
    /// Glob patterns, relative to the project root.
    pub paths: Vec<String>,
    /// Dialect for matching files.
    pub dialect: Option<DialectKind>,
    /// Markup stripping for matching files.
    pub normalize: Option<bool>,
    /// `rule.option` keys and their values.
    pub set: BTreeMap<String, serde_json::Value>,
}

/// Settings that apply to one path after resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedOverride {
    /// Winning dialect, if any override set one.
    pub dialect: Option<DialectKind>,
    /// Winning normalization flag, if any override set one.
    pub normalize: Option<bool>,
    /// `(key, value)` pairs in application order; later entries win.
    pub settings: Vec<(String, String)>,
}

impl ResolvedOverride {
    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.dialect.is_none() && self.normalize.is_none() && self.settings.is_empty()
    }

    /// Apply the rule settings to `config`.
    pub fn apply(&self, config: &mut RuleConfig) -> ValidationResult<()> {
        for (key, value) in &self.settings {
            config.set(key, value)?;
        }
        Ok(())
    }
}

/// Compiled overrides for efficient matching.
pub struct OverrideSet {
    compiled: Vec<CompiledOverride>,
}

/// A single override with pre-compiled glob matchers.
struct CompiledOverride {
    matchers: Vec<(GlobMatcher, usize)>, // (matcher, specificity)
    source: Override,
}

/// Count literal (non-wildcard) path segments in a glob pattern.
///
/// `docs/guides/*.md` → 2 (`docs`, `guides`)
/// `docs/**/*.md` → 1 (`docs`)
/// `**/*.md` → 0
fn specificity(pattern: &str) -> usize {
    pattern
        .split('/')
        .filter(|seg| !seg.contains('*') && !seg.contains('?') && !seg.contains('['))
        .count()
}

/// String form of a setting value as [`RuleConfig::set`] expects it.
fn value_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(value_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

impl OverrideSet {
    /// Compile a list of overrides into an `OverrideSet`.
    ///
    /// Invalid glob patterns are skipped with a tracing warning.
    pub fn compile(overrides: &[Override]) -> Self {
        let compiled = overrides
            .iter()
            .filter_map(|source| {
                let matchers: Vec<(GlobMatcher, usize)> = source
                    .paths
                    .iter()
                    .filter_map(|pattern| match Glob::new(pattern) {
                        Ok(glob) => Some((glob.compile_matcher(), specificity(pattern))),
                        Err(e) => {
                            tracing::warn!(pattern, error = %e, "skipping invalid glob pattern");
                            None
                        }
                    })
                    .collect();
                if matchers.is_empty() {
                    None
                } else {
                    Some(CompiledOverride {
                        matchers,
                        source: source.clone(),
                    })
                }
            })
            .collect();
        Self { compiled }
    }

    /// Resolve the overrides that apply to `file_path`.
    pub fn resolve(&self, file_path: &str) -> ResolvedOverride {
        let mut matched: Vec<(usize, usize, &Override)> = self
            .compiled
            .iter()
            .enumerate()
            .filter_map(|(index, o)| {
                o.matchers
                    .iter()
                    .filter(|(m, _)| m.is_match(file_path))
                    .map(|(_, s)| *s)
                    .max()
                    .map(|spec| (spec, index, &o.source))
            })
            .collect();

        // Apply least specific first; among equals, later overrides first so
        // the earlier one is applied last and wins.
        matched.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut result = ResolvedOverride::default();
        for (spec, index, o) in matched {
            tracing::debug!(file_path, index, specificity = spec, "override matched");
            if o.dialect.is_some() {
                result.dialect = o.dialect;
            }
            if o.normalize.is_some() {
                result.normalize = o.normalize;
            }
            result
                .settings
                .extend(o.set.iter().map(|(k, v)| (k.clone(), value_string(v))));
        }
        result
    }
}
