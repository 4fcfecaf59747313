//! Report aggregation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::metrics::Metrics;
use crate::rules::RuleId;

/// Verdict of a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleVerdict {
    /// The rule that produced the verdict.
    pub rule: RuleId,
    /// Whether the document satisfies the rule.
    pub passed: bool,
    /// Explanation carrying the measured value.
    pub message: String,
}

/// One verdict per registered rule, in registration order, plus the metrics
/// they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    /// Verdicts in registration order.
    pub verdicts: Vec<RuleVerdict>,
    /// Metrics the verdicts were computed from.
    pub metrics: Metrics,
}

impl ValidationReport {
    /// The verdict for `rule`, if it was registered.
    pub fn get(&self, rule: RuleId) -> Option<&RuleVerdict> {
        self.verdicts.iter().find(|v| v.rule == rule)
    }

    /// Verdicts in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, RuleVerdict> {
        self.verdicts.iter()
    }

    /// Number of verdicts.
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    /// Returns `true` when no rule was registered.
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// `true` only if every verdict passed.
    pub fn passed(&self) -> bool {
        self.verdicts.iter().all(|v| v.passed)
    }

    /// Verdicts that failed, in registration order.
    pub fn failures(&self) -> impl Iterator<Item = &RuleVerdict> {
        self.verdicts.iter().filter(|v| !v.passed)
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a RuleVerdict;
    type IntoIter = std::slice::Iter<'a, RuleVerdict>;

    fn into_iter(self) -> Self::IntoIter {
        self.verdicts.iter()
    }
}

/// Combine `verdicts` into a report ordered by `registered`.
///
/// Fails when a registered rule has no verdict, has more than one, or a
/// verdict names a rule that was not registered. A report is never
/// partially populated.
pub fn aggregate(
    registered: &[RuleId],
    verdicts: Vec<RuleVerdict>,
    metrics: Metrics,
) -> ValidationResult<ValidationReport> {
    let mut slots: Vec<Option<RuleVerdict>> = vec![None; registered.len()];

    for verdict in verdicts {
        let Some(index) = registered.iter().position(|&id| id == verdict.rule) else {
            return Err(ValidationError::IncompleteReport(format!(
                "verdict for unregistered rule {}",
                verdict.rule
            )));
        };
        if slots[index].is_some() {
            return Err(ValidationError::IncompleteReport(format!(
                "duplicate verdict for {}",
                verdict.rule
            )));
        }
        slots[index] = Some(verdict);
    }

    let verdicts = slots
        .into_iter()
        .zip(registered)
        .map(|(slot, id)| {
            slot.ok_or_else(|| ValidationError::IncompleteReport(format!("no verdict for {id}")))
        })
        .collect::<ValidationResult<Vec<_>>>()?;

    Ok(ValidationReport { verdicts, metrics })
}
