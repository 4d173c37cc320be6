//! Validation report types produced by suite replay.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::outcome::ResultDetail;
use super::suite::ExpectationDefinition;

/// One replayed definition merged with its fresh evaluation.
///
/// Definition fields come first, then the flattened result fields; the fresh
/// result owns `success` and every other outcome field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    /// The replayed expectation name.
    pub expectation_type: String,
    /// The recorded arguments, exactly as stored in the suite.
    pub kwargs: Map<String, Value>,
    /// The fresh evaluation outcome.
    #[serde(flatten)]
    pub outcome: ResultDetail,
    /// The error kind, when the evaluator failed instead of producing an
    /// outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationRecord {
    /// Merges a definition with its fresh outcome.
    pub fn new(definition: &ExpectationDefinition, outcome: ResultDetail) -> Self {
        Self {
            expectation_type: definition.expectation_type.clone(),
            kwargs: definition.kwargs.clone(),
            outcome,
            error: None,
        }
    }

    /// Builds the failure record for an evaluator that errored: `success:
    /// false` plus the error kind.
    pub fn failed(definition: &ExpectationDefinition, error_kind: &str) -> Self {
        Self {
            expectation_type: definition.expectation_type.clone(),
            kwargs: definition.kwargs.clone(),
            outcome: ResultDetail {
                success: false,
                ..ResultDetail::default()
            },
            error: Some(error_kind.to_string()),
        }
    }

    /// Whether this record passed.
    pub fn success(&self) -> bool {
        self.outcome.success
    }
}

/// Aggregate counts over a validation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationMetrics {
    /// Definitions replayed.
    pub evaluated: usize,
    /// Records with `success: true`.
    pub passed: usize,
    /// Records with `success: false`, including evaluator failures.
    pub failed: usize,
}

impl ValidationMetrics {
    /// The passing fraction, 1.0 for an empty report.
    pub fn success_rate(&self) -> f64 {
        if self.evaluated == 0 {
            1.0
        } else {
            self.passed as f64 / self.evaluated as f64
        }
    }
}

/// The full outcome of replaying a suite: one record per stored definition,
/// in stored order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Per-definition records, in the suite's stored order.
    pub results: Vec<ValidationRecord>,
}

impl ValidationReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: ValidationRecord) {
        self.results.push(record);
    }

    /// True when every record passed.
    pub fn success(&self) -> bool {
        self.results.iter().all(ValidationRecord::success)
    }

    /// The records that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ValidationRecord> {
        self.results.iter().filter(|r| !r.success())
    }

    /// Derived pass/fail counts.
    pub fn metrics(&self) -> ValidationMetrics {
        let passed = self.results.iter().filter(|r| r.success()).count();
        ValidationMetrics {
            evaluated: self.results.len(),
            passed,
            failed: self.results.len() - passed,
        }
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
