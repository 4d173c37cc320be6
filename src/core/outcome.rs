//! Outcome model shared by every expectation: verbosity levels, the internal
//! evaluation records, and the externally returned result shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

/// How much detail an expectation call returns.
///
/// Every check accepts an optional format override; when absent, the owning
/// dataset's [`ExpectationDefaults`](crate::dataset::ExpectationDefaults)
/// decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputFormat {
    /// A bare success boolean.
    BooleanOnly,
    /// Success plus the exception list (map) or the true value (aggregate).
    Basic,
    /// Basic plus element/considered counts and exception indexes.
    Complete,
    /// Basic plus a summary mapping of counts and fractions.
    Summary,
}

impl OutputFormat {
    /// The wire name of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BooleanOnly => "BOOLEAN_ONLY",
            Self::Basic => "BASIC",
            Self::Complete => "COMPLETE",
            Self::Summary => "SUMMARY",
        }
    }

    /// Parses a wire name, degrading to [`OutputFormat::Basic`] with a
    /// warning on anything unrecognized.
    ///
    /// Replayed configurations may carry format strings written by other
    /// tools; a typo there should weaken the output, not fail the run.
    pub fn parse_lenient(name: &str) -> Self {
        match name {
            "BOOLEAN_ONLY" => Self::BooleanOnly,
            "BASIC" => Self::Basic,
            "COMPLETE" => Self::Complete,
            "SUMMARY" => Self::Summary,
            other => {
                warn!(output_format = %other, "Unknown output format, defaulting to BASIC");
                Self::Basic
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal record of one map-protocol evaluation. Never serialized; the
/// renderer shapes it into a [`RenderedResult`].
#[derive(Debug, Clone)]
pub(crate) struct MapEvaluation {
    pub success: bool,
    /// Total rows in the column, nulls included.
    pub element_count: usize,
    /// Rows the predicate was judged on (the threshold denominator).
    pub considered_count: usize,
    /// Null rows in the column.
    pub missing_count: usize,
    /// `(original_index, value)` pairs for rows that failed the predicate.
    pub exceptions: Vec<(usize, Value)>,
}

/// The outcome an aggregate or table-shape evaluator reports back to the
/// engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutcome {
    /// Whether the check passed.
    pub success: bool,
    /// The computed statistic, if one exists for this check.
    pub true_value: Option<Value>,
    /// Evaluator-supplied summary fields, merged with counts in SUMMARY mode.
    pub summary: Option<Map<String, Value>>,
}

impl AggregateOutcome {
    /// Creates an outcome with a computed statistic.
    pub fn new(success: bool, true_value: impl Into<Value>) -> Self {
        Self {
            success,
            true_value: Some(true_value.into()),
            summary: None,
        }
    }

    /// Creates an outcome carrying only a success flag.
    pub fn flag(success: bool) -> Self {
        Self {
            success,
            true_value: None,
            summary: None,
        }
    }

    /// Attaches evaluator-specific summary fields.
    pub fn with_summary(mut self, summary: Map<String, Value>) -> Self {
        self.summary = Some(summary);
        self
    }
}

/// What an expectation call returns to its caller.
///
/// `BOOLEAN_ONLY` collapses to a bare boolean; every other format carries a
/// [`ResultDetail`] whose optional fields realize the requested verbosity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenderedResult {
    /// The `BOOLEAN_ONLY` shape.
    BooleanOnly(bool),
    /// The `BASIC`, `COMPLETE`, and `SUMMARY` shapes.
    Detailed(ResultDetail),
}

impl RenderedResult {
    /// The success flag, regardless of shape.
    pub fn success(&self) -> bool {
        match self {
            Self::BooleanOnly(s) => *s,
            Self::Detailed(detail) => detail.success,
        }
    }

    /// The detailed fields, when the format produced any.
    pub fn detail(&self) -> Option<&ResultDetail> {
        match self {
            Self::BooleanOnly(_) => None,
            Self::Detailed(detail) => Some(detail),
        }
    }

    /// Consumes the result into its detailed form, upgrading a bare boolean
    /// to a detail carrying only the success flag.
    pub fn into_detail(self) -> ResultDetail {
        match self {
            Self::BooleanOnly(success) => ResultDetail {
                success,
                ..ResultDetail::default()
            },
            Self::Detailed(detail) => detail,
        }
    }
}

/// The field union of every non-boolean result shape.
///
/// Which optional fields are populated depends on the output format and on
/// whether the expectation was a map, aggregate, or table-shape check.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultDetail {
    /// Whether the check passed.
    pub success: bool,
    /// Failing values, in column order (map checks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_list: Option<Vec<Value>>,
    /// Original row indexes of the failing values (COMPLETE map checks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_index_list: Option<Vec<usize>>,
    /// Total rows in the column (COMPLETE).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_count: Option<usize>,
    /// Rows the predicate was judged on (COMPLETE map checks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub considered_count: Option<usize>,
    /// Null rows in the column (COMPLETE aggregate checks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_count: Option<usize>,
    /// The computed statistic (aggregate and table-shape checks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_value: Option<Value>,
    /// Counts, fractions, and evaluator-specific fields (SUMMARY).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Map<String, Value>>,
}
