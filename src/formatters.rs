//! Rendering validation reports for people and pipelines.
//!
//! # Examples
//!
//! ```rust
//! use datavow::formatters::{HumanFormatter, JsonFormatter, ReportFormatter};
//! use datavow::core::ValidationReport;
//!
//! let report = ValidationReport::new();
//! let json = JsonFormatter::pretty().format(&report).unwrap();
//! let text = HumanFormatter::new().format(&report).unwrap();
//! assert!(json.contains("results"));
//! assert!(text.contains("expectations"));
//! ```

use std::fmt::Write;

use crate::core::{ValidationRecord, ValidationReport};
use crate::error::Result;

/// Options for the human-readable formatter.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include passing records, not just failures.
    pub show_passing: bool,
    /// Maximum number of failing records to print; `None` prints all.
    pub max_failures: Option<usize>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            show_passing: false,
            max_failures: None,
        }
    }
}

impl FormatterConfig {
    /// Shows every record, passing included.
    pub fn detailed() -> Self {
        Self {
            show_passing: true,
            max_failures: None,
        }
    }

    /// Caps failure output, for CI logs.
    pub fn ci() -> Self {
        Self {
            show_passing: false,
            max_failures: Some(50),
        }
    }
}

/// Converts a validation report into a string representation.
pub trait ReportFormatter {
    /// Formats the report.
    fn format(&self, report: &ValidationReport) -> Result<String>;
}

/// Machine-readable JSON output, in the report's serialized shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Compact single-line JSON.
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Indented JSON.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

/// Line-oriented text output for terminals.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Failures-only output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Output governed by the given configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn describe(record: &ValidationRecord) -> String {
        let column = record
            .kwargs
            .get("column")
            .and_then(|v| v.as_str())
            .map(|c| format!(" [{c}]"))
            .unwrap_or_default();
        match &record.error {
            Some(kind) => format!("{}{column}: error ({kind})", record.expectation_type),
            None => {
                let status = if record.success() { "ok" } else { "failed" };
                let mut line = format!("{}{column}: {status}", record.expectation_type);
                if let Some(true_value) = &record.outcome.true_value {
                    let _ = write!(line, " (true_value: {true_value})");
                } else if let Some(exceptions) = &record.outcome.exception_list {
                    if !exceptions.is_empty() {
                        let _ = write!(line, " ({} exceptions)", exceptions.len());
                    }
                }
                line
            }
        }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        let metrics = report.metrics();
        let mut output = format!(
            "{} of {} expectations passed\n",
            metrics.passed, metrics.evaluated
        );

        let mut printed_failures = 0;
        for record in &report.results {
            let is_failure = !record.success();
            if !is_failure && !self.config.show_passing {
                continue;
            }
            if is_failure {
                if let Some(max) = self.config.max_failures {
                    if printed_failures >= max {
                        continue;
                    }
                }
                printed_failures += 1;
            }
            let marker = if is_failure { "✗" } else { "✓" };
            let _ = writeln!(output, "  {marker} {}", Self::describe(record));
        }

        if let Some(max) = self.config.max_failures {
            let total_failures = metrics.failed;
            if total_failures > max {
                let _ = writeln!(output, "  ... and {} more failures", total_failures - max);
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExpectationDefinition, ResultDetail};
    use serde_json::{json, Map};

    fn report() -> ValidationReport {
        let mut kwargs = Map::new();
        kwargs.insert("column".to_string(), json!("age"));
        let definition = ExpectationDefinition::new("expect_column_values_to_not_be_null", kwargs);

        let mut report = ValidationReport::new();
        report.push(ValidationRecord::new(
            &definition,
            ResultDetail {
                success: true,
                exception_list: Some(vec![]),
                ..ResultDetail::default()
            },
        ));
        report.push(ValidationRecord::new(
            &definition,
            ResultDetail {
                success: false,
                exception_list: Some(vec![json!(null), json!(null)]),
                ..ResultDetail::default()
            },
        ));
        report.push(ValidationRecord::failed(&definition, "missing_column"));
        report
    }

    #[test]
    fn test_json_formatter_round_trips() {
        let report = report();
        let json = JsonFormatter::compact().format(&report).unwrap();
        let parsed: ValidationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_human_formatter_failures_only() {
        let output = HumanFormatter::new().format(&report()).unwrap();
        assert!(output.starts_with("1 of 3 expectations passed"));
        assert!(output.contains("✗"));
        assert!(!output.contains("✓"));
        assert!(output.contains("error (missing_column)"));
        assert!(output.contains("(2 exceptions)"));
    }

    #[test]
    fn test_human_formatter_detailed_shows_passing() {
        let output = HumanFormatter::with_config(FormatterConfig::detailed())
            .format(&report())
            .unwrap();
        assert!(output.contains("✓"));
        assert!(output.contains("[age]"));
    }
}
