//! Output formatting: shapes internal evaluations into the externally
//! returned result forms.
//!
//! Rendering is kept apart from evaluation so the replay engine can force a
//! richer format without touching evaluator logic.

use serde_json::{json, Map, Value};

use super::outcome::{AggregateOutcome, MapEvaluation, OutputFormat, RenderedResult, ResultDetail};

fn fraction(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Renders a map-protocol evaluation at the requested verbosity.
pub(crate) fn map_output(format: OutputFormat, eval: &MapEvaluation) -> RenderedResult {
    if format == OutputFormat::BooleanOnly {
        return RenderedResult::BooleanOnly(eval.success);
    }

    let exception_list: Vec<Value> = eval.exceptions.iter().map(|(_, v)| v.clone()).collect();
    let mut detail = ResultDetail {
        success: eval.success,
        exception_list: Some(exception_list),
        ..ResultDetail::default()
    };

    match format {
        OutputFormat::Complete => {
            detail.exception_index_list =
                Some(eval.exceptions.iter().map(|(idx, _)| *idx).collect());
            detail.element_count = Some(eval.element_count);
            detail.considered_count = Some(eval.considered_count);
        }
        OutputFormat::Summary => {
            let exception_count = eval.exceptions.len();
            let mut summary = Map::new();
            summary.insert("element_count".to_string(), json!(eval.element_count));
            summary.insert("missing_count".to_string(), json!(eval.missing_count));
            summary.insert(
                "missing_fraction".to_string(),
                json!(fraction(eval.missing_count, eval.element_count)),
            );
            summary.insert("exception_count".to_string(), json!(exception_count));
            summary.insert(
                "exception_fraction".to_string(),
                json!(fraction(exception_count, eval.considered_count)),
            );
            detail.summary = Some(summary);
        }
        OutputFormat::Basic | OutputFormat::BooleanOnly => {}
    }

    RenderedResult::Detailed(detail)
}

/// Renders an aggregate evaluation at the requested verbosity.
///
/// In SUMMARY mode the engine's counts are merged into the evaluator-supplied
/// summary; engine fields win on collision so evaluators cannot misreport
/// them.
pub(crate) fn aggregate_output(
    format: OutputFormat,
    outcome: AggregateOutcome,
    element_count: usize,
    missing_count: usize,
) -> RenderedResult {
    if format == OutputFormat::BooleanOnly {
        return RenderedResult::BooleanOnly(outcome.success);
    }

    let mut detail = ResultDetail {
        success: outcome.success,
        true_value: Some(outcome.true_value.unwrap_or(Value::Null)),
        ..ResultDetail::default()
    };

    match format {
        OutputFormat::Complete => {
            detail.element_count = Some(element_count);
            detail.missing_count = Some(missing_count);
        }
        OutputFormat::Summary => {
            let mut summary = outcome.summary.unwrap_or_default();
            summary.insert("element_count".to_string(), json!(element_count));
            summary.insert("missing_count".to_string(), json!(missing_count));
            summary.insert(
                "missing_fraction".to_string(),
                json!(fraction(missing_count, element_count)),
            );
            detail.summary = Some(summary);
        }
        OutputFormat::Basic | OutputFormat::BooleanOnly => {}
    }

    RenderedResult::Detailed(detail)
}

/// Renders a table-shape outcome.
///
/// Table checks carry their full (small) field set regardless of the
/// verbosity knob.
pub(crate) fn table_output(outcome: AggregateOutcome) -> RenderedResult {
    RenderedResult::Detailed(ResultDetail {
        success: outcome.success,
        true_value: outcome.true_value,
        ..ResultDetail::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_eval() -> MapEvaluation {
        MapEvaluation {
            success: false,
            element_count: 6,
            considered_count: 4,
            missing_count: 2,
            exceptions: vec![(1, json!(2)), (4, json!(4))],
        }
    }

    #[test]
    fn test_map_basic_shape() {
        let rendered = map_output(OutputFormat::Basic, &sample_eval());
        let detail = rendered.detail().unwrap();
        assert!(!detail.success);
        assert_eq!(detail.exception_list, Some(vec![json!(2), json!(4)]));
        assert!(detail.exception_index_list.is_none());
        assert!(detail.summary.is_none());
    }

    #[test]
    fn test_map_complete_shape() {
        let rendered = map_output(OutputFormat::Complete, &sample_eval());
        let detail = rendered.detail().unwrap();
        assert_eq!(detail.exception_index_list, Some(vec![1, 4]));
        assert_eq!(detail.element_count, Some(6));
        assert_eq!(detail.considered_count, Some(4));
    }

    #[test]
    fn test_map_summary_counts_and_fractions() {
        let rendered = map_output(OutputFormat::Summary, &sample_eval());
        let summary = rendered.detail().unwrap().summary.clone().unwrap();
        assert_eq!(summary["element_count"], json!(6));
        assert_eq!(summary["missing_count"], json!(2));
        assert_eq!(summary["missing_fraction"], json!(2.0 / 6.0));
        assert_eq!(summary["exception_count"], json!(2));
        assert_eq!(summary["exception_fraction"], json!(0.5));
    }

    #[test]
    fn test_map_boolean_only() {
        let rendered = map_output(OutputFormat::BooleanOnly, &sample_eval());
        assert_eq!(rendered, RenderedResult::BooleanOnly(false));
    }

    #[test]
    fn test_aggregate_summary_merges_engine_counts() {
        let mut caller_summary = Map::new();
        caller_summary.insert("bins".to_string(), json!(10));
        // A lying evaluator loses to the engine's own count.
        caller_summary.insert("element_count".to_string(), json!(999));

        let outcome = AggregateOutcome::new(true, 3.5).with_summary(caller_summary);
        let rendered = aggregate_output(OutputFormat::Summary, outcome, 8, 2);
        let summary = rendered.detail().unwrap().summary.clone().unwrap();
        assert_eq!(summary["bins"], json!(10));
        assert_eq!(summary["element_count"], json!(8));
        assert_eq!(summary["missing_fraction"], json!(0.25));
    }

    #[test]
    fn test_aggregate_missing_fraction_guards_empty_table() {
        let rendered =
            aggregate_output(OutputFormat::Summary, AggregateOutcome::flag(false), 0, 0);
        let summary = rendered.detail().unwrap().summary.clone().unwrap();
        assert_eq!(summary["missing_fraction"], json!(0.0));
    }

    #[test]
    fn test_table_output_ignores_verbosity() {
        let rendered = table_output(AggregateOutcome::flag(true));
        let detail = rendered.detail().unwrap();
        assert!(detail.success);
        assert!(detail.true_value.is_none());
        assert!(detail.element_count.is_none());
    }
}
