//! Uniqueness expectations: duplicate detection and distinct-count
//! aggregates.

use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::core::{
    value, AggregateOutcome, ColumnPartition, ExpectationRegistry, Kwargs, OutputFormat,
    Predicate, RenderedResult,
};
use crate::dataset::{Dataset, ExpectationOptions};
use crate::error::Result;
use crate::sources::TabularSource;

fn distinct_count(partition: &ColumnPartition<'_>) -> usize {
    partition
        .values()
        .map(value::canonical_key)
        .collect::<HashSet<_>>()
        .len()
}

pub(crate) fn register(registry: &mut ExpectationRegistry) {
    registry.register_map("expect_column_values_to_be_unique", |_kwargs, partition| {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for cell in partition.values() {
            *counts.entry(value::canonical_key(cell)).or_insert(0) += 1;
        }
        let duplicated: HashSet<String> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(key, _)| key)
            .collect();
        Ok(Box::new(move |v: &Value| !duplicated.contains(&value::canonical_key(v)))
            as Predicate)
    });

    registry.register_aggregate(
        "expect_column_unique_value_count_to_be_between",
        |kwargs, partition| {
            let min_value = kwargs.u64_opt("min_value")?;
            let max_value = kwargs.u64_opt("max_value")?;
            let distinct = distinct_count(partition) as u64;
            let success = min_value.map_or(true, |m| distinct >= m)
                && max_value.map_or(true, |m| distinct <= m);
            Ok(AggregateOutcome::new(success, distinct))
        },
    );

    registry.register_aggregate(
        "expect_column_proportion_of_unique_values_to_be_between",
        |kwargs, partition| {
            let min_value = kwargs.f64_opt("min_value")?;
            let max_value = kwargs.f64_opt("max_value")?;
            let considered = partition.considered_count();
            if considered == 0 {
                return Ok(AggregateOutcome::flag(false));
            }
            let proportion = distinct_count(partition) as f64 / considered as f64;
            Ok(AggregateOutcome::new(
                value::within_bounds(proportion, min_value, max_value),
                proportion,
            ))
        },
    );
}

impl<S: TabularSource> Dataset<S> {
    /// Expects every non-null entry to occur exactly once.
    ///
    /// Every occurrence of a duplicated value is an exception, not just the
    /// repeats.
    pub fn expect_column_values_to_be_unique(
        &mut self,
        column: &str,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_be_unique",
            Kwargs::new().with("column", column),
            options,
        )
    }

    /// Expects the number of distinct non-null values to fall within the
    /// given closed bounds.
    pub fn expect_column_unique_value_count_to_be_between(
        &mut self,
        column: &str,
        min_value: Option<u64>,
        max_value: Option<u64>,
        output_format: Option<OutputFormat>,
    ) -> Result<RenderedResult> {
        self.run_aggregate_expectation(
            "expect_column_unique_value_count_to_be_between",
            Kwargs::new()
                .with("column", column)
                .with_opt("min_value", min_value)
                .with_opt("max_value", max_value),
            output_format,
        )
    }

    /// Expects the ratio of distinct values to non-null values to fall
    /// within the given closed bounds.
    pub fn expect_column_proportion_of_unique_values_to_be_between(
        &mut self,
        column: &str,
        min_value: Option<f64>,
        max_value: Option<f64>,
        output_format: Option<OutputFormat>,
    ) -> Result<RenderedResult> {
        self.run_aggregate_expectation(
            "expect_column_proportion_of_unique_values_to_be_between",
            Kwargs::new()
                .with("column", column)
                .with_opt("min_value", min_value)
                .with_opt("max_value", max_value),
            output_format,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::InMemoryTable;
    use serde_json::json;

    fn dataset() -> Dataset<InMemoryTable> {
        Dataset::new(
            InMemoryTable::from_columns([(
                "tags",
                vec![
                    json!("a"),
                    json!("b"),
                    json!("b"),
                    json!("c"),
                    Value::Null,
                ],
            )])
            .unwrap(),
        )
    }

    #[test]
    fn test_unique_reports_every_duplicate_occurrence() {
        let mut dataset = dataset();
        let result = dataset
            .expect_column_values_to_be_unique(
                "tags",
                ExpectationOptions::format(OutputFormat::Complete),
            )
            .unwrap();
        assert!(!result.success());
        let detail = result.detail().unwrap();
        assert_eq!(
            detail.exception_list,
            Some(vec![json!("b"), json!("b")])
        );
        assert_eq!(detail.exception_index_list, Some(vec![1, 2]));
    }

    #[test]
    fn test_unique_value_count() {
        let mut dataset = dataset();
        let result = dataset
            .expect_column_unique_value_count_to_be_between("tags", Some(3), Some(3), None)
            .unwrap();
        assert!(result.success());
        assert_eq!(result.detail().unwrap().true_value, Some(json!(3)));
    }

    #[test]
    fn test_unique_proportion() {
        let mut dataset = dataset();
        // 3 distinct over 4 non-null.
        let result = dataset
            .expect_column_proportion_of_unique_values_to_be_between(
                "tags",
                Some(0.7),
                Some(0.8),
                None,
            )
            .unwrap();
        assert!(result.success());
        assert_eq!(result.detail().unwrap().true_value, Some(json!(0.75)));
    }

    #[test]
    fn test_unique_proportion_empty_column_fails() {
        let mut dataset = Dataset::new(
            InMemoryTable::from_columns([("empty", vec![Value::Null, Value::Null])]).unwrap(),
        );
        let result = dataset
            .expect_column_proportion_of_unique_values_to_be_between(
                "empty",
                Some(0.0),
                Some(1.0),
                None,
            )
            .unwrap();
        assert!(!result.success());
        assert_eq!(result.detail().unwrap().true_value, Some(Value::Null));
    }
}
