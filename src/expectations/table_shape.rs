//! Table-shape expectations: column existence and row counts.
//!
//! These operate on the table as a whole, so the verbosity knob and `mostly`
//! do not apply.

use crate::core::{AggregateOutcome, ExpectationRegistry, Kwargs, RenderedResult};
use crate::dataset::Dataset;
use crate::error::{DatavowError, Result};
use crate::sources::TabularSource;

pub(crate) fn register(registry: &mut ExpectationRegistry) {
    registry.register_table("expect_column_to_exist", |source, kwargs| {
        let column = kwargs.column()?;
        Ok(AggregateOutcome::flag(source.has_column(column)))
    });

    registry.register_table("expect_table_row_count_to_be_between", |source, kwargs| {
        let min_value = kwargs.u64_opt("min_value")?;
        let max_value = kwargs.u64_opt("max_value")?;
        if min_value.is_none() && max_value.is_none() {
            return Err(DatavowError::invalid_parameter(
                "min_value and max_value cannot both be absent",
            ));
        }
        let rows = source.row_count() as u64;
        let success =
            min_value.map_or(true, |m| rows >= m) && max_value.map_or(true, |m| rows <= m);
        Ok(AggregateOutcome::new(success, rows))
    });

    registry.register_table("expect_table_row_count_to_equal", |source, kwargs| {
        let value = kwargs.u64_required("value")?;
        let rows = source.row_count() as u64;
        Ok(AggregateOutcome::new(rows == value, rows))
    });
}

impl<S: TabularSource> Dataset<S> {
    /// Expects the named column to exist.
    pub fn expect_column_to_exist(&mut self, column: &str) -> Result<RenderedResult> {
        self.record_and_evaluate(
            "expect_column_to_exist",
            Kwargs::new().with("column", column),
        )
    }

    /// Expects the row count to fall within the given closed bounds.
    ///
    /// Either bound may be absent, but not both.
    pub fn expect_table_row_count_to_be_between(
        &mut self,
        min_value: Option<u64>,
        max_value: Option<u64>,
    ) -> Result<RenderedResult> {
        self.record_and_evaluate(
            "expect_table_row_count_to_be_between",
            Kwargs::new()
                .with_opt("min_value", min_value)
                .with_opt("max_value", max_value),
        )
    }

    /// Expects the row count to equal `value` exactly.
    pub fn expect_table_row_count_to_equal(&mut self, value: u64) -> Result<RenderedResult> {
        self.record_and_evaluate(
            "expect_table_row_count_to_equal",
            Kwargs::new().with("value", value),
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
            InMemoryTable::from_columns([("id", vec![json!(1), json!(2), json!(3)])]).unwrap(),
        )
    }

    #[test]
    fn test_column_existence() {
        let mut dataset = dataset();
        assert!(dataset.expect_column_to_exist("id").unwrap().success());
        assert!(!dataset.expect_column_to_exist("ghost").unwrap().success());
    }

    #[test]
    fn test_row_count_between() {
        let mut dataset = dataset();
        let result = dataset
            .expect_table_row_count_to_be_between(Some(1), Some(5))
            .unwrap();
        assert!(result.success());
        assert_eq!(result.detail().unwrap().true_value, Some(json!(3)));

        assert!(!dataset
            .expect_table_row_count_to_be_between(Some(4), None)
            .unwrap()
            .success());
        assert!(dataset
            .expect_table_row_count_to_be_between(None, Some(3))
            .unwrap()
            .success());
    }

    #[test]
    fn test_row_count_between_requires_a_bound() {
        let mut dataset = dataset();
        assert!(matches!(
            dataset.expect_table_row_count_to_be_between(None, None),
            Err(DatavowError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_row_count_equal() {
        let mut dataset = dataset();
        assert!(dataset.expect_table_row_count_to_equal(3).unwrap().success());
        assert!(!dataset.expect_table_row_count_to_equal(4).unwrap().success());
    }
}
