//! Value-length expectations over strings and arrays.

use serde_json::Value;

use crate::core::{value, ExpectationRegistry, Kwargs, Predicate, RenderedResult};
use crate::dataset::{Dataset, ExpectationOptions};
use crate::error::{DatavowError, Result};
use crate::sources::TabularSource;

pub(crate) fn register(registry: &mut ExpectationRegistry) {
    registry.register_map(
        "expect_column_value_lengths_to_be_between",
        |kwargs, _partition| {
            let min_value = kwargs.u64_opt("min_value")?;
            let max_value = kwargs.u64_opt("max_value")?;
            if min_value.is_none() && max_value.is_none() {
                return Err(DatavowError::invalid_parameter(
                    "min_value and max_value cannot both be absent",
                ));
            }
            Ok(Box::new(move |v: &Value| {
                value::length(v).map_or(false, |len| {
                    let len = len as u64;
                    min_value.map_or(true, |m| len >= m) && max_value.map_or(true, |m| len <= m)
                })
            }) as Predicate)
        },
    );

    registry.register_map(
        "expect_column_value_lengths_to_equal",
        |kwargs, _partition| {
            let expected = kwargs.u64_required("value")?;
            Ok(Box::new(move |v: &Value| {
                value::length(v).map_or(false, |len| len as u64 == expected)
            }) as Predicate)
        },
    );
}

impl<S: TabularSource> Dataset<S> {
    /// Expects every entry's length to fall within the given closed bounds.
    ///
    /// Strings measure in characters and arrays in elements; an entry with
    /// no length fails. Either bound may be absent, but not both.
    pub fn expect_column_value_lengths_to_be_between(
        &mut self,
        column: &str,
        min_value: Option<u64>,
        max_value: Option<u64>,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_value_lengths_to_be_between",
            Kwargs::new()
                .with("column", column)
                .with_opt("min_value", min_value)
                .with_opt("max_value", max_value),
            options,
        )
    }

    /// Expects every entry's length to equal `value`.
    pub fn expect_column_value_lengths_to_equal(
        &mut self,
        column: &str,
        value: u64,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_value_lengths_to_equal",
            Kwargs::new().with("column", column).with("value", value),
            options,
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
                "code",
                vec![json!("ab"), json!("abcd"), json!(7), Value::Null],
            )])
            .unwrap(),
        )
    }

    #[test]
    fn test_lengths_between() {
        let mut dataset = dataset();
        let result = dataset
            .expect_column_value_lengths_to_be_between(
                "code",
                Some(2),
                Some(4),
                ExpectationOptions::new(),
            )
            .unwrap();
        // The numeric entry has no length and fails.
        assert!(!result.success());
        assert_eq!(
            result.detail().unwrap().exception_list,
            Some(vec![json!(7)])
        );
    }

    #[test]
    fn test_lengths_between_requires_a_bound() {
        let mut dataset = dataset();
        assert!(matches!(
            dataset.expect_column_value_lengths_to_be_between(
                "code",
                None,
                None,
                ExpectationOptions::new(),
            ),
            Err(DatavowError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_lengths_equal() {
        let mut dataset = dataset();
        let result = dataset
            .expect_column_value_lengths_to_equal("code", 2, ExpectationOptions::new())
            .unwrap();
        assert!(!result.success());
        assert_eq!(
            result.detail().unwrap().exception_list,
            Some(vec![json!("abcd"), json!(7)])
        );
    }
}
