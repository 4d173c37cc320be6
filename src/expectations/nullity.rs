//! Nullity expectations.
//!
//! Unlike every other map check, these are judged over all rows: the
//! denominator is the full element count, because the missing rows are the
//! subject of the check rather than data to be excluded from it.

use serde_json::Value;

use crate::core::{value, ExpectationRegistry, Kwargs, Predicate, RenderedResult};
use crate::dataset::{Dataset, ExpectationOptions};
use crate::error::Result;
use crate::sources::TabularSource;

pub(crate) fn register(registry: &mut ExpectationRegistry) {
    registry.register_map_over_all_values(
        "expect_column_values_to_not_be_null",
        |_kwargs, _partition| Ok(Box::new(|v: &Value| !value::is_null(v)) as Predicate),
    );

    registry.register_map_over_all_values(
        "expect_column_values_to_be_null",
        |_kwargs, _partition| Ok(Box::new(|v: &Value| value::is_null(v)) as Predicate),
    );
}

impl<S: TabularSource> Dataset<S> {
    /// Expects every entry in the column to be non-null.
    ///
    /// With `mostly`, the passing fraction is computed over all rows.
    pub fn expect_column_values_to_not_be_null(
        &mut self,
        column: &str,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_not_be_null",
            Kwargs::new().with("column", column),
            options,
        )
    }

    /// Expects every entry in the column to be null.
    pub fn expect_column_values_to_be_null(
        &mut self,
        column: &str,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_be_null",
            Kwargs::new().with("column", column),
            options,
        )
    }
}
