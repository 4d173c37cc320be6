//! Set membership and value range expectations.

use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::core::{value, ExpectationRegistry, Kwargs, Predicate, RenderedResult};
use crate::dataset::{Dataset, ExpectationOptions};
use crate::error::{DatavowError, Result};
use crate::sources::TabularSource;

fn membership_set(kwargs: &Kwargs) -> Result<HashSet<String>> {
    Ok(kwargs
        .array_required("value_set")?
        .iter()
        .map(value::canonical_key)
        .collect())
}

fn between_predicate(kwargs: &Kwargs) -> Result<Predicate> {
    let min_value = kwargs.value_opt("min_value").cloned();
    let max_value = kwargs.value_opt("max_value").cloned();
    if min_value.is_none() && max_value.is_none() {
        return Err(DatavowError::invalid_parameter(
            "min_value and max_value cannot both be absent",
        ));
    }

    Ok(Box::new(move |v: &Value| {
        let lower = min_value.as_ref().map_or(true, |min| {
            matches!(
                value::compare(min, v),
                Some(Ordering::Less | Ordering::Equal)
            )
        });
        let upper = max_value.as_ref().map_or(true, |max| {
            matches!(
                value::compare(v, max),
                Some(Ordering::Less | Ordering::Equal)
            )
        });
        lower && upper
    }))
}

pub(crate) fn register(registry: &mut ExpectationRegistry) {
    registry.register_map("expect_column_values_to_be_in_set", |kwargs, _partition| {
        let set = membership_set(kwargs)?;
        Ok(Box::new(move |v: &Value| set.contains(&value::canonical_key(v))) as Predicate)
    });

    registry.register_map(
        "expect_column_values_to_not_be_in_set",
        |kwargs, _partition| {
            let set = membership_set(kwargs)?;
            Ok(Box::new(move |v: &Value| !set.contains(&value::canonical_key(v))) as Predicate)
        },
    );

    registry.register_map(
        "expect_column_values_to_be_between",
        |kwargs, _partition| between_predicate(kwargs),
    );
}

impl<S: TabularSource> Dataset<S> {
    /// Expects every entry to be a member of `value_set`.
    pub fn expect_column_values_to_be_in_set(
        &mut self,
        column: &str,
        value_set: Vec<Value>,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_be_in_set",
            Kwargs::new()
                .with("column", column)
                .with("value_set", value_set),
            options,
        )
    }

    /// Expects no entry to be a member of `value_set`.
    pub fn expect_column_values_to_not_be_in_set(
        &mut self,
        column: &str,
        value_set: Vec<Value>,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_not_be_in_set",
            Kwargs::new()
                .with("column", column)
                .with("value_set", value_set),
            options,
        )
    }

    /// Expects every entry to lie within the given closed bounds.
    ///
    /// Bounds compare numbers with numbers and strings with strings; an
    /// entry that cannot be compared with a present bound fails. Either
    /// bound may be absent, but not both.
    pub fn expect_column_values_to_be_between(
        &mut self,
        column: &str,
        min_value: Option<Value>,
        max_value: Option<Value>,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_be_between",
            Kwargs::new()
                .with("column", column)
                .with_opt("min_value", min_value)
                .with_opt("max_value", max_value),
            options,
        )
    }
}
