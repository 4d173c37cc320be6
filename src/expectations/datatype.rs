//! JSON value-type expectations.

use serde_json::Value;

use crate::core::{value, ExpectationRegistry, Kwargs, Predicate, RenderedResult};
use crate::dataset::{Dataset, ExpectationOptions};
use crate::error::{DatavowError, Result};
use crate::sources::TabularSource;

const TYPE_NAMES: &[&str] = &[
    "null", "boolean", "integer", "number", "string", "array", "object",
];

fn validate_type_name(name: &str) -> Result<()> {
    if TYPE_NAMES.contains(&name) {
        Ok(())
    } else {
        Err(DatavowError::invalid_parameter(format!(
            "unknown type name \"{name}\"; expected one of {TYPE_NAMES:?}"
        )))
    }
}

fn matches_type(v: &Value, name: &str) -> bool {
    match name {
        // Integers are numbers too; "number" is the wider check.
        "number" => v.is_number(),
        other => value::type_name(v) == other,
    }
}

pub(crate) fn register(registry: &mut ExpectationRegistry) {
    registry.register_map("expect_column_values_to_be_of_type", |kwargs, _partition| {
        let type_name = kwargs.str_required("type_")?.to_string();
        validate_type_name(&type_name)?;
        Ok(Box::new(move |v: &Value| matches_type(v, &type_name)) as Predicate)
    });

    registry.register_map(
        "expect_column_values_to_be_in_type_list",
        |kwargs, _partition| {
            let names: Vec<String> = kwargs
                .array_required("type_list")?
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).ok_or_else(|| {
                        DatavowError::invalid_parameter("type_list entries must be strings")
                    })
                })
                .collect::<Result<_>>()?;
            if names.is_empty() {
                return Err(DatavowError::invalid_parameter("type_list is empty"));
            }
            for name in &names {
                validate_type_name(name)?;
            }
            Ok(Box::new(move |v: &Value| names.iter().any(|name| matches_type(v, name)))
                as Predicate)
        },
    );
}

impl<S: TabularSource> Dataset<S> {
    /// Expects every entry to have the given JSON type.
    ///
    /// Type names are `"null"`, `"boolean"`, `"integer"`, `"number"`,
    /// `"string"`, `"array"`, and `"object"`; `"number"` accepts integers.
    pub fn expect_column_values_to_be_of_type(
        &mut self,
        column: &str,
        type_: &str,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_be_of_type",
            Kwargs::new().with("column", column).with("type_", type_),
            options,
        )
    }

    /// Expects every entry to have one of the given JSON types.
    pub fn expect_column_values_to_be_in_type_list(
        &mut self,
        column: &str,
        type_list: &[&str],
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        let names: Vec<Value> = type_list.iter().map(|n| Value::from(*n)).collect();
        self.run_map_expectation(
            "expect_column_values_to_be_in_type_list",
            Kwargs::new()
                .with("column", column)
                .with("type_list", names),
            options,
        )
    }
}
