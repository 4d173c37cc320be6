//! Built-in expectation catalogue.
//!
//! Each submodule covers one family: it registers its evaluators into the
//! built-in registry and contributes the typed `expect_*` methods on
//! [`Dataset`](crate::dataset::Dataset). The concrete checks are deliberately
//! small; the shared machinery in [`crate::core`] does the partitioning,
//! thresholding, and formatting.
//!
//! | Family | Checks |
//! |---|---|
//! | [`table_shape`] | column existence, row counts |
//! | [`nullity`] | null / not-null (element-count denominator) |
//! | [`sets`] | set membership, value ranges |
//! | [`uniqueness`] | duplicate detection, distinct counts |
//! | [`length`] | value lengths |
//! | [`pattern`] | regex matching |
//! | [`parsing`] | datetime and JSON parseability |
//! | [`datatype`] | JSON value types |
//! | [`statistics`] | mean / median / standard deviation |
//! | [`distribution`] | KL divergence against a reference partition |

use once_cell::sync::Lazy;

use crate::core::ExpectationRegistry;

pub mod datatype;
pub mod distribution;
pub mod length;
pub mod nullity;
pub mod parsing;
pub mod pattern;
pub mod sets;
pub mod statistics;
pub mod table_shape;
pub mod uniqueness;

pub use pattern::RequiredMatch;

static BUILTINS: Lazy<ExpectationRegistry> = Lazy::new(|| {
    let mut registry = ExpectationRegistry::empty();
    table_shape::register(&mut registry);
    nullity::register(&mut registry);
    sets::register(&mut registry);
    uniqueness::register(&mut registry);
    length::register(&mut registry);
    pattern::register(&mut registry);
    parsing::register(&mut registry);
    datatype::register(&mut registry);
    statistics::register(&mut registry);
    distribution::register(&mut registry);
    registry
});

/// The lazily built singleton behind [`ExpectationRegistry::builtin`].
pub(crate) fn builtin_registry() -> &'static ExpectationRegistry {
    &BUILTINS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogue_is_complete() {
        let registry = builtin_registry();
        for name in [
            "expect_column_to_exist",
            "expect_table_row_count_to_be_between",
            "expect_table_row_count_to_equal",
            "expect_column_values_to_not_be_null",
            "expect_column_values_to_be_null",
            "expect_column_values_to_be_in_set",
            "expect_column_values_to_not_be_in_set",
            "expect_column_values_to_be_between",
            "expect_column_values_to_be_unique",
            "expect_column_unique_value_count_to_be_between",
            "expect_column_proportion_of_unique_values_to_be_between",
            "expect_column_value_lengths_to_be_between",
            "expect_column_value_lengths_to_equal",
            "expect_column_values_to_match_regex",
            "expect_column_values_to_not_match_regex",
            "expect_column_values_to_match_regex_list",
            "expect_column_values_to_match_strftime_format",
            "expect_column_values_to_be_datetime_parseable",
            "expect_column_values_to_be_json_parseable",
            "expect_column_values_to_be_of_type",
            "expect_column_values_to_be_in_type_list",
            "expect_column_mean_to_be_between",
            "expect_column_median_to_be_between",
            "expect_column_stdev_to_be_between",
            "expect_column_kl_divergence_less_than",
        ] {
            assert!(registry.contains(name), "missing builtin: {name}");
        }
    }
}
