//! Parseability expectations: datetime formats and JSON.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::core::{ExpectationRegistry, Kwargs, Predicate, RenderedResult};
use crate::dataset::{Dataset, ExpectationOptions};
use crate::error::{DatavowError, Result};
use crate::sources::TabularSource;

/// Datetime layouts tried by the format-free parseability check, roughly the
/// shapes that show up in exported tabular data.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%B %d, %Y"];

fn validate_strftime(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(DatavowError::invalid_parameter(format!(
            "invalid strftime format: {format}"
        )));
    }
    Ok(())
}

fn parses_with_format(s: &str, format: &str) -> bool {
    NaiveDateTime::parse_from_str(s, format).is_ok()
        || NaiveDate::parse_from_str(s, format).is_ok()
        || NaiveTime::parse_from_str(s, format).is_ok()
}

fn parses_as_datetime(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || DATETIME_LAYOUTS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || DATE_LAYOUTS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
}

pub(crate) fn register(registry: &mut ExpectationRegistry) {
    registry.register_map(
        "expect_column_values_to_match_strftime_format",
        |kwargs, _partition| {
            let format = kwargs.str_required("strftime_format")?.to_string();
            validate_strftime(&format)?;
            Ok(Box::new(move |v: &Value| {
                v.as_str().map_or(false, |s| parses_with_format(s, &format))
            }) as Predicate)
        },
    );

    registry.register_map(
        "expect_column_values_to_be_datetime_parseable",
        |_kwargs, _partition| {
            Ok(Box::new(|v: &Value| v.as_str().map_or(false, parses_as_datetime)) as Predicate)
        },
    );

    registry.register_map(
        "expect_column_values_to_be_json_parseable",
        |_kwargs, _partition| {
            Ok(Box::new(|v: &Value| {
                v.as_str()
                    .map_or(false, |s| serde_json::from_str::<Value>(s).is_ok())
            }) as Predicate)
        },
    );
}

impl<S: TabularSource> Dataset<S> {
    /// Expects every entry to be a string parseable with the given chrono
    /// format, as a datetime, date, or time.
    pub fn expect_column_values_to_match_strftime_format(
        &mut self,
        column: &str,
        strftime_format: &str,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_match_strftime_format",
            Kwargs::new()
                .with("column", column)
                .with("strftime_format", strftime_format),
            options,
        )
    }

    /// Expects every entry to be a string parseable as a datetime in one of
    /// the common layouts (RFC 3339, RFC 2822, ISO-ish date and datetime
    /// forms).
    pub fn expect_column_values_to_be_datetime_parseable(
        &mut self,
        column: &str,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_be_datetime_parseable",
            Kwargs::new().with("column", column),
            options,
        )
    }

    /// Expects every entry to be a string containing valid JSON.
    pub fn expect_column_values_to_be_json_parseable(
        &mut self,
        column: &str,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_be_json_parseable",
            Kwargs::new().with("column", column),
            options,
        )
    }
}
