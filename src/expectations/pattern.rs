//! Regex matching expectations.
//!
//! Patterns use unanchored search semantics and apply to string entries
//! only; a non-string entry fails the check either way rather than being
//! coerced.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::core::{ExpectationRegistry, Kwargs, Predicate, RenderedResult};
use crate::dataset::{Dataset, ExpectationOptions};
use crate::error::{DatavowError, Result};
use crate::sources::TabularSource;

/// How many patterns of a regex list an entry must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequiredMatch {
    /// At least one pattern must match.
    #[default]
    Any,
    /// Every pattern must match.
    All,
}

impl RequiredMatch {
    /// The wire name recorded into kwargs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::All => "all",
        }
    }
}

impl fmt::Display for RequiredMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequiredMatch {
    type Err = DatavowError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "any" => Ok(Self::Any),
            "all" => Ok(Self::All),
            other => Err(DatavowError::invalid_parameter(format!(
                "required_match must be \"any\" or \"all\", got \"{other}\""
            ))),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| DatavowError::invalid_parameter(format!("invalid regex: {e}")))
}

pub(crate) fn register(registry: &mut ExpectationRegistry) {
    registry.register_map(
        "expect_column_values_to_match_regex",
        |kwargs, _partition| {
            let re = compile(kwargs.str_required("regex")?)?;
            Ok(Box::new(move |v: &Value| v.as_str().map_or(false, |s| re.is_match(s)))
                as Predicate)
        },
    );

    registry.register_map(
        "expect_column_values_to_not_match_regex",
        |kwargs, _partition| {
            let re = compile(kwargs.str_required("regex")?)?;
            Ok(
                Box::new(move |v: &Value| v.as_str().map_or(false, |s| !re.is_match(s)))
                    as Predicate,
            )
        },
    );

    registry.register_map(
        "expect_column_values_to_match_regex_list",
        |kwargs, _partition| {
            let patterns = kwargs.array_required("regex_list")?;
            if patterns.is_empty() {
                return Err(DatavowError::invalid_parameter("regex_list is empty"));
            }
            let compiled: Vec<Regex> = patterns
                .iter()
                .map(|p| {
                    p.as_str()
                        .ok_or_else(|| {
                            DatavowError::invalid_parameter("regex_list entries must be strings")
                        })
                        .and_then(compile)
                })
                .collect::<Result<_>>()?;
            let required = match kwargs.str_opt("required_match")? {
                Some(name) => name.parse::<RequiredMatch>()?,
                None => RequiredMatch::Any,
            };

            Ok(Box::new(move |v: &Value| {
                v.as_str().map_or(false, |s| match required {
                    RequiredMatch::Any => compiled.iter().any(|re| re.is_match(s)),
                    RequiredMatch::All => compiled.iter().all(|re| re.is_match(s)),
                })
            }) as Predicate)
        },
    );
}

impl<S: TabularSource> Dataset<S> {
    /// Expects every entry to be a string matching `regex`.
    pub fn expect_column_values_to_match_regex(
        &mut self,
        column: &str,
        regex: &str,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_match_regex",
            Kwargs::new().with("column", column).with("regex", regex),
            options,
        )
    }

    /// Expects every entry to be a string that does not match `regex`.
    pub fn expect_column_values_to_not_match_regex(
        &mut self,
        column: &str,
        regex: &str,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        self.run_map_expectation(
            "expect_column_values_to_not_match_regex",
            Kwargs::new().with("column", column).with("regex", regex),
            options,
        )
    }

    /// Expects every entry to match the regex list per `required_match`.
    pub fn expect_column_values_to_match_regex_list(
        &mut self,
        column: &str,
        regex_list: &[&str],
        required_match: RequiredMatch,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        let patterns: Vec<Value> = regex_list.iter().map(|p| Value::from(*p)).collect();
        self.run_map_expectation(
            "expect_column_values_to_match_regex_list",
            Kwargs::new()
                .with("column", column)
                .with("regex_list", patterns)
                .with("required_match", required_match.as_str()),
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
                "email",
                vec![
                    json!("ada@lovelace.io"),
                    json!("not-an-email"),
                    Value::Null,
                    json!(42),
                ],
            )])
            .unwrap(),
        )
    }

    #[test]
    fn test_match_regex() {
        let mut dataset = dataset();
        let result = dataset
            .expect_column_values_to_match_regex(
                "email",
                r"^[^@]+@[^@]+$",
                ExpectationOptions::new(),
            )
            .unwrap();
        assert!(!result.success());
        // The non-string entry fails alongside the malformed address.
        assert_eq!(
            result.detail().unwrap().exception_list,
            Some(vec![json!("not-an-email"), json!(42)])
        );
    }

    #[test]
    fn test_match_regex_with_mostly() {
        let mut dataset = dataset();
        // 1 of 3 considered entries matches.
        assert!(dataset
            .expect_column_values_to_match_regex(
                "email",
                r"@",
                ExpectationOptions::mostly(1.0 / 3.0),
            )
            .unwrap()
            .success());
    }

    #[test]
    fn test_invalid_regex_is_a_parameter_error() {
        let mut dataset = dataset();
        assert!(matches!(
            dataset.expect_column_values_to_match_regex("email", "[", ExpectationOptions::new()),
            Err(DatavowError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_not_match_regex() {
        let mut dataset = dataset();
        let result = dataset
            .expect_column_values_to_not_match_regex(
                "email",
                r"^spam",
                ExpectationOptions::new(),
            )
            .unwrap();
        // The numeric entry still fails: it is not a string.
        assert!(!result.success());
        assert_eq!(
            result.detail().unwrap().exception_list,
            Some(vec![json!(42)])
        );
    }

    #[test]
    fn test_match_regex_list_any_vs_all() {
        let mut dataset = Dataset::new(
            InMemoryTable::from_columns([(
                "id",
                vec![json!("ab12"), json!("ab"), json!("12")],
            )])
            .unwrap(),
        );

        assert!(dataset
            .expect_column_values_to_match_regex_list(
                "id",
                &["[a-z]", "[0-9]"],
                RequiredMatch::Any,
                ExpectationOptions::new(),
            )
            .unwrap()
            .success());

        let result = dataset
            .expect_column_values_to_match_regex_list(
                "id",
                &["[a-z]", "[0-9]"],
                RequiredMatch::All,
                ExpectationOptions::new(),
            )
            .unwrap();
        assert_eq!(
            result.detail().unwrap().exception_list,
            Some(vec![json!("ab"), json!("12")])
        );
    }
}
