//! The dataset façade: a tabular source plus its accumulated expectation
//! suite, dispatch registry, and per-dataset defaults.

use tracing::{debug, info, warn};

use crate::core::protocol;
use crate::core::{
    ExpectationDefinition, ExpectationRegistry, ExpectationSuite, Kwargs, OutputFormat,
    RenderedResult, ValidationRecord, ValidationReport,
};
use crate::error::{DatavowError, Result};
use crate::sources::{read_csv, InMemoryTable, TabularSource};

/// Per-dataset configuration applied when a call does not specify its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectationDefaults {
    /// The output format used when neither the call nor the recorded kwargs
    /// name one.
    pub output_format: OutputFormat,
}

impl Default for ExpectationDefaults {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Basic,
        }
    }
}

/// Per-call options shared by the column-map expectations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExpectationOptions {
    /// Fractional pass-rate threshold below which the check still succeeds.
    pub mostly: Option<f64>,
    /// Output format override for this call.
    pub output_format: Option<OutputFormat>,
}

impl ExpectationOptions {
    /// No threshold, default format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a call with only a `mostly` threshold.
    pub fn mostly(fraction: f64) -> Self {
        Self::new().with_mostly(fraction)
    }

    /// Shorthand for a call with only a format override.
    pub fn format(format: OutputFormat) -> Self {
        Self::new().with_format(format)
    }

    /// Sets the `mostly` threshold.
    pub fn with_mostly(mut self, fraction: f64) -> Self {
        self.mostly = Some(fraction);
        self
    }

    /// Sets the output format override.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// A tabular snapshot with recorded expectations.
///
/// Every `expect_*` method binds its arguments, records the definition into
/// the suite (last write per name wins), evaluates, and returns the rendered
/// result. [`Dataset::validate`] later replays the recorded suite against
/// whatever data the dataset holds then.
///
/// ```
/// use datavow::dataset::{Dataset, ExpectationOptions};
/// use datavow::sources::InMemoryTable;
/// use serde_json::json;
///
/// # fn main() -> datavow::error::Result<()> {
/// let table = InMemoryTable::from_columns([
///     ("age", vec![json!(34), json!(51), json!(17)]),
/// ])?;
/// let mut dataset = Dataset::new(table);
///
/// let result = dataset.expect_column_values_to_be_between(
///     "age",
///     Some(json!(0)),
///     Some(json!(120)),
///     ExpectationOptions::new(),
/// )?;
/// assert!(result.success());
///
/// let report = dataset.validate();
/// assert!(report.success());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Dataset<S: TabularSource> {
    source: S,
    suite: ExpectationSuite,
    registry: ExpectationRegistry,
    defaults: ExpectationDefaults,
}

impl<S: TabularSource> Dataset<S> {
    /// Wraps a source with an empty suite.
    pub fn new(source: S) -> Self {
        Self::with_suite(source, ExpectationSuite::new())
    }

    /// Wraps a source and adopts an existing suite configuration.
    pub fn with_suite(source: S, suite: ExpectationSuite) -> Self {
        debug!(
            suite.subject = ?suite.subject_name,
            suite.expectations = suite.len(),
            "Attaching expectation suite to dataset"
        );
        Self {
            source,
            suite,
            registry: ExpectationRegistry::builtin(),
            defaults: ExpectationDefaults::default(),
        }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The accumulated suite configuration.
    pub fn suite(&self) -> &ExpectationSuite {
        &self.suite
    }

    /// Labels the suite with a subject name.
    pub fn set_subject_name(&mut self, name: impl Into<String>) {
        self.suite.subject_name = Some(name.into());
    }

    /// The per-dataset defaults.
    pub fn defaults(&self) -> &ExpectationDefaults {
        &self.defaults
    }

    /// Sets the default output format for calls that do not override it.
    pub fn set_default_output_format(&mut self, format: OutputFormat) {
        self.defaults.output_format = format;
    }

    /// The dispatch registry, for registering custom expectations.
    pub fn registry_mut(&mut self) -> &mut ExpectationRegistry {
        &mut self.registry
    }

    /// Read access to the dispatch registry.
    pub fn registry(&self) -> &ExpectationRegistry {
        &self.registry
    }

    /// Records an invocation into the suite and evaluates it.
    ///
    /// This is the generic entry point behind every typed `expect_*` method
    /// and the way to invoke custom-registered expectations. The definition
    /// is recorded before evaluation runs, so an evaluator error leaves the
    /// intent in the suite.
    pub fn record_and_evaluate(&mut self, name: &str, kwargs: Kwargs) -> Result<RenderedResult> {
        self.suite
            .append(ExpectationDefinition::new(name, kwargs.as_map().clone()));
        self.evaluate_only(name, &kwargs)
    }

    /// Evaluates a registered expectation without touching the suite.
    fn evaluate_only(&self, name: &str, kwargs: &Kwargs) -> Result<RenderedResult> {
        let entry = self
            .registry
            .get(name)
            .ok_or_else(|| DatavowError::UnknownExpectation(name.to_string()))?;
        protocol::evaluate(
            name,
            entry,
            &self.source,
            kwargs,
            self.defaults.output_format,
        )
    }

    /// Shared path for the typed map-expectation wrappers.
    pub(crate) fn run_map_expectation(
        &mut self,
        name: &str,
        kwargs: Kwargs,
        options: ExpectationOptions,
    ) -> Result<RenderedResult> {
        let kwargs = kwargs
            .with_opt("mostly", options.mostly)
            .with_opt("output_format", options.output_format.map(|f| f.as_str()));
        self.record_and_evaluate(name, kwargs)
    }

    /// Shared path for the typed aggregate-expectation wrappers.
    pub(crate) fn run_aggregate_expectation(
        &mut self,
        name: &str,
        kwargs: Kwargs,
        output_format: Option<OutputFormat>,
    ) -> Result<RenderedResult> {
        let kwargs = kwargs.with_opt("output_format", output_format.map(|f| f.as_str()));
        self.record_and_evaluate(name, kwargs)
    }

    /// Replays every recorded definition against the current data, in stored
    /// order, and reports one record per definition.
    ///
    /// Replay never mutates the suite and never re-records. The output
    /// format is forced to COMPLETE on the evaluation (not on the stored
    /// definition) so the merged records carry counts and indexes. A failing
    /// evaluator or an unknown name becomes a `{success: false, error: ...}`
    /// record and replay continues with the next definition.
    pub fn validate(&self) -> ValidationReport {
        info!(
            suite.subject = ?self.suite.subject_name,
            suite.expectations = self.suite.len(),
            "Starting suite validation"
        );

        let mut report = ValidationReport::new();
        for definition in self.suite.definitions() {
            let name = definition.expectation_type.as_str();
            let record = if !self.registry.contains(name) {
                warn!(expectation.name = %name, "No evaluator registered for recorded expectation");
                ValidationRecord::failed(definition, "unknown_expectation")
            } else {
                let mut kwargs = Kwargs::from_map(definition.kwargs.clone());
                kwargs.insert("output_format", OutputFormat::Complete.as_str());
                match self.evaluate_only(name, &kwargs) {
                    Ok(rendered) => ValidationRecord::new(definition, rendered.into_detail()),
                    Err(error) => {
                        warn!(
                            expectation.name = %name,
                            error = %error,
                            "Expectation evaluation failed during replay"
                        );
                        ValidationRecord::failed(definition, error.kind())
                    }
                }
            };
            report.push(record);
        }

        let metrics = report.metrics();
        info!(
            metrics.evaluated = metrics.evaluated,
            metrics.passed = metrics.passed,
            metrics.failed = metrics.failed,
            suite.result = %if report.success() { "passed" } else { "failed" },
            "Suite validation completed"
        );
        report
    }
}

impl Dataset<InMemoryTable> {
    /// Loads a CSV file into an in-memory dataset with a fresh suite.
    pub fn from_csv_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(read_csv(path)?))
    }

    /// Loads a CSV file and adopts an existing suite, ready for
    /// [`Dataset::validate`].
    pub fn from_csv_path_with_suite(
        path: impl AsRef<std::path::Path>,
        suite: ExpectationSuite,
    ) -> Result<Self> {
        Ok(Self::with_suite(read_csv(path)?, suite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AggregateOutcome;
    use serde_json::{json, Value};

    fn table() -> InMemoryTable {
        InMemoryTable::from_columns([
            ("id", vec![json!(1), json!(2), json!(3)]),
            ("name", vec![json!("a"), Value::Null, json!("c")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_starts_with_an_empty_suite() {
        let dataset = Dataset::new(table());
        assert!(dataset.suite().is_empty());
        assert_eq!(dataset.defaults().output_format, OutputFormat::Basic);
    }

    #[test]
    fn test_record_and_evaluate_records_before_failure() {
        let mut dataset = Dataset::new(table());
        let result = dataset.record_and_evaluate(
            "expect_column_values_to_match_regex",
            Kwargs::new().with("column", "name").with("regex", "["),
        );
        assert!(result.is_err());
        assert!(dataset
            .suite()
            .get("expect_column_values_to_match_regex")
            .is_some());
    }

    #[test]
    fn test_unknown_expectation_is_recorded_then_errors() {
        let mut dataset = Dataset::new(table());
        let result =
            dataset.record_and_evaluate("expect_magic", Kwargs::new().with("column", "id"));
        assert!(matches!(result, Err(DatavowError::UnknownExpectation(_))));
        assert!(dataset.suite().get("expect_magic").is_some());
    }

    #[test]
    fn test_validate_continues_past_unknown_names() {
        let mut dataset = Dataset::new(table());
        dataset.expect_column_to_exist("id").unwrap();
        dataset
            .record_and_evaluate("expect_vanishing", Kwargs::new().with("column", "id"))
            .ok();
        dataset.expect_table_row_count_to_equal(3).unwrap();

        let report = dataset.validate();
        assert_eq!(report.results.len(), 3);
        assert_eq!(
            report.results[1].error.as_deref(),
            Some("unknown_expectation")
        );
        // Replay kept going on both sides of the failure.
        assert!(report.results[0].success());
        assert!(report.results[2].success());
    }

    #[test]
    fn test_custom_registered_expectation() {
        let mut dataset = Dataset::new(table());
        dataset
            .registry_mut()
            .register_table("expect_table_to_be_nonempty", |source, _kwargs| {
                Ok(AggregateOutcome::new(
                    source.row_count() > 0,
                    source.row_count() as u64,
                ))
            });

        let result = dataset
            .record_and_evaluate("expect_table_to_be_nonempty", Kwargs::new())
            .unwrap();
        assert!(result.success());
        assert!(dataset.validate().success());
    }

    #[test]
    fn test_validate_does_not_mutate_suite() {
        let mut dataset = Dataset::new(table());
        dataset
            .expect_column_values_to_not_be_null("id", ExpectationOptions::new())
            .unwrap();
        let before = dataset.suite().clone();
        let _ = dataset.validate();
        assert_eq!(dataset.suite(), &before);
    }
}
