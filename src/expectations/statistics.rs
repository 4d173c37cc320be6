//! Aggregate statistics expectations: mean, median, standard deviation.
//!
//! All three follow the original bound convention: an absent bound is
//! unconstrained, and both bounds absent is trivially satisfied.

use crate::core::{value, AggregateOutcome, ExpectationRegistry, Kwargs, OutputFormat, RenderedResult};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::sources::TabularSource;

fn bounds(kwargs: &Kwargs) -> Result<(Option<f64>, Option<f64>)> {
    Ok((kwargs.f64_opt("min_value")?, kwargs.f64_opt("max_value")?))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation (n − 1 denominator); undefined below two
/// values.
fn sample_stdev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

pub(crate) fn register(registry: &mut ExpectationRegistry) {
    registry.register_aggregate("expect_column_mean_to_be_between", |kwargs, partition| {
        let (min_value, max_value) = bounds(kwargs)?;
        let values = partition.numeric_values()?;
        if values.is_empty() {
            return Ok(AggregateOutcome::flag(false));
        }
        let statistic = mean(&values);
        Ok(AggregateOutcome::new(
            value::within_bounds(statistic, min_value, max_value),
            statistic,
        ))
    });

    registry.register_aggregate("expect_column_median_to_be_between", |kwargs, partition| {
        let (min_value, max_value) = bounds(kwargs)?;
        let values = partition.numeric_values()?;
        if values.is_empty() {
            return Ok(AggregateOutcome::flag(false));
        }
        let statistic = median(&values);
        Ok(AggregateOutcome::new(
            value::within_bounds(statistic, min_value, max_value),
            statistic,
        ))
    });

    registry.register_aggregate("expect_column_stdev_to_be_between", |kwargs, partition| {
        let (min_value, max_value) = bounds(kwargs)?;
        let values = partition.numeric_values()?;
        match sample_stdev(&values) {
            None => Ok(AggregateOutcome::flag(false)),
            Some(statistic) => Ok(AggregateOutcome::new(
                value::within_bounds(statistic, min_value, max_value),
                statistic,
            )),
        }
    });
}

impl<S: TabularSource> Dataset<S> {
    /// Expects the column mean to fall within the given closed bounds.
    pub fn expect_column_mean_to_be_between(
        &mut self,
        column: &str,
        min_value: Option<f64>,
        max_value: Option<f64>,
        output_format: Option<OutputFormat>,
    ) -> Result<RenderedResult> {
        self.run_aggregate_expectation(
            "expect_column_mean_to_be_between",
            Kwargs::new()
                .with("column", column)
                .with_opt("min_value", min_value)
                .with_opt("max_value", max_value),
            output_format,
        )
    }

    /// Expects the column median to fall within the given closed bounds.
    pub fn expect_column_median_to_be_between(
        &mut self,
        column: &str,
        min_value: Option<f64>,
        max_value: Option<f64>,
        output_format: Option<OutputFormat>,
    ) -> Result<RenderedResult> {
        self.run_aggregate_expectation(
            "expect_column_median_to_be_between",
            Kwargs::new()
                .with("column", column)
                .with_opt("min_value", min_value)
                .with_opt("max_value", max_value),
            output_format,
        )
    }

    /// Expects the sample standard deviation to fall within the given closed
    /// bounds.
    pub fn expect_column_stdev_to_be_between(
        &mut self,
        column: &str,
        min_value: Option<f64>,
        max_value: Option<f64>,
        output_format: Option<OutputFormat>,
    ) -> Result<RenderedResult> {
        self.run_aggregate_expectation(
            "expect_column_stdev_to_be_between",
            Kwargs::new()
                .with("column", column)
                .with_opt("min_value", min_value)
                .with_opt("max_value", max_value),
            output_format,
        )
    }
}
