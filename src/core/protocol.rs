//! The two generic evaluation protocols: per-row map checks and whole-column
//! aggregate checks.
//!
//! Everything expectation-specific lives in the registered factories and
//! aggregate functions; this module owns the shared mechanics of null
//! partitioning, predicate application, threshold evaluation, and handing the
//! outcome to the renderer.

use serde_json::Value;
use tracing::debug;

use super::outcome::{MapEvaluation, OutputFormat, RenderedResult};
use super::registry::{EvaluatorFlavor, ExpectationEntry, Kwargs};
use super::{render, threshold, value};
use crate::error::{DatavowError, Result};
use crate::sources::TabularSource;

/// Which rows a map expectation is judged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MapScope {
    /// Only non-null rows count toward the denominator; nulls are never
    /// exceptions.
    NonNull,
    /// Every row counts, nulls included. Used by the nullity checks, whose
    /// whole point is the missing rows.
    AllValues,
}

/// A column split into its null and non-null parts, preserving original row
/// indexes.
#[derive(Debug, Clone)]
pub struct ColumnPartition<'a> {
    /// Total rows in the column.
    pub element_count: usize,
    /// Null rows.
    pub missing_count: usize,
    /// `(original_index, value)` pairs for the non-null rows, in column
    /// order.
    pub non_null: Vec<(usize, &'a Value)>,
}

impl<'a> ColumnPartition<'a> {
    /// Partitions a column slice.
    pub fn from_values(values: &'a [Value]) -> Self {
        let non_null: Vec<(usize, &'a Value)> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| !value::is_null(v))
            .collect();
        Self {
            element_count: values.len(),
            missing_count: values.len() - non_null.len(),
            non_null,
        }
    }

    /// Number of non-null rows.
    pub fn considered_count(&self) -> usize {
        self.non_null.len()
    }

    /// The non-null values in column order.
    pub fn values(&self) -> impl Iterator<Item = &'a Value> + '_ {
        self.non_null.iter().map(|(_, v)| *v)
    }

    /// The non-null values as finite floats.
    ///
    /// Fails when the column holds anything non-numeric; a numeric statistic
    /// over mixed data is a caller error, not a formatting question.
    pub fn numeric_values(&self) -> Result<Vec<f64>> {
        self.values()
            .map(|v| {
                value::as_f64(v).ok_or_else(|| {
                    DatavowError::invalid_parameter(format!(
                        "column contains a non-numeric value: {v}"
                    ))
                })
            })
            .collect()
    }
}

/// Runs a registered evaluator against a source and renders the result.
pub(crate) fn evaluate(
    name: &str,
    entry: &ExpectationEntry,
    source: &dyn TabularSource,
    kwargs: &Kwargs,
    default_format: OutputFormat,
) -> Result<RenderedResult> {
    debug!(expectation.name = %name, expectation.kind = ?entry.kind(), "Evaluating expectation");

    match &entry.flavor {
        EvaluatorFlavor::Table(eval) => Ok(render::table_output(eval(source, kwargs)?)),
        EvaluatorFlavor::Map { scope, factory } => {
            let column = lookup_column(source, kwargs)?;
            let partition = ColumnPartition::from_values(column);
            let predicate = factory(kwargs, &partition)?;
            let evaluation = run_map(column, &partition, *scope, &predicate, kwargs.mostly()?)?;
            Ok(render::map_output(
                kwargs.output_format(default_format),
                &evaluation,
            ))
        }
        EvaluatorFlavor::Aggregate(eval) => {
            let column = lookup_column(source, kwargs)?;
            let partition = ColumnPartition::from_values(column);
            let outcome = eval(kwargs, &partition)?;
            Ok(render::aggregate_output(
                kwargs.output_format(default_format),
                outcome,
                partition.element_count,
                partition.missing_count,
            ))
        }
    }
}

fn lookup_column<'a>(source: &'a dyn TabularSource, kwargs: &Kwargs) -> Result<&'a [Value]> {
    let name = kwargs.column()?;
    source
        .column(name)
        .ok_or_else(|| DatavowError::missing_column(name))
}

fn run_map(
    column: &[Value],
    partition: &ColumnPartition<'_>,
    scope: MapScope,
    predicate: &dyn Fn(&Value) -> bool,
    mostly: Option<f64>,
) -> Result<MapEvaluation> {
    let mut passing_count = 0;
    let mut exceptions: Vec<(usize, Value)> = Vec::new();

    let considered_count = match scope {
        MapScope::NonNull => {
            for &(index, cell) in &partition.non_null {
                if predicate(cell) {
                    passing_count += 1;
                } else {
                    exceptions.push((index, cell.clone()));
                }
            }
            partition.considered_count()
        }
        MapScope::AllValues => {
            for (index, cell) in column.iter().enumerate() {
                if predicate(cell) {
                    passing_count += 1;
                } else {
                    exceptions.push((index, cell.clone()));
                }
            }
            partition.element_count
        }
    };

    let success = threshold::evaluate(considered_count, passing_count, mostly)?;
    Ok(MapEvaluation {
        success,
        element_count: partition.element_count,
        considered_count,
        missing_count: partition.missing_count,
        exceptions,
    })
}
