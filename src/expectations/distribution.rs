//! Distribution comparison: Kullback-Leibler divergence against a reference
//! partition.
//!
//! The reference is a partition object `{"partition": [...], "weights":
//! [...]}`. Equal lengths describe a categorical distribution over the
//! partition values; one more partition entry than weights describes a
//! histogram over numeric bin edges.

use serde_json::{json, Map, Value};

use crate::core::{
    value, AggregateOutcome, ColumnPartition, ExpectationRegistry, Kwargs, OutputFormat,
    RenderedResult,
};
use crate::dataset::Dataset;
use crate::error::{DatavowError, Result};
use crate::sources::TabularSource;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

enum PartitionSpec {
    /// Categorical values with one weight each.
    Discrete {
        categories: Vec<Value>,
        weights: Vec<f64>,
    },
    /// Ascending numeric bin edges with one weight per bin.
    Continuous { edges: Vec<f64>, weights: Vec<f64> },
}

fn parse_partition_object(object: &Map<String, Value>) -> Result<PartitionSpec> {
    let partition = object
        .get("partition")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            DatavowError::invalid_parameter("partition_object requires a `partition` array")
        })?;
    let weights: Vec<f64> = object
        .get("weights")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            DatavowError::invalid_parameter("partition_object requires a `weights` array")
        })?
        .iter()
        .map(|w| {
            value::as_f64(w)
                .filter(|w| *w >= 0.0)
                .ok_or_else(|| {
                    DatavowError::invalid_parameter("weights must be non-negative numbers")
                })
        })
        .collect::<Result<_>>()?;

    if weights.is_empty() {
        return Err(DatavowError::invalid_parameter("weights must be non-empty"));
    }
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(DatavowError::invalid_parameter(format!(
            "weights must sum to 1, got {total}"
        )));
    }

    if partition.len() == weights.len() {
        return Ok(PartitionSpec::Discrete {
            categories: partition.clone(),
            weights,
        });
    }

    if partition.len() == weights.len() + 1 {
        let edges: Vec<f64> = partition
            .iter()
            .map(|e| {
                value::as_f64(e).ok_or_else(|| {
                    DatavowError::invalid_parameter("histogram partition edges must be numbers")
                })
            })
            .collect::<Result<_>>()?;
        if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(DatavowError::invalid_parameter(
                "histogram partition edges must be strictly ascending",
            ));
        }
        return Ok(PartitionSpec::Continuous { edges, weights });
    }

    Err(DatavowError::invalid_parameter(
        "partition and weights lengths must match (categorical) or differ by one (histogram)",
    ))
}

/// Observed probabilities of the column under the reference partition.
fn observed_probabilities(spec: &PartitionSpec, partition: &ColumnPartition<'_>) -> Result<Vec<f64>> {
    let considered = partition.considered_count() as f64;
    match spec {
        PartitionSpec::Discrete { categories, .. } => {
            let keys: Vec<String> = categories.iter().map(value::canonical_key).collect();
            let mut counts = vec![0usize; keys.len()];
            for cell in partition.values() {
                let key = value::canonical_key(cell);
                if let Some(slot) = keys.iter().position(|k| *k == key) {
                    counts[slot] += 1;
                }
            }
            Ok(counts.iter().map(|c| *c as f64 / considered).collect())
        }
        PartitionSpec::Continuous { edges, weights } => {
            let mut counts = vec![0usize; weights.len()];
            for x in partition.numeric_values()? {
                // Half-open bins, last bin closed, as histogram convention
                // has it; out-of-range values carry no mass.
                let last = edges.len() - 1;
                for bin in 0..last {
                    let upper_ok = if bin == last - 1 {
                        x <= edges[bin + 1]
                    } else {
                        x < edges[bin + 1]
                    };
                    if x >= edges[bin] && upper_ok {
                        counts[bin] += 1;
                        break;
                    }
                }
            }
            Ok(counts.iter().map(|c| *c as f64 / considered).collect())
        }
    }
}

/// KL divergence of the observed distribution from the reference weights;
/// `None` when observed mass falls where the reference has none.
fn kl_divergence(observed: &[f64], reference: &[f64]) -> Option<f64> {
    let mut divergence = 0.0;
    for (&p, &q) in observed.iter().zip(reference) {
        if p > 0.0 {
            if q == 0.0 {
                return None;
            }
            divergence += p * (p / q).ln();
        }
    }
    Some(divergence)
}

pub(crate) fn register(registry: &mut ExpectationRegistry) {
    registry.register_aggregate(
        "expect_column_kl_divergence_less_than",
        |kwargs, partition| {
            let threshold = kwargs.f64_required("threshold")?;
            if threshold < 0.0 {
                return Err(DatavowError::invalid_parameter(
                    "threshold must be greater than or equal to zero",
                ));
            }
            let spec = parse_partition_object(kwargs.object_required("partition_object")?)?;

            if partition.considered_count() == 0 {
                return Ok(AggregateOutcome::flag(false));
            }

            let observed = observed_probabilities(&spec, partition)?;
            let weights = match &spec {
                PartitionSpec::Discrete { weights, .. } => weights,
                PartitionSpec::Continuous { weights, .. } => weights,
            };

            match kl_divergence(&observed, weights) {
                None => {
                    let mut summary = Map::new();
                    summary.insert("divergence".to_string(), json!("infinite"));
                    Ok(AggregateOutcome::flag(false).with_summary(summary))
                }
                Some(divergence) => Ok(AggregateOutcome::new(
                    divergence <= threshold,
                    divergence,
                )),
            }
        },
    );
}

impl<S: TabularSource> Dataset<S> {
    /// Expects the column's distribution to stay within `threshold` KL
    /// divergence of the reference partition object.
    pub fn expect_column_kl_divergence_less_than(
        &mut self,
        column: &str,
        partition_object: Value,
        threshold: f64,
        output_format: Option<OutputFormat>,
    ) -> Result<RenderedResult> {
        self.run_aggregate_expectation(
            "expect_column_kl_divergence_less_than",
            Kwargs::new()
                .with("column", column)
                .with("partition_object", partition_object)
                .with("threshold", threshold),
            output_format,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::InMemoryTable;

    fn categorical_dataset() -> Dataset<InMemoryTable> {
        Dataset::new(
            InMemoryTable::from_columns([(
                "color",
                vec![
                    json!("red"),
                    json!("red"),
                    json!("blue"),
                    json!("blue"),
                    Value::Null,
                ],
            )])
            .unwrap(),
        )
    }

    #[test]
    fn test_matching_categorical_distribution_has_zero_divergence() {
        let mut dataset = categorical_dataset();
        let result = dataset
            .expect_column_kl_divergence_less_than(
                "color",
                json!({"partition": ["red", "blue"], "weights": [0.5, 0.5]}),
                0.01,
                None,
            )
            .unwrap();
        assert!(result.success());
        assert_eq!(result.detail().unwrap().true_value, Some(json!(0.0)));
    }

    #[test]
    fn test_skewed_distribution_exceeds_threshold() {
        let mut dataset = categorical_dataset();
        let result = dataset
            .expect_column_kl_divergence_less_than(
                "color",
                json!({"partition": ["red", "blue"], "weights": [0.95, 0.05]}),
                0.1,
                None,
            )
            .unwrap();
        assert!(!result.success());
    }

    #[test]
    fn test_observed_mass_outside_reference_is_infinite() {
        let mut dataset = categorical_dataset();
        let result = dataset
            .expect_column_kl_divergence_less_than(
                "color",
                json!({"partition": ["red", "green"], "weights": [1.0, 0.0]}),
                10.0,
                None,
            )
            .unwrap();
        assert!(!result.success());
        assert_eq!(result.detail().unwrap().true_value, Some(Value::Null));
    }

    #[test]
    fn test_histogram_partition() {
        let mut dataset = Dataset::new(
            InMemoryTable::from_columns([(
                "score",
                vec![json!(0.5), json!(1.5), json!(1.6), json!(2.0)],
            )])
            .unwrap(),
        );
        // Bins [0,1) and [1,2]: observed 0.25 / 0.75.
        let result = dataset
            .expect_column_kl_divergence_less_than(
                "score",
                json!({"partition": [0.0, 1.0, 2.0], "weights": [0.25, 0.75]}),
                1e-9,
                None,
            )
            .unwrap();
        assert!(result.success());
    }

    #[test]
    fn test_malformed_partition_object_rejected() {
        let mut dataset = categorical_dataset();
        assert!(matches!(
            dataset.expect_column_kl_divergence_less_than(
                "color",
                json!({"partition": ["red"], "weights": [0.4, 0.4]}),
                0.1,
                None,
            ),
            Err(DatavowError::InvalidParameter(_))
        ));
        assert!(matches!(
            dataset.expect_column_kl_divergence_less_than(
                "color",
                json!({"partition": ["red", "blue"], "weights": [0.4, 0.4]}),
                0.1,
                None,
            ),
            Err(DatavowError::InvalidParameter(_))
        ));
    }
}
