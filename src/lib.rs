//! # Datavow - Declarative Data-Quality Expectations for Rust
//!
//! Datavow lets you attach named, parameterized assertions ("expectations")
//! to a tabular dataset, persist them as a portable JSON configuration, and
//! replay the whole configuration against fresh data to produce a structured
//! pass/fail report. Record what good data looks like once; check every
//! later snapshot against it.
//!
//! ## Quick Start
//!
//! ```rust
//! use datavow::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> datavow::error::Result<()> {
//! let table = InMemoryTable::from_columns([
//!     ("user_id", vec![json!(1), json!(2), json!(3)]),
//!     ("email", vec![json!("a@example.com"), json!("b@example.com"), serde_json::Value::Null]),
//! ])?;
//! let mut dataset = Dataset::new(table);
//! dataset.set_subject_name("users");
//!
//! // Each call records its definition into the suite, then evaluates it.
//! dataset.expect_column_values_to_be_unique("user_id", ExpectationOptions::new())?;
//! dataset.expect_column_values_to_match_regex(
//!     "email",
//!     r"^[^@]+@[^@]+$",
//!     ExpectationOptions::mostly(0.9),
//! )?;
//!
//! // Persist the recorded suite...
//! let config = dataset.suite().to_json_pretty()?;
//!
//! // ...and replay it later, against this or any other snapshot.
//! let suite = ExpectationSuite::from_json(&config)?;
//! let fresh = Dataset::with_suite(dataset.source().clone(), suite);
//! let report = fresh.validate();
//! assert!(report.success());
//! # Ok(())
//! # }
//! ```
//!
//! ## The expectation lifecycle
//!
//! Every `expect_*` method follows the same path:
//!
//! 1. its arguments are bound into an ordered JSON kwargs map;
//! 2. an `{expectation_type, kwargs}` definition is recorded into the
//!    dataset's [`ExpectationSuite`](core::ExpectationSuite), with at most
//!    one definition per name (last write wins);
//! 3. the name is dispatched through the
//!    [`ExpectationRegistry`](core::ExpectationRegistry) to its evaluator;
//! 4. the shared protocols partition the column into null and non-null rows,
//!    run the predicate or aggregate, and decide success (the optional
//!    `mostly` fraction tolerates partial failure);
//! 5. the outcome is rendered at the requested verbosity
//!    ([`OutputFormat`](core::OutputFormat)).
//!
//! Recording happens before evaluation, so even a failing call leaves its
//! intent in the suite. [`Dataset::validate`](dataset::Dataset::validate)
//! drives the same evaluators from the stored definitions without
//! re-recording, and turns per-expectation errors into failed records rather
//! than aborting the run.
//!
//! ## Custom expectations
//!
//! The built-in catalogue is registered through the same public API custom
//! checks use: hand the registry a predicate factory (map), an aggregate
//! function, or a table-shape function, and invoke it by name with
//! [`Dataset::record_and_evaluate`](dataset::Dataset::record_and_evaluate).
//!
//! ```rust
//! use datavow::prelude::*;
//! use serde_json::{json, Value};
//!
//! # fn main() -> datavow::error::Result<()> {
//! let table = InMemoryTable::from_columns([("n", vec![json!(3), json!(8)])])?;
//! let mut dataset = Dataset::new(table);
//!
//! use datavow::core::Predicate;
//!
//! dataset.registry_mut().register_map("expect_column_values_to_be_odd", |_kwargs, _partition| {
//!     Ok(Box::new(|v: &Value| v.as_i64().map_or(false, |n| n % 2 != 0)) as Predicate)
//! });
//!
//! let result = dataset.record_and_evaluate(
//!     "expect_column_values_to_be_odd",
//!     Kwargs::new().with("column", "n"),
//! )?;
//! assert!(!result.success());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`core`**: suite configuration, registry, evaluation protocols,
//!   threshold rule, output shapes, validation report
//! - **`dataset`**: the façade owning a source plus its suite and defaults
//! - **`expectations`**: the built-in check catalogue
//! - **`sources`**: the `TabularSource` trait, in-memory tables, Arrow and
//!   CSV ingestion
//! - **`formatters`**: JSON and human rendering of validation reports
//! - **`logging`**: `tracing` subscriber presets
//!
//! The engine is synchronous and single-threaded by design: one snapshot,
//! one configuration, no I/O during evaluation.

pub mod core;
pub mod dataset;
pub mod error;
pub mod expectations;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod sources;
