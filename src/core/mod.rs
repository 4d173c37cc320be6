//! Core engine types for the datavow expectation library.
//!
//! This module holds everything an expectation flows through between a check
//! call and its result:
//!
//! - **[`ExpectationSuite`]**: the recorded, replayable configuration
//! - **[`ExpectationRegistry`]**: the name-to-evaluator dispatch map
//! - **[`ColumnPartition`]** and the map/aggregate protocols: the shared
//!   evaluation mechanics
//! - **[`threshold`]**: the `mostly` success rule
//! - **[`OutputFormat`] / [`RenderedResult`]**: the verbosity levels and
//!   result shapes
//! - **[`ValidationReport`]**: the replay output
//!
//! ```text
//! check call ──► Kwargs ──► suite.append ──► registry dispatch
//!                                               │
//!                      partition ── predicate/aggregate ── threshold
//!                                               │
//!                                           renderer ──► RenderedResult
//! ```

pub mod outcome;
pub mod protocol;
pub mod registry;
pub mod render;
pub mod report;
pub mod suite;
pub mod threshold;
pub mod value;

pub use outcome::{AggregateOutcome, OutputFormat, RenderedResult, ResultDetail};
pub use protocol::ColumnPartition;
pub use registry::{
    AggregateFn, ExpectationEntry, ExpectationKind, ExpectationRegistry, Kwargs, Predicate,
    PredicateFactory, TableFn,
};
pub use report::{ValidationMetrics, ValidationRecord, ValidationReport};
pub use suite::{ExpectationDefinition, ExpectationSuite};
