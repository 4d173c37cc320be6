//! Expectation registry: the explicit mapping from expectation names to
//! evaluators, and the ordered argument map recorded with every invocation.
//!
//! Dispatch-by-name is what makes a stored suite replayable: `validate()`
//! looks each recorded `expectation_type` up here instead of reflecting over
//! methods.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::outcome::{AggregateOutcome, OutputFormat};
use super::protocol::{ColumnPartition, MapScope};
use crate::error::{DatavowError, Result};
use crate::sources::TabularSource;

/// The ordered argument map recorded into a suite with each invocation.
///
/// Values are always JSON-compatible; the typed accessors convert and
/// validate on the way out so evaluators see well-formed parameters or an
/// [`DatavowError::InvalidParameter`].
///
/// An explicit `null` argument is treated the same as an absent one, so a
/// replayed configuration written by a tool that records `null` optionals
/// behaves identically to a live call that omitted them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kwargs(Map<String, Value>);

impl Kwargs {
    /// Creates an empty argument map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing JSON map.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Adds an argument, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Adds an argument only when the caller supplied one.
    pub fn with_opt(mut self, name: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        if let Some(value) = value {
            self.0.insert(name.into(), value.into());
        }
        self
    }

    /// Adds an arbitrary serializable argument, failing with
    /// [`DatavowError::Serialization`] when the value cannot be captured as
    /// JSON.
    pub fn try_insert<T: Serialize>(&mut self, name: impl Into<String>, value: &T) -> Result<()> {
        let name = name.into();
        let json = serde_json::to_value(value).map_err(|source| DatavowError::Serialization {
            name: name.clone(),
            source,
        })?;
        self.0.insert(name, json);
        Ok(())
    }

    /// Inserts or replaces a raw JSON argument.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// The underlying JSON map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes into the underlying JSON map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// A present, non-null argument.
    pub fn value_opt(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// A required string argument.
    pub fn str_required(&self, name: &str) -> Result<&str> {
        self.value_opt(name)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DatavowError::invalid_parameter(format!("`{name}` must be a string"))
            })
    }

    /// An optional string argument.
    pub fn str_opt(&self, name: &str) -> Result<Option<&str>> {
        match self.value_opt(name) {
            None => Ok(None),
            Some(v) => v.as_str().map(Some).ok_or_else(|| {
                DatavowError::invalid_parameter(format!("`{name}` must be a string"))
            }),
        }
    }

    /// An optional float argument.
    pub fn f64_opt(&self, name: &str) -> Result<Option<f64>> {
        match self.value_opt(name) {
            None => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| {
                DatavowError::invalid_parameter(format!("`{name}` must be a number"))
            }),
        }
    }

    /// A required float argument.
    pub fn f64_required(&self, name: &str) -> Result<f64> {
        self.f64_opt(name)?.ok_or_else(|| {
            DatavowError::invalid_parameter(format!("`{name}` is required"))
        })
    }

    /// An optional non-negative integer argument.
    pub fn u64_opt(&self, name: &str) -> Result<Option<u64>> {
        match self.value_opt(name) {
            None => Ok(None),
            Some(v) => v.as_u64().map(Some).ok_or_else(|| {
                DatavowError::invalid_parameter(format!(
                    "`{name}` must be a non-negative integer"
                ))
            }),
        }
    }

    /// A required non-negative integer argument.
    pub fn u64_required(&self, name: &str) -> Result<u64> {
        self.u64_opt(name)?.ok_or_else(|| {
            DatavowError::invalid_parameter(format!("`{name}` is required"))
        })
    }

    /// A required array argument.
    pub fn array_required(&self, name: &str) -> Result<&Vec<Value>> {
        self.value_opt(name)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                DatavowError::invalid_parameter(format!("`{name}` must be an array"))
            })
    }

    /// A required object argument.
    pub fn object_required(&self, name: &str) -> Result<&Map<String, Value>> {
        self.value_opt(name)
            .and_then(Value::as_object)
            .ok_or_else(|| {
                DatavowError::invalid_parameter(format!("`{name}` must be an object"))
            })
    }

    /// The column name every column-level expectation requires.
    pub fn column(&self) -> Result<&str> {
        self.str_required("column")
    }

    /// The optional `mostly` fraction. Range validation happens in the
    /// threshold evaluator.
    pub fn mostly(&self) -> Result<Option<f64>> {
        self.f64_opt("mostly")
    }

    /// The effective output format: the recorded `output_format` string when
    /// present (leniently parsed), the supplied default otherwise.
    pub fn output_format(&self, default: OutputFormat) -> OutputFormat {
        match self.value_opt("output_format").and_then(Value::as_str) {
            Some(name) => OutputFormat::parse_lenient(name),
            None => default,
        }
    }
}

/// A compiled per-row predicate produced by a map-expectation factory.
pub type Predicate = Box<dyn Fn(&Value) -> bool>;

/// Builds a [`Predicate`] from recorded arguments and the column being
/// evaluated.
///
/// The partition is available so checks like uniqueness can precompute
/// column-level context; most factories ignore it.
pub type PredicateFactory =
    Arc<dyn for<'a> Fn(&Kwargs, &ColumnPartition<'a>) -> Result<Predicate> + Send + Sync>;

/// Computes a whole-column outcome from the non-null partition.
pub type AggregateFn =
    Arc<dyn for<'a> Fn(&Kwargs, &ColumnPartition<'a>) -> Result<AggregateOutcome> + Send + Sync>;

/// Evaluates a table-shape expectation against the whole source.
pub type TableFn =
    Arc<dyn Fn(&dyn TabularSource, &Kwargs) -> Result<AggregateOutcome> + Send + Sync>;

/// The capability class of a registered expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectationKind {
    /// Operates on the table shape, not a single column.
    Table,
    /// A per-row predicate over one column.
    ColumnMap,
    /// A single summary statistic over one column.
    ColumnAggregate,
}

#[derive(Clone)]
pub(crate) enum EvaluatorFlavor {
    Table(TableFn),
    Map {
        scope: MapScope,
        factory: PredicateFactory,
    },
    Aggregate(AggregateFn),
}

/// A registered evaluator plus its capability class.
#[derive(Clone)]
pub struct ExpectationEntry {
    kind: ExpectationKind,
    pub(crate) flavor: EvaluatorFlavor,
}

impl ExpectationEntry {
    /// The capability class of this evaluator.
    pub fn kind(&self) -> ExpectationKind {
        self.kind
    }
}

impl fmt::Debug for ExpectationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectationEntry")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// The name → evaluator mapping a dataset dispatches through.
///
/// Populated with the built-in catalogue at dataset construction; additional
/// evaluators can be registered at any time, and re-registering a name
/// replaces its evaluator.
#[derive(Clone, Default)]
pub struct ExpectationRegistry {
    entries: HashMap<String, ExpectationEntry>,
}

impl ExpectationRegistry {
    /// Creates a registry with no evaluators.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the built-in expectation catalogue.
    pub fn builtin() -> Self {
        crate::expectations::builtin_registry().clone()
    }

    /// Registers a table-shape evaluator.
    pub fn register_table<F>(&mut self, name: impl Into<String>, eval: F)
    where
        F: Fn(&dyn TabularSource, &Kwargs) -> Result<AggregateOutcome> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.into(),
            ExpectationEntry {
                kind: ExpectationKind::Table,
                flavor: EvaluatorFlavor::Table(Arc::new(eval)),
            },
        );
    }

    /// Registers a map evaluator judged over non-null rows only.
    pub fn register_map<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: for<'a> Fn(&Kwargs, &ColumnPartition<'a>) -> Result<Predicate>
            + Send
            + Sync
            + 'static,
    {
        self.register_map_scoped(name, MapScope::NonNull, factory);
    }

    /// Registers a map evaluator judged over every row, nulls included.
    ///
    /// The denominator becomes the full element count; only the nullity
    /// checks want this.
    pub fn register_map_over_all_values<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: for<'a> Fn(&Kwargs, &ColumnPartition<'a>) -> Result<Predicate>
            + Send
            + Sync
            + 'static,
    {
        self.register_map_scoped(name, MapScope::AllValues, factory);
    }

    fn register_map_scoped<F>(&mut self, name: impl Into<String>, scope: MapScope, factory: F)
    where
        F: for<'a> Fn(&Kwargs, &ColumnPartition<'a>) -> Result<Predicate>
            + Send
            + Sync
            + 'static,
    {
        self.entries.insert(
            name.into(),
            ExpectationEntry {
                kind: ExpectationKind::ColumnMap,
                flavor: EvaluatorFlavor::Map {
                    scope,
                    factory: Arc::new(factory),
                },
            },
        );
    }

    /// Registers a column-aggregate evaluator.
    pub fn register_aggregate<F>(&mut self, name: impl Into<String>, eval: F)
    where
        F: for<'a> Fn(&Kwargs, &ColumnPartition<'a>) -> Result<AggregateOutcome>
            + Send
            + Sync
            + 'static,
    {
        self.entries.insert(
            name.into(),
            ExpectationEntry {
                kind: ExpectationKind::ColumnAggregate,
                flavor: EvaluatorFlavor::Aggregate(Arc::new(eval)),
            },
        );
    }

    /// Looks up an evaluator by name.
    pub fn get(&self, name: &str) -> Option<&ExpectationEntry> {
        self.entries.get(name)
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted for deterministic listings.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered evaluators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ExpectationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectationRegistry")
            .field("names", &self.names())
            .finish()
    }
}
