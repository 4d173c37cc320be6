//! Prelude for commonly used types in datavow.

pub use crate::core::{
    ExpectationRegistry, ExpectationSuite, Kwargs, OutputFormat, RenderedResult, ValidationReport,
};
pub use crate::dataset::{Dataset, ExpectationDefaults, ExpectationOptions};
pub use crate::error::{DatavowError, Result};
pub use crate::formatters::{HumanFormatter, JsonFormatter, ReportFormatter};
pub use crate::logging::LogConfig;
pub use crate::sources::{read_csv, InMemoryTable, TabularSource};
