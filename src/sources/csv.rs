//! CSV ingestion via Arrow's reader with schema inference.

use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::{InMemoryTable, TabularSource};
use crate::error::Result;

/// Reads a headered CSV file into an [`InMemoryTable`].
///
/// Column types are inferred by Arrow over the whole file; empty cells come
/// through as nulls. A header-only file yields the named columns with zero
/// rows.
pub fn read_csv(path: impl AsRef<Path>) -> Result<InMemoryTable> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut file, None)?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .build(file)?;

    let mut table: Option<InMemoryTable> = None;
    for batch in reader {
        let chunk = InMemoryTable::try_from(&batch?)?;
        match table.as_mut() {
            None => table = Some(chunk),
            Some(existing) => existing.extend_rows(chunk)?,
        }
    }

    let table = match table {
        Some(table) => table,
        None => {
            // No data rows: materialize the inferred columns empty.
            let mut empty = InMemoryTable::empty();
            for field in schema.fields() {
                empty.push_column(field.name().clone(), Vec::new())?;
            }
            empty
        }
    };

    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_names().len(),
        "Loaded CSV source"
    );
    Ok(table)
}
