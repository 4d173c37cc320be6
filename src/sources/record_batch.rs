//! Arrow [`RecordBatch`] → [`InMemoryTable`] conversion.
//!
//! Covers the types Arrow's CSV schema inference produces plus the common
//! primitive widths. Arrow nulls and non-finite floats become
//! [`Value::Null`]; temporal types render as strings so the datetime
//! expectations can see them.

use arrow::array::{
    Array, BooleanArray, Date32Array, Date64Array, Float32Array, Float64Array, Int16Array,
    Int32Array, Int64Array, Int8Array, LargeStringArray, RecordBatch, StringArray,
    TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::{DataType, TimeUnit};
use chrono::{DateTime, Duration, NaiveDate};
use serde_json::{json, Value};

use super::InMemoryTable;
use crate::error::{DatavowError, Result};

fn downcast<'a, T: 'static>(array: &'a dyn Array, type_name: &str) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        DatavowError::invalid_parameter(format!("expected {type_name} array"))
    })
}

fn cells<A, F>(array: &A, get: F) -> Vec<Value>
where
    A: Array,
    F: Fn(&A, usize) -> Value,
{
    (0..array.len())
        .map(|i| {
            if array.is_null(i) {
                Value::Null
            } else {
                get(array, i)
            }
        })
        .collect()
}

fn date32_to_value(days: i32) -> Value {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date");
    match epoch.checked_add_signed(Duration::days(days as i64)) {
        Some(date) => json!(date.format("%Y-%m-%d").to_string()),
        None => Value::Null,
    }
}

fn timestamp_to_value(secs: i64, nanos: u32) -> Value {
    match DateTime::from_timestamp(secs, nanos) {
        Some(dt) => json!(dt.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        None => Value::Null,
    }
}

fn column_values(array: &dyn Array) -> Result<Vec<Value>> {
    let values = match array.data_type() {
        DataType::Null => vec![Value::Null; array.len()],
        DataType::Boolean => {
            cells(downcast::<BooleanArray>(array, "boolean")?, |a, i| {
                json!(a.value(i))
            })
        }
        DataType::Int8 => cells(downcast::<Int8Array>(array, "int8")?, |a, i| {
            json!(a.value(i))
        }),
        DataType::Int16 => cells(downcast::<Int16Array>(array, "int16")?, |a, i| {
            json!(a.value(i))
        }),
        DataType::Int32 => cells(downcast::<Int32Array>(array, "int32")?, |a, i| {
            json!(a.value(i))
        }),
        DataType::Int64 => cells(downcast::<Int64Array>(array, "int64")?, |a, i| {
            json!(a.value(i))
        }),
        DataType::UInt8 => cells(downcast::<UInt8Array>(array, "uint8")?, |a, i| {
            json!(a.value(i))
        }),
        DataType::UInt16 => cells(downcast::<UInt16Array>(array, "uint16")?, |a, i| {
            json!(a.value(i))
        }),
        DataType::UInt32 => cells(downcast::<UInt32Array>(array, "uint32")?, |a, i| {
            json!(a.value(i))
        }),
        DataType::UInt64 => cells(downcast::<UInt64Array>(array, "uint64")?, |a, i| {
            json!(a.value(i))
        }),
        // json! maps non-finite floats to null, which is exactly the missing
        // marker we want for NaN cells.
        DataType::Float32 => cells(downcast::<Float32Array>(array, "float32")?, |a, i| {
            json!(a.value(i) as f64)
        }),
        DataType::Float64 => cells(downcast::<Float64Array>(array, "float64")?, |a, i| {
            json!(a.value(i))
        }),
        DataType::Utf8 => cells(downcast::<StringArray>(array, "utf8")?, |a, i| {
            json!(a.value(i))
        }),
        DataType::LargeUtf8 => {
            cells(downcast::<LargeStringArray>(array, "large utf8")?, |a, i| {
                json!(a.value(i))
            })
        }
        DataType::Date32 => cells(downcast::<Date32Array>(array, "date32")?, |a, i| {
            date32_to_value(a.value(i))
        }),
        DataType::Date64 => cells(downcast::<Date64Array>(array, "date64")?, |a, i| {
            let millis = a.value(i);
            timestamp_to_value(
                millis.div_euclid(1_000),
                (millis.rem_euclid(1_000) * 1_000_000) as u32,
            )
        }),
        DataType::Timestamp(unit, _) => match unit {
            TimeUnit::Second => {
                cells(downcast::<TimestampSecondArray>(array, "timestamp")?, |a, i| {
                    timestamp_to_value(a.value(i), 0)
                })
            }
            TimeUnit::Millisecond => cells(
                downcast::<TimestampMillisecondArray>(array, "timestamp")?,
                |a, i| {
                    let millis = a.value(i);
                    timestamp_to_value(
                        millis.div_euclid(1_000),
                        (millis.rem_euclid(1_000) * 1_000_000) as u32,
                    )
                },
            ),
            TimeUnit::Microsecond => cells(
                downcast::<TimestampMicrosecondArray>(array, "timestamp")?,
                |a, i| {
                    let micros = a.value(i);
                    timestamp_to_value(
                        micros.div_euclid(1_000_000),
                        (micros.rem_euclid(1_000_000) * 1_000) as u32,
                    )
                },
            ),
            TimeUnit::Nanosecond => cells(
                downcast::<TimestampNanosecondArray>(array, "timestamp")?,
                |a, i| {
                    let nanos = a.value(i);
                    timestamp_to_value(
                        nanos.div_euclid(1_000_000_000),
                        nanos.rem_euclid(1_000_000_000) as u32,
                    )
                },
            ),
        },
        other => {
            return Err(DatavowError::invalid_parameter(format!(
                "unsupported Arrow data type: {other}"
            )))
        }
    };
    Ok(values)
}

impl TryFrom<&RecordBatch> for InMemoryTable {
    type Error = DatavowError;

    fn try_from(batch: &RecordBatch) -> Result<Self> {
        let mut table = InMemoryTable::empty();
        for (field, array) in batch.schema().fields().iter().zip(batch.columns()) {
            table.push_column(field.name().clone(), column_values(array.as_ref())?)?;
        }
        Ok(table)
    }
}
