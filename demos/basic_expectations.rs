//! Record a handful of expectations against an in-memory table and print the
//! validation report.
//!
//! Run with: `cargo run --example basic_expectations`

use datavow::prelude::*;
use serde_json::{json, Value};

fn main() -> Result<()> {
    LogConfig::default().init();

    let table = InMemoryTable::from_columns([
        (
            "user_id",
            vec![json!(101), json!(102), json!(103), json!(103)],
        ),
        (
            "email",
            vec![
                json!("ada@example.com"),
                json!("grace@example.com"),
                Value::Null,
                json!("not-an-email"),
            ],
        ),
        ("age", vec![json!(36), json!(45), json!(29), Value::Null]),
    ])?;

    let mut dataset = Dataset::new(table);
    dataset.set_subject_name("users");

    dataset.expect_column_to_exist("user_id")?;
    dataset.expect_column_values_to_be_unique("user_id", ExpectationOptions::new())?;
    dataset.expect_column_values_to_match_regex(
        "email",
        r"^[^@]+@[^@]+$",
        ExpectationOptions::mostly(0.5),
    )?;
    dataset.expect_column_values_to_be_between(
        "age",
        Some(json!(0)),
        Some(json!(120)),
        ExpectationOptions::new(),
    )?;
    dataset.expect_column_mean_to_be_between("age", Some(18.0), Some(65.0), None)?;

    let report = dataset.validate();
    println!(
        "{}",
        HumanFormatter::with_config(datavow::formatters::FormatterConfig::detailed())
            .format(&report)?
    );
    Ok(())
}
