//! Persist a recorded suite to disk, then replay it against a drifted
//! snapshot of the same table.
//!
//! Run with: `cargo run --example suite_replay`

use datavow::prelude::*;
use serde_json::{json, Value};

fn baseline() -> Result<InMemoryTable> {
    InMemoryTable::from_columns([
        (
            "status",
            vec![json!("shipped"), json!("pending"), json!("shipped")],
        ),
        ("amount", vec![json!(12.0), json!(30.5), json!(7.0)]),
    ])
}

fn drifted() -> Result<InMemoryTable> {
    InMemoryTable::from_columns([
        (
            "status",
            vec![json!("shipped"), json!("unknown"), Value::Null],
        ),
        ("amount", vec![json!(12.0), json!(-3.0), json!(900.0)]),
    ])
}

fn main() -> Result<()> {
    LogConfig::default().init();

    // Record what good data looks like.
    let mut dataset = Dataset::new(baseline()?);
    dataset.set_subject_name("orders");
    dataset.expect_column_values_to_not_be_null("status", ExpectationOptions::new())?;
    dataset.expect_column_values_to_be_in_set(
        "status",
        vec![json!("shipped"), json!("pending"), json!("cancelled")],
        ExpectationOptions::new(),
    )?;
    dataset.expect_column_values_to_be_between(
        "amount",
        Some(json!(0)),
        Some(json!(500)),
        ExpectationOptions::new(),
    )?;

    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("orders.expectations.json");
    dataset.suite().save_to_path(&config_path)?;

    // Later, somewhere else: load the config and check a fresh snapshot.
    let suite = ExpectationSuite::load_from_path(&config_path)?;
    let report = Dataset::with_suite(drifted()?, suite).validate();

    println!("{}", JsonFormatter::pretty().format(&report)?);
    println!(
        "snapshot {}",
        if report.success() { "passed" } else { "failed" }
    );
    Ok(())
}
