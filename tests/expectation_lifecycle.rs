//! End-to-end lifecycle tests for custom expectations: registration,
//! recording, evaluation formats, and per-dataset defaults.

use datavow::core::{OutputFormat, Predicate, RenderedResult};
use datavow::dataset::{Dataset, ExpectationOptions};
use datavow::sources::InMemoryTable;
use serde_json::{json, Value};

fn parity_dataset() -> Dataset<InMemoryTable> {
    let table = InMemoryTable::from_columns([
        (
            "all_odd",
            vec![
                json!(1),
                json!(3),
                json!(5),
                json!(5),
                json!(5),
                json!(7),
                json!(9),
                json!(9),
                json!(9),
                json!(11),
            ],
        ),
        (
            "mostly_odd",
            vec![
                json!(1),
                json!(3),
                json!(5),
                json!(7),
                json!(9),
                json!(2),
                json!(4),
                json!(1),
                json!(3),
                json!(5),
            ],
        ),
        (
            "odd_missing",
            vec![
                json!(1),
                json!(3),
                json!(5),
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                json!(1),
                json!(3),
                Value::Null,
            ],
        ),
        (
            "mixed_missing",
            vec![
                json!(1),
                json!(3),
                json!(5),
                Value::Null,
                Value::Null,
                json!(2),
                json!(4),
                json!(1),
                json!(3),
                Value::Null,
            ],
        ),
        ("all_missing", vec![Value::Null; 10]),
    ])
    .unwrap();

    let mut dataset = Dataset::new(table);
    dataset
        .registry_mut()
        .register_map("expect_column_values_to_be_odd", |_kwargs, _partition| {
            Ok(Box::new(|v: &Value| v.as_i64().map_or(false, |n| n % 2 != 0)) as Predicate)
        });
    dataset
}

fn run_odd(
    dataset: &mut Dataset<InMemoryTable>,
    column: &str,
    options: ExpectationOptions,
) -> RenderedResult {
    use datavow::core::Kwargs;
    let kwargs = Kwargs::new()
        .with("column", column)
        .with_opt("mostly", options.mostly)
        .with_opt("output_format", options.output_format.map(|f| f.as_str()));
    dataset
        .record_and_evaluate("expect_column_values_to_be_odd", kwargs)
        .unwrap()
}

#[test]
fn test_custom_map_expectation_happy_path() {
    let mut dataset = parity_dataset();
    let result = run_odd(&mut dataset, "all_odd", ExpectationOptions::new());
    assert!(result.success());
    assert_eq!(result.detail().unwrap().exception_list, Some(vec![]));
}

#[test]
fn test_custom_map_expectation_exceptions_in_order() {
    let mut dataset = parity_dataset();
    let result = run_odd(&mut dataset, "mostly_odd", ExpectationOptions::new());
    assert!(!result.success());
    assert_eq!(
        result.detail().unwrap().exception_list,
        Some(vec![json!(2), json!(4)])
    );
}

#[test]
fn test_mostly_rescues_partial_failures() {
    let mut dataset = parity_dataset();
    // 8 of 10 pass.
    let result = run_odd(&mut dataset, "mostly_odd", ExpectationOptions::mostly(0.6));
    assert!(result.success());
    assert_eq!(
        result.detail().unwrap().exception_list,
        Some(vec![json!(2), json!(4)])
    );
}

#[test]
fn test_boolean_only_override() {
    let mut dataset = parity_dataset();
    let result = run_odd(
        &mut dataset,
        "mostly_odd",
        ExpectationOptions::format(OutputFormat::BooleanOnly),
    );
    assert_eq!(result, RenderedResult::BooleanOnly(false));
}

#[test]
fn test_dataset_default_output_format() {
    let mut dataset = parity_dataset();
    dataset.set_default_output_format(OutputFormat::BooleanOnly);
    let result = run_odd(&mut dataset, "mostly_odd", ExpectationOptions::new());
    assert_eq!(result, RenderedResult::BooleanOnly(false));

    // A per-call override still wins over the dataset default.
    let result = run_odd(
        &mut dataset,
        "mostly_odd",
        ExpectationOptions::format(OutputFormat::Basic),
    );
    assert!(result.detail().is_some());
}

#[test]
fn test_nulls_are_not_exceptions() {
    let mut dataset = parity_dataset();
    let result = run_odd(&mut dataset, "odd_missing", ExpectationOptions::new());
    assert!(result.success());
    assert_eq!(result.detail().unwrap().exception_list, Some(vec![]));

    let result = run_odd(&mut dataset, "mixed_missing", ExpectationOptions::new());
    assert!(!result.success());
    assert_eq!(
        result.detail().unwrap().exception_list,
        Some(vec![json!(2), json!(4)])
    );
    // 5 of 7 considered rows pass.
    let result = run_odd(
        &mut dataset,
        "mixed_missing",
        ExpectationOptions::mostly(0.7),
    );
    assert!(result.success());
}

#[test]
fn test_all_null_column_passes_regardless_of_mostly() {
    let mut dataset = parity_dataset();
    for options in [
        ExpectationOptions::new(),
        ExpectationOptions::mostly(1.0),
        ExpectationOptions::mostly(0.0),
    ] {
        let result = run_odd(&mut dataset, "all_missing", options);
        assert!(result.success());
        assert_eq!(result.detail().unwrap().exception_list, Some(vec![]));
    }
}

#[test]
fn test_duplicate_values_are_judged_per_row() {
    // A duplicated odd value is still odd on every row it occupies.
    let table =
        InMemoryTable::from_columns([("n", vec![json!(1), json!(3), json!(5), json!(5), json!(7)])])
            .unwrap();
    let mut dataset = Dataset::new(table);
    dataset
        .registry_mut()
        .register_map("expect_column_values_to_be_odd", |_kwargs, _partition| {
            Ok(Box::new(|v: &Value| v.as_i64().map_or(false, |n| n % 2 != 0)) as Predicate)
        });

    let result = run_odd(&mut dataset, "n", ExpectationOptions::new());
    assert!(result.success());
    assert_eq!(result.detail().unwrap().exception_list, Some(vec![]));
}

#[test]
fn test_even_split_meets_exact_threshold() {
    let table = InMemoryTable::from_columns([(
        "n",
        vec![json!(1), json!(2), json!(3), json!(4), json!(5)],
    )])
    .unwrap();
    let mut dataset = Dataset::new(table);
    dataset
        .registry_mut()
        .register_map("expect_column_values_to_be_odd", |_kwargs, _partition| {
            Ok(Box::new(|v: &Value| v.as_i64().map_or(false, |n| n % 2 != 0)) as Predicate)
        });

    // 3 of 5 = 0.6 meets mostly = 0.6.
    let result = run_odd(&mut dataset, "n", ExpectationOptions::mostly(0.6));
    assert!(result.success());
    assert_eq!(
        result.detail().unwrap().exception_list,
        Some(vec![json!(2), json!(4)])
    );
}

#[test]
fn test_recording_keeps_the_latest_invocation() {
    let mut dataset = parity_dataset();
    run_odd(&mut dataset, "all_odd", ExpectationOptions::new());
    run_odd(&mut dataset, "mostly_odd", ExpectationOptions::mostly(0.6));

    let suite = dataset.suite();
    assert_eq!(suite.len(), 1);
    let definition = suite.get("expect_column_values_to_be_odd").unwrap();
    assert_eq!(definition.kwargs["column"], json!("mostly_odd"));
    assert_eq!(definition.kwargs["mostly"], json!(0.6));
}

#[test]
fn test_custom_prime_expectation() {
    fn is_prime(n: i64) -> bool {
        if n < 2 {
            return false;
        }
        if n == 2 {
            return true;
        }
        if n % 2 == 0 {
            return false;
        }
        let mut x = 3;
        while x * x <= n {
            if n % x == 0 {
                return false;
            }
            x += 2;
        }
        true
    }

    let table = InMemoryTable::from_columns([
        (
            "primes",
            vec![json!(3), json!(5), json!(7), json!(11), Value::Null],
        ),
        (
            "ages",
            vec![json!(30), json!(25), json!(31), json!(63), json!(2)],
        ),
    ])
    .unwrap();
    let mut dataset = Dataset::new(table);
    dataset
        .registry_mut()
        .register_map("expect_column_values_to_be_prime", |_kwargs, _partition| {
            Ok(Box::new(|v: &Value| v.as_i64().map_or(false, is_prime)) as Predicate)
        });

    let result = dataset
        .record_and_evaluate(
            "expect_column_values_to_be_prime",
            datavow::core::Kwargs::new().with("column", "primes"),
        )
        .unwrap();
    assert!(result.success());

    let result = dataset
        .record_and_evaluate(
            "expect_column_values_to_be_prime",
            datavow::core::Kwargs::new().with("column", "ages"),
        )
        .unwrap();
    assert!(!result.success());
    assert_eq!(
        result.detail().unwrap().exception_list,
        Some(vec![json!(30), json!(25), json!(63)])
    );
}
