//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

/// Tolerance for floating point comparisons in tests
pub const EPS: f64 = 1e-9;

/// Create the two-category credit DataFrame with known WoE values
///
/// - `var` = "A": target [1, 1, 0, 0] (count 4, sum 2)
/// - `var` = "B": target [1, 1, 1, 0] (count 4, sum 3)
/// - overall default rate 5/8
pub fn create_credit_dataframe() -> DataFrame {
    df! {
        "var" => ["A", "A", "A", "A", "B", "B", "B", "B"],
        "default" => [1i32, 1, 0, 0, 1, 1, 1, 0],
    }
    .unwrap()
}

/// Create a DataFrame with known association patterns
///
/// - `a` and `b` determine each other (Cramér's V = 1)
/// - `a` and `indep` are independent (Cramér's V = 0)
/// - `constant` has a single value
pub fn create_association_dataframe() -> DataFrame {
    df! {
        "a" => ["x", "x", "y", "y", "z", "z"],
        "b" => ["p", "p", "q", "q", "r", "r"],
        "indep" => ["u", "v", "u", "v", "u", "v"],
        "constant" => ["k", "k", "k", "k", "k", "k"],
    }
    .unwrap()
}

/// Create a random DataFrame of categorical columns plus a binary target
///
/// Columns `cat_0..cat_{cols}` draw from `categories` labels each.
pub fn create_random_categorical_dataframe(
    rows: usize,
    cols: usize,
    categories: usize,
    seed: u64,
) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);

    let target: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    columns.push(Column::new("target".into(), target));

    for i in 0..cols {
        let values: Vec<String> = (0..rows)
            .map(|_| format!("c{}", rng.gen_range(0..categories)))
            .collect();
        columns.push(Column::new(format!("cat_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Read a Float64 column as a Vec of optional values
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Assert two floats are equal within tolerance
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "Expected {} (±{}), got {}",
        expected,
        tolerance,
        actual
    );
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}
