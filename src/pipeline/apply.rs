//! Attach WoE encodings to a dataset
//!
//! A left join of the dataset against a [`WoeTable`] on the table's variable
//! column, implemented as a hash lookup over the dataset rows.

use std::collections::HashMap;

use polars::prelude::*;

use super::labels::{column_labels, require_column};
use super::woe::WoeTable;
use crate::error::{CategoricalError, Result};

/// Return a copy of `df` with an extra `Float64` column `woe_name` holding each
/// row's WoE encoding.
///
/// Every input row is kept in order. Labels absent from the table become null;
/// null labels take the missing bin's encoding when the table has one.
///
/// # Errors
/// * `UnknownEncoding` - `woe_name` is not the table's encoding column
/// * `ColumnNotFound` - `df` lacks the table's variable column
/// * `DuplicateColumn` - `df` already has a column named `woe_name`
pub fn apply_woe(df: &DataFrame, table: &WoeTable, woe_name: &str) -> Result<DataFrame> {
    if woe_name != table.woe_name {
        return Err(CategoricalError::UnknownEncoding {
            requested: woe_name.to_string(),
            available: table.woe_name.clone(),
        });
    }

    let key_col = require_column(df, &table.variable)?;

    if df
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == woe_name)
    {
        return Err(CategoricalError::DuplicateColumn(woe_name.to_string()));
    }

    let lookup: HashMap<&str, f64> = table
        .categories
        .iter()
        .map(|c| (c.category.as_str(), c.woe))
        .collect();
    let missing_woe = table.missing_bin.as_ref().map(|b| b.woe);

    let encoded: Vec<Option<f64>> = column_labels(key_col)?
        .iter()
        .map(|label| match label {
            Some(label) => lookup.get(label.as_str()).copied(),
            None => missing_woe,
        })
        .collect();

    let mut out = df.clone();
    out.with_column(Column::new(woe_name.into(), encoded))?;

    Ok(out)
}

/// Apply several WoE tables in sequence, each adding its own encoding column.
pub fn apply_woe_tables(df: &DataFrame, tables: &[WoeTable]) -> Result<DataFrame> {
    let mut out = df.clone();
    for table in tables {
        out = apply_woe(&out, table, &table.woe_name)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::woe::{compute_woe_table_with_config, WoeConfig};

    fn fixture() -> DataFrame {
        df! {
            "var" => ["A", "A", "B", "B", "B", "A"],
            "target" => [1i32, 0, 1, 1, 0, 0],
        }
        .unwrap()
    }

    #[test]
    fn test_unknown_encoding_name() {
        let df = fixture();
        let table =
            compute_woe_table_with_config(&df, "var", "var_woe", "target", &WoeConfig::default())
                .unwrap();

        let err = apply_woe(&df, &table, "other").unwrap_err();
        assert!(matches!(err, CategoricalError::UnknownEncoding { .. }));
    }

    #[test]
    fn test_duplicate_output_column() {
        let df = fixture();
        let table =
            compute_woe_table_with_config(&df, "var", "target", "target", &WoeConfig::default())
                .unwrap();

        let err = apply_woe(&df, &table, "target").unwrap_err();
        assert!(matches!(err, CategoricalError::DuplicateColumn(ref c) if c == "target"));
    }

    #[test]
    fn test_missing_key_column() {
        let df = fixture();
        let table =
            compute_woe_table_with_config(&df, "var", "var_woe", "target", &WoeConfig::default())
                .unwrap();

        let other = df! { "x" => [1i32, 2] }.unwrap();
        let err = apply_woe(&other, &table, "var_woe").unwrap_err();
        assert!(matches!(err, CategoricalError::ColumnNotFound(ref c) if c == "var"));
    }
}
