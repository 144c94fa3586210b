//! Category label extraction
//!
//! Categorical values are keyed by their string form so that grouping,
//! cross-tabulation and joins agree regardless of the column dtype.

use polars::prelude::*;

use crate::error::{CategoricalError, Result};

/// Look up a column, mapping a missing name to [`CategoricalError::ColumnNotFound`].
pub(crate) fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| CategoricalError::ColumnNotFound(name.to_string()))
}

/// Convert a column to one optional label per row.
///
/// Strings are kept as-is, integers are written in decimal, floats use `{}`
/// formatting (so `1.0` becomes `"1"`) and booleans become `true`/`false`.
/// Nulls and float NaN stay `None`; `-0.0` is labelled like `0.0`.
pub fn column_labels(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| {
                    v.filter(|n| !n.is_nan())
                        .map(|n| format!("{}", if n == 0.0 { 0.0 } else { n }))
                })
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            // Categorical, enum, date and friends all have a string form
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}
