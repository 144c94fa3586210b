//! Target column analysis and mapping
//!
//! This module validates binary 0/1 targets and maps non-binary target
//! columns (e.g. "G"/"B") to the 0/1 format required for WoE encoding.

use std::collections::BTreeSet;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::labels::{column_labels, require_column};
use crate::error::{CategoricalError, Result};

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Maximum number of offending values reported in an `InvalidTarget` error
const MAX_REPORTED_VALUES: usize = 10;

/// Mapping configuration for converting target column values to binary 0/1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMapping {
    /// Value that maps to 1 (event)
    pub event_value: String,
    /// Value that maps to 0 (non-event)
    pub non_event_value: String,
}

impl TargetMapping {
    /// Create a new target mapping
    pub fn new(event_value: impl Into<String>, non_event_value: impl Into<String>) -> Self {
        Self {
            event_value: event_value.into(),
            non_event_value: non_event_value.into(),
        }
    }
}

/// Result of analyzing a target column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetAnalysis {
    /// Target column is already binary 0/1, no mapping needed
    AlreadyBinary,
    /// Target column needs mapping - contains these unique values
    NeedsMapping { unique_values: Vec<String> },
}

/// Analyze a target column to determine if it needs value mapping
///
/// # Returns
/// - `AlreadyBinary` if the column contains only 0 and 1 values
/// - `NeedsMapping` with the sorted list of unique values otherwise
pub fn analyze_target_column(df: &DataFrame, target: &str) -> Result<TargetAnalysis> {
    let target_col = require_column(df, target)?;

    if target_col.len() == 0 || target_col.null_count() == target_col.len() {
        return Err(CategoricalError::EmptyTarget(target.to_string()));
    }

    if is_numeric_target(target_col) && binary_values(target_col)?.is_ok() {
        return Ok(TargetAnalysis::AlreadyBinary);
    }

    let unique_values: Vec<String> = column_labels(target_col)?
        .into_iter()
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    Ok(TargetAnalysis::NeedsMapping { unique_values })
}

/// Resolve the target column to one `Option<i32>` per row.
///
/// Without a mapping the column must be numeric or boolean with values in
/// {0, 1}; nulls resolve to `None`. With a mapping, values equal to the event
/// value resolve to 1, the non-event value to 0, and everything else to `None`.
pub fn resolve_target(
    df: &DataFrame,
    target: &str,
    mapping: Option<&TargetMapping>,
) -> Result<Vec<Option<i32>>> {
    let mask = match mapping {
        Some(mapping) => create_target_mask(df, target, mapping)?,
        None => {
            let target_col = require_column(df, target)?;
            if !is_numeric_target(target_col) {
                return Err(CategoricalError::InvalidTarget {
                    column: target.to_string(),
                    found: offending_labels(target_col)?,
                });
            }
            binary_values(target_col)?.map_err(|found| CategoricalError::InvalidTarget {
                column: target.to_string(),
                found,
            })?
        }
    };

    if mask.iter().all(Option::is_none) {
        return Err(CategoricalError::EmptyTarget(target.to_string()));
    }

    Ok(mask)
}

/// Create a binary target mask based on the mapping
///
/// Returns a Vec<Option<i32>> where:
/// - Some(1) for event values
/// - Some(0) for non-event values
/// - None for values that don't match either (ignored during analysis)
pub fn create_target_mask(
    df: &DataFrame,
    target: &str,
    mapping: &TargetMapping,
) -> Result<Vec<Option<i32>>> {
    if mapping.event_value == mapping.non_event_value {
        return Err(CategoricalError::InvalidConfig(format!(
            "target mapping uses '{}' for both event and non-event",
            mapping.event_value
        )));
    }

    let target_col = require_column(df, target)?;
    let mask = column_labels(target_col)?
        .iter()
        .map(|v| match v {
            Some(s) if s == &mapping.event_value => Some(1),
            Some(s) if s == &mapping.non_event_value => Some(0),
            _ => None,
        })
        .collect();

    Ok(mask)
}

/// Count how many records match the event and non-event values
///
/// Returns `(events, non_events, ignored)`.
pub fn count_mapped_records(
    df: &DataFrame,
    target: &str,
    mapping: &TargetMapping,
) -> Result<(usize, usize, usize)> {
    let mask = create_target_mask(df, target, mapping)?;

    let events = mask.iter().filter(|v| **v == Some(1)).count();
    let non_events = mask.iter().filter(|v| **v == Some(0)).count();
    let ignored = mask.iter().filter(|v| v.is_none()).count();

    Ok((events, non_events, ignored))
}

fn is_numeric_target(col: &Column) -> bool {
    col.dtype().is_primitive_numeric() || col.dtype() == &DataType::Boolean
}

/// Convert a numeric column to 0/1 values, or return the offending values.
fn binary_values(col: &Column) -> Result<std::result::Result<Vec<Option<i32>>, Vec<String>>> {
    let float_col = col.cast(&DataType::Float64)?;
    let ca = float_col.f64()?;

    let mut values = Vec::with_capacity(ca.len());
    let mut offending: BTreeSet<String> = BTreeSet::new();

    for v in ca.iter() {
        match v {
            Some(x) if x.abs() < TOLERANCE => values.push(Some(0)),
            Some(x) if (x - 1.0).abs() < TOLERANCE => values.push(Some(1)),
            Some(x) => {
                offending.insert(format!("{}", x));
                values.push(None);
            }
            None => values.push(None),
        }
    }

    if offending.is_empty() {
        Ok(Ok(values))
    } else {
        Ok(Err(offending.into_iter().take(MAX_REPORTED_VALUES).collect()))
    }
}

fn offending_labels(col: &Column) -> Result<Vec<String>> {
    Ok(column_labels(col)?
        .into_iter()
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(MAX_REPORTED_VALUES)
        .collect())
}
