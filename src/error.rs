//! Error types for categorical variable analysis.
//!
//! Every public operation validates its inputs before computing and returns
//! one of these variants instead of a NaN or infinite result.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while analyzing or encoding categorical variables.
#[derive(Debug, Error)]
pub enum CategoricalError {
    /// A referenced column is not present in the DataFrame.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A column has fewer than two distinct observed values, so Cramér's V is
    /// undefined (the `min(rows, cols) - 1` denominator would be zero).
    #[error("Column '{column}' has {distinct} distinct value(s); at least 2 are required")]
    DegenerateCardinality {
        /// Column with insufficient cardinality
        column: String,
        /// Number of distinct non-null values observed
        distinct: usize,
    },

    /// Target column contains values other than 0 and 1.
    #[error("Target column '{column}' must be binary (0/1). Found values: {found:?}")]
    InvalidTarget {
        /// Target column name
        column: String,
        /// Offending values (sorted, truncated)
        found: Vec<String>,
    },

    /// Target column has no usable (non-null, mapped) values.
    #[error("Target column '{0}' has no valid (non-null) values")]
    EmptyTarget(String),

    /// Target column is all 0s or all 1s.
    #[error("Target column '{0}' has no variation (all 0s or all 1s)")]
    ConstantTarget(String),

    /// A category is all events or all non-events and the policy rejects it.
    #[error("Category '{category}' of '{column}' has no variation in target")]
    DegenerateGroup {
        /// Variable column name
        column: String,
        /// Offending category label
        category: String,
    },

    /// Requested encoding column is not the one the WoE table carries.
    #[error("WoE table has no encoding column '{requested}' (available: '{available}')")]
    UnknownEncoding {
        /// Encoding name passed by the caller
        requested: String,
        /// Encoding name stored in the table
        available: String,
    },

    /// Output column would overwrite an existing column.
    #[error("Column '{0}' already exists in the DataFrame")]
    DuplicateColumn(String),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CategoricalError>;
