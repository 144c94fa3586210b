//! Association between categorical variables
//!
//! Cramér's V built on Pearson's chi-squared statistic (no continuity
//! correction) over the cross-tabulation of two columns.

use std::collections::BTreeMap;

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use super::labels::{column_labels, require_column};
use crate::error::{CategoricalError, Result};

/// Represents an associated pair of categorical features
#[derive(Debug, Clone, Serialize)]
pub struct AssociatedPair {
    pub feature1: String,
    pub feature2: String,
    pub cramers_v: f64,
}

/// Result of Pearson's chi-squared test of independence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChiSquaredTest {
    /// Chi-squared statistic (no continuity correction)
    pub statistic: f64,
    /// Degrees of freedom, `(rows - 1) * (cols - 1)`
    pub degrees_of_freedom: usize,
    /// Probability of a statistic at least this large under independence
    pub p_value: f64,
    /// Number of observations in the contingency table
    pub observations: f64,
}

/// Cross-tabulated counts of two label sequences.
///
/// Rows and columns are the distinct observed labels in sorted order; pairs
/// with a missing value on either side are dropped.
#[derive(Debug)]
struct ContingencyTable {
    counts: Vec<Vec<f64>>,
    n_rows: usize,
    n_cols: usize,
}

impl ContingencyTable {
    fn from_labels(left: &[Option<String>], right: &[Option<String>]) -> Self {
        let mut cells: BTreeMap<(&str, &str), f64> = BTreeMap::new();
        let mut row_index: BTreeMap<&str, usize> = BTreeMap::new();
        let mut col_index: BTreeMap<&str, usize> = BTreeMap::new();

        for (l, r) in left.iter().zip(right.iter()) {
            if let (Some(l), Some(r)) = (l, r) {
                *cells.entry((l.as_str(), r.as_str())).or_insert(0.0) += 1.0;
                row_index.insert(l.as_str(), 0);
                col_index.insert(r.as_str(), 0);
            }
        }

        for (i, idx) in row_index.values_mut().enumerate() {
            *idx = i;
        }
        for (j, idx) in col_index.values_mut().enumerate() {
            *idx = j;
        }

        let n_rows = row_index.len();
        let n_cols = col_index.len();
        let mut counts = vec![vec![0.0; n_cols]; n_rows];
        for ((l, r), count) in cells {
            counts[row_index[l]][col_index[r]] = count;
        }

        Self {
            counts,
            n_rows,
            n_cols,
        }
    }

    fn total(&self) -> f64 {
        self.counts.iter().flatten().sum()
    }

    /// Pearson's chi-squared statistic without continuity correction
    fn chi_squared(&self) -> f64 {
        let n = self.total();
        if n == 0.0 {
            return 0.0;
        }

        let row_totals: Vec<f64> = self.counts.iter().map(|row| row.iter().sum()).collect();
        let col_totals: Vec<f64> = (0..self.n_cols)
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect();

        let mut chi2 = 0.0;
        for (i, row) in self.counts.iter().enumerate() {
            for (j, &observed) in row.iter().enumerate() {
                let expected = row_totals[i] * col_totals[j] / n;
                let diff = observed - expected;
                chi2 += diff * diff / expected;
            }
        }
        chi2
    }
}

fn build_table(df: &DataFrame, var1: &str, var2: &str) -> Result<ContingencyTable> {
    let left = column_labels(require_column(df, var1)?)?;
    let right = column_labels(require_column(df, var2)?)?;
    Ok(ContingencyTable::from_labels(&left, &right))
}

/// Cramér's V from an already cross-tabulated table.
fn cramers_v_from_table(table: &ContingencyTable, var1: &str, var2: &str) -> Result<f64> {
    if table.n_rows < 2 {
        return Err(CategoricalError::DegenerateCardinality {
            column: var1.to_string(),
            distinct: table.n_rows,
        });
    }
    if table.n_cols < 2 {
        return Err(CategoricalError::DegenerateCardinality {
            column: var2.to_string(),
            distinct: table.n_cols,
        });
    }

    let n = table.total();
    let min_dim = (table.n_rows.min(table.n_cols) - 1) as f64;
    let v = ((table.chi_squared() / n) / min_dim).sqrt();

    // Rounding can push a perfect association a hair above 1
    Ok(v.min(1.0))
}

/// Compute Cramér's V between two categorical columns.
///
/// The result lies in [0, 1] and does not depend on argument order. Rows with
/// a missing value in either column are ignored.
///
/// # Errors
/// `DegenerateCardinality` when either column has fewer than two distinct
/// observed values, `ColumnNotFound` when a column is absent.
pub fn cramers_v(df: &DataFrame, var1: &str, var2: &str) -> Result<f64> {
    let table = build_table(df, var1, var2)?;
    cramers_v_from_table(&table, var1, var2)
}

/// Pearson's chi-squared test of independence between two categorical columns.
///
/// A table with zero degrees of freedom yields a statistic of 0 and a p-value of 1.
pub fn chi_squared_test(df: &DataFrame, var1: &str, var2: &str) -> Result<ChiSquaredTest> {
    let table = build_table(df, var1, var2)?;
    let statistic = table.chi_squared();
    let degrees_of_freedom =
        table.n_rows.saturating_sub(1) * table.n_cols.saturating_sub(1);

    let p_value = if degrees_of_freedom == 0 {
        1.0
    } else {
        match ChiSquared::new(degrees_of_freedom as f64) {
            Ok(dist) => (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0),
            Err(_) => 1.0,
        }
    };

    Ok(ChiSquaredTest {
        statistic,
        degrees_of_freedom,
        p_value,
        observations: table.total(),
    })
}

/// Calculate Cramér's V for every pair of the given columns and keep the
/// pairs above `threshold`.
///
/// Pairs are evaluated in parallel with Rayon and returned sorted by
/// association strength, descending.
///
/// # Arguments
/// * `df` - Reference to the DataFrame
/// * `columns` - Categorical columns to compare
/// * `threshold` - Pairs with V strictly above this value are returned
pub fn find_associated_pairs(
    df: &DataFrame,
    columns: &[&str],
    threshold: f64,
) -> Result<Vec<AssociatedPair>> {
    if columns.len() < 2 {
        return Ok(Vec::new());
    }

    // Extract labels once per column rather than once per pair
    let labelled: Vec<(String, Vec<Option<String>>)> = columns
        .iter()
        .map(|&name| -> Result<(String, Vec<Option<String>>)> {
            Ok((name.to_string(), column_labels(require_column(df, name)?)?))
        })
        .collect::<Result<_>>()?;

    let num_cols = labelled.len();
    let pairs: Vec<(usize, usize)> = (0..num_cols)
        .flat_map(|i| ((i + 1)..num_cols).map(move |j| (i, j)))
        .collect();

    let results: Vec<Option<AssociatedPair>> = pairs
        .par_iter()
        .map(|&(i, j)| -> Result<Option<AssociatedPair>> {
            let (name1, labels1) = &labelled[i];
            let (name2, labels2) = &labelled[j];
            let table = ContingencyTable::from_labels(labels1, labels2);
            let v = cramers_v_from_table(&table, name1, name2)?;

            Ok((v > threshold).then(|| AssociatedPair {
                feature1: name1.clone(),
                feature2: name2.clone(),
                cramers_v: v,
            }))
        })
        .collect::<Result<_>>()?;

    let mut associated: Vec<AssociatedPair> = results.into_iter().flatten().collect();
    associated.sort_by(|a, b| {
        b.cramers_v
            .partial_cmp(&a.cramers_v)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(associated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_contingency_counts() {
        let left = labels(&["a", "a", "b", "b", "b"]);
        let right = labels(&["x", "y", "x", "x", "y"]);
        let table = ContingencyTable::from_labels(&left, &right);

        assert_eq!(table.n_rows, 2);
        assert_eq!(table.n_cols, 2);
        assert_eq!(table.counts, vec![vec![1.0, 1.0], vec![2.0, 1.0]]);
        assert_eq!(table.total(), 5.0);
    }

    #[test]
    fn test_contingency_drops_missing_pairs() {
        let left = vec![Some("a".to_string()), None, Some("b".to_string())];
        let right = vec![Some("x".to_string()), Some("y".to_string()), None];
        let table = ContingencyTable::from_labels(&left, &right);

        assert_eq!(table.n_rows, 1);
        assert_eq!(table.n_cols, 1);
        assert_eq!(table.total(), 1.0);
    }

    #[test]
    fn test_chi_squared_known_value() {
        // 2x2 table [[10, 20], [30, 40]]: chi2 = 0.7937 (no correction)
        let mut left = Vec::new();
        let mut right = Vec::new();
        for (l, r, n) in [("a", "x", 10), ("a", "y", 20), ("b", "x", 30), ("b", "y", 40)] {
            for _ in 0..n {
                left.push(Some(l.to_string()));
                right.push(Some(r.to_string()));
            }
        }
        let table = ContingencyTable::from_labels(&left, &right);
        assert!((table.chi_squared() - 0.793_650_793).abs() < 1e-6);
    }

    #[test]
    fn test_independent_table_has_zero_statistic() {
        let left = labels(&["a", "a", "b", "b"]);
        let right = labels(&["x", "y", "x", "y"]);
        let table = ContingencyTable::from_labels(&left, &right);
        assert_eq!(table.chi_squared(), 0.0);
    }
}
