//! WoE table export functionality

use serde::Serialize;

use crate::error::Result;
use crate::pipeline::WoeTable;

/// Metadata about the encoding run
#[derive(Serialize)]
pub struct WoeMetadata {
    /// Catstats version
    pub catstats_version: String,
    /// Target column name(s) the tables were computed against
    pub target_columns: Vec<String>,
}

/// Summary statistics across the exported tables
#[derive(Serialize)]
pub struct WoeSummary {
    /// Number of encoded variables
    pub total_variables: usize,
    /// Average IV across variables with a finite IV
    pub avg_iv: f64,
    /// Variables with at least one degenerate category
    pub variables_with_degenerate_categories: Vec<String>,
}

/// Complete WoE export with metadata
#[derive(Serialize)]
pub struct WoeExport<'a> {
    pub metadata: WoeMetadata,
    pub summary: WoeSummary,
    pub tables: &'a [WoeTable],
}

/// Serialize WoE tables to a pretty-printed JSON string
///
/// JSON has no representation for infinities, so infinite WoE and IV values
/// are written as `null`.
pub fn export_woe_json(tables: &[WoeTable]) -> Result<String> {
    let mut target_columns: Vec<String> = tables.iter().map(|t| t.target.clone()).collect();
    target_columns.sort();
    target_columns.dedup();

    let finite_ivs: Vec<f64> = tables
        .iter()
        .map(|t| t.iv)
        .filter(|iv| iv.is_finite())
        .collect();
    let avg_iv = if finite_ivs.is_empty() {
        0.0
    } else {
        finite_ivs.iter().sum::<f64>() / finite_ivs.len() as f64
    };

    let export = WoeExport {
        metadata: WoeMetadata {
            catstats_version: env!("CARGO_PKG_VERSION").to_string(),
            target_columns,
        },
        summary: WoeSummary {
            total_variables: tables.len(),
            avg_iv,
            variables_with_degenerate_categories: tables
                .iter()
                .filter(|t| !t.degenerate_categories().is_empty())
                .map(|t| t.variable.clone())
                .collect(),
        },
        tables,
    };

    Ok(serde_json::to_string_pretty(&export)?)
}
