//! Weight of Evidence (WoE) encoding of categorical variables
//!
//! Each category is replaced by the log-odds of its event rate relative to the
//! overall event rate of a binary target:
//!
//! `woe = ln((1 - p) / p) - ln(non_events / events)`
//!
//! where `p` is the dataset-wide event rate. Positive values mark categories
//! with more events than average.

use std::collections::BTreeMap;

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::labels::{column_labels, require_column};
use super::target::{resolve_target, TargetMapping};
use crate::error::{CategoricalError, Result};
use crate::utils::styling::print_warning;

/// Default Laplace smoothing constant for the `Smooth` policy
pub const DEFAULT_SMOOTHING: f64 = 0.5;

/// Suffix appended to variable names by [`compute_woe_tables`]
pub const WOE_SUFFIX: &str = "_woe";

/// How to treat categories whose rows are all events or all non-events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegenerateGroupPolicy {
    /// Keep the signed infinity the formula produces and warn on stderr
    #[default]
    PassThrough,
    /// Add the smoothing constant to event and non-event counts of every category
    Smooth,
    /// Fail with `DegenerateGroup`
    Reject,
}

impl std::fmt::Display for DegenerateGroupPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegenerateGroupPolicy::PassThrough => write!(f, "pass-through"),
            DegenerateGroupPolicy::Smooth => write!(f, "smooth"),
            DegenerateGroupPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for DegenerateGroupPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pass-through" | "passthrough" => Ok(DegenerateGroupPolicy::PassThrough),
            "smooth" => Ok(DegenerateGroupPolicy::Smooth),
            "reject" => Ok(DegenerateGroupPolicy::Reject),
            _ => Err(format!(
                "Unknown degenerate group policy: '{}'. Use 'pass-through', 'smooth' or 'reject'.",
                s
            )),
        }
    }
}

/// Configuration for WoE table computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WoeConfig {
    /// Maps a non-binary target to 0/1; `None` requires a 0/1 target
    pub target_mapping: Option<TargetMapping>,
    /// Treatment of all-event / all-non-event categories
    pub degenerate_policy: DegenerateGroupPolicy,
    /// Additive constant used by the `Smooth` policy
    pub smoothing: f64,
    /// Print a warning when infinite encodings are passed through
    pub warn_on_degenerate: bool,
}

impl Default for WoeConfig {
    fn default() -> Self {
        Self {
            target_mapping: None,
            degenerate_policy: DegenerateGroupPolicy::PassThrough,
            smoothing: DEFAULT_SMOOTHING,
            warn_on_degenerate: true,
        }
    }
}

impl WoeConfig {
    pub fn with_target_mapping(mut self, mapping: TargetMapping) -> Self {
        self.target_mapping = Some(mapping);
        self
    }

    pub fn with_policy(mut self, policy: DegenerateGroupPolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.warn_on_degenerate = false;
        self
    }

    /// Check that the configuration values are usable
    pub fn validate(&self) -> Result<()> {
        if !self.smoothing.is_finite() || self.smoothing <= 0.0 {
            return Err(CategoricalError::InvalidConfig(format!(
                "smoothing must be a positive finite number, got {}",
                self.smoothing
            )));
        }
        if let Some(mapping) = &self.target_mapping {
            if mapping.event_value == mapping.non_event_value {
                return Err(CategoricalError::InvalidConfig(format!(
                    "target mapping uses '{}' for both event and non-event",
                    mapping.event_value
                )));
            }
        }
        Ok(())
    }
}

/// WoE statistics for a single category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WoeCategory {
    /// Category label
    pub category: String,
    /// Number of rows in this category
    pub count: usize,
    /// Rows with target = 1 (the target sum)
    pub events: usize,
    /// Rows with target = 0
    pub non_events: usize,
    /// Event rate (events / count)
    pub event_rate: f64,
    /// Percentage of all valid rows falling in this category
    pub population_pct: f64,
    /// Weight of Evidence encoding
    pub woe: f64,
    /// Contribution to total IV from this category
    pub iv_contribution: f64,
}

impl WoeCategory {
    /// True when the category is all events or all non-events
    pub fn is_degenerate(&self) -> bool {
        self.events == 0 || self.non_events == 0
    }
}

/// Label used for the missing-value bin in reports and warnings
pub const MISSING_LABEL: &str = "MISSING";

/// Weight of Evidence table for one variable against one target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WoeTable {
    /// Variable column the table is keyed on (the join key)
    pub variable: String,
    /// Target column the encoding was computed against
    pub target: String,
    /// Name of the encoding column
    pub woe_name: String,
    /// Categories sorted by label
    pub categories: Vec<WoeCategory>,
    /// Rows whose variable value is null, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_bin: Option<WoeCategory>,
    /// Rows with target = 1 across the dataset
    pub total_events: usize,
    /// Rows with target = 0 across the dataset
    pub total_non_events: usize,
    /// Rows skipped because their target was null or unmapped
    pub ignored_records: usize,
    /// Dataset-wide mean of the target
    pub default_rate: f64,
    /// Overall log-odds `ln((1 - rate) / rate)`
    pub total_woe: f64,
    /// Total Information Value
    pub iv: f64,
}

impl WoeTable {
    /// Statistics for a category label
    pub fn get(&self, category: &str) -> Option<&WoeCategory> {
        self.categories
            .binary_search_by(|c| c.category.as_str().cmp(category))
            .ok()
            .map(|idx| &self.categories[idx])
    }

    /// Encoding for a label; `None` looks up the missing bin
    pub fn encoding_for(&self, category: Option<&str>) -> Option<f64> {
        match category {
            Some(label) => self.get(label).map(|c| c.woe),
            None => self.missing_bin.as_ref().map(|b| b.woe),
        }
    }

    /// Categories (including the missing bin) with no variation in target
    pub fn degenerate_categories(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|c| c.is_degenerate())
            .map(|c| c.category.as_str())
            .chain(
                self.missing_bin
                    .iter()
                    .filter(|b| b.is_degenerate())
                    .map(|_| MISSING_LABEL),
            )
            .collect()
    }

    /// Total Information Value of the variable
    pub fn information_value(&self) -> f64 {
        self.iv
    }

    /// Number of valid rows the table was computed from
    pub fn total_records(&self) -> usize {
        self.total_events + self.total_non_events
    }

    /// The table as a DataFrame with columns
    /// `[variable, "{target}_count", "{target}_sum", woe_name]`.
    ///
    /// The missing bin, if present, is the last row with a null key.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let rows: Vec<(Option<String>, &WoeCategory)> = self
            .categories
            .iter()
            .map(|c| (Some(c.category.clone()), c))
            .chain(self.missing_bin.iter().map(|b| (None, b)))
            .collect();

        let keys: Vec<Option<String>> = rows.iter().map(|(k, _)| k.clone()).collect();
        let counts: Vec<u64> = rows.iter().map(|(_, c)| c.count as u64).collect();
        let sums: Vec<u64> = rows.iter().map(|(_, c)| c.events as u64).collect();
        let woes: Vec<f64> = rows.iter().map(|(_, c)| c.woe).collect();

        let df = DataFrame::new(vec![
            Column::new(self.variable.as_str().into(), keys),
            Column::new(format!("{}_count", self.target).into(), counts),
            Column::new(format!("{}_sum", self.target).into(), sums),
            Column::new(self.woe_name.as_str().into(), woes),
        ])?;

        Ok(df)
    }
}

/// Compute the WoE table of `variable` against a binary 0/1 `target`
/// with the default configuration.
///
/// # Arguments
/// * `df` - Reference to the DataFrame
/// * `variable` - Categorical column to encode
/// * `woe_name` - Name of the encoding column
/// * `target` - Binary target column (0/1)
pub fn compute_woe_table(
    df: &DataFrame,
    variable: &str,
    woe_name: &str,
    target: &str,
) -> Result<WoeTable> {
    compute_woe_table_with_config(df, variable, woe_name, target, &WoeConfig::default())
}

/// Compute the WoE table of `variable` against `target`.
///
/// Rows with a null or unmapped target are ignored. Rows with a null variable
/// value are collected into the missing bin.
pub fn compute_woe_table_with_config(
    df: &DataFrame,
    variable: &str,
    woe_name: &str,
    target: &str,
    config: &WoeConfig,
) -> Result<WoeTable> {
    config.validate()?;
    if woe_name.is_empty() {
        return Err(CategoricalError::InvalidConfig(
            "WoE column name must not be empty".to_string(),
        ));
    }

    let values = column_labels(require_column(df, variable)?)?;
    let target_values = resolve_target(df, target, config.target_mapping.as_ref())?;

    // (events, non_events) per category
    let mut category_stats: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    let mut missing_events = 0usize;
    let mut missing_non_events = 0usize;
    let mut ignored_records = 0usize;

    for (val, t) in values.into_iter().zip(target_values.iter()) {
        match (val, t) {
            (Some(cat), Some(t)) => {
                let entry = category_stats.entry(cat).or_insert((0, 0));
                if *t == 1 {
                    entry.0 += 1;
                } else {
                    entry.1 += 1;
                }
            }
            (None, Some(t)) => {
                if *t == 1 {
                    missing_events += 1;
                } else {
                    missing_non_events += 1;
                }
            }
            (_, None) => ignored_records += 1,
        }
    }

    let total_events = category_stats.values().map(|(e, _)| e).sum::<usize>() + missing_events;
    let total_non_events =
        category_stats.values().map(|(_, ne)| ne).sum::<usize>() + missing_non_events;
    let total_records = total_events + total_non_events;

    if total_events == 0 || total_non_events == 0 {
        return Err(CategoricalError::ConstantTarget(target.to_string()));
    }

    let default_rate = total_events as f64 / total_records as f64;
    let total_woe = ((1.0 - default_rate) / default_rate).ln();

    let stats = GroupTotals {
        total_events,
        total_non_events,
        total_woe,
        smoothing: match config.degenerate_policy {
            DegenerateGroupPolicy::Smooth => Some(config.smoothing),
            _ => None,
        },
    };

    let categories: Vec<WoeCategory> = category_stats
        .into_iter()
        .map(|(category, (events, non_events))| stats.category(category, events, non_events))
        .collect();

    let missing_bin = (missing_events + missing_non_events > 0).then(|| {
        stats.category(MISSING_LABEL.to_string(), missing_events, missing_non_events)
    });

    let iv: f64 = categories
        .iter()
        .chain(missing_bin.iter())
        .map(|c| c.iv_contribution)
        .sum();

    let table = WoeTable {
        variable: variable.to_string(),
        target: target.to_string(),
        woe_name: woe_name.to_string(),
        categories,
        missing_bin,
        total_events,
        total_non_events,
        ignored_records,
        default_rate,
        total_woe,
        iv,
    };

    let degenerate = table.degenerate_categories();
    if !degenerate.is_empty() {
        match config.degenerate_policy {
            DegenerateGroupPolicy::Reject => {
                return Err(CategoricalError::DegenerateGroup {
                    column: variable.to_string(),
                    category: degenerate[0].to_string(),
                });
            }
            DegenerateGroupPolicy::PassThrough if config.warn_on_degenerate => {
                print_warning(&format!(
                    "'{}' has {} categor{} with no variation in '{}' ({}); their WoE is infinite",
                    variable,
                    degenerate.len(),
                    if degenerate.len() == 1 { "y" } else { "ies" },
                    target,
                    degenerate.join(", ")
                ));
            }
            _ => {}
        }
    }

    Ok(table)
}

/// Compute WoE tables for several variables in parallel.
///
/// Each encoding column is named `{variable}_woe`. Tables are returned in the
/// order of `variables`; the first failure aborts the whole call.
pub fn compute_woe_tables(
    df: &DataFrame,
    variables: &[&str],
    target: &str,
    config: &WoeConfig,
) -> Result<Vec<WoeTable>> {
    variables
        .par_iter()
        .map(|&variable| {
            let woe_name = format!("{}{}", variable, WOE_SUFFIX);
            compute_woe_table_with_config(df, variable, &woe_name, target, config)
        })
        .collect()
}

/// Dataset-wide quantities shared by every category of a table
struct GroupTotals {
    total_events: usize,
    total_non_events: usize,
    total_woe: f64,
    smoothing: Option<f64>,
}

impl GroupTotals {
    fn category(&self, category: String, events: usize, non_events: usize) -> WoeCategory {
        let count = events + non_events;
        let (woe, iv_contribution) = self.woe_iv(events as f64, non_events as f64);

        WoeCategory {
            category,
            count,
            events,
            non_events,
            event_rate: if count > 0 { events as f64 / count as f64 } else { 0.0 },
            population_pct: count as f64 / (self.total_events + self.total_non_events) as f64
                * 100.0,
            woe,
            iv_contribution,
        }
    }

    /// WoE and IV contribution for one category.
    ///
    /// Unsmoothed, a category with no events yields -inf and one with no
    /// non-events yields +inf, following IEEE division and `ln(0)`.
    fn woe_iv(&self, events: f64, non_events: f64) -> (f64, f64) {
        let (e, ne) = match self.smoothing {
            Some(s) => (events + s, non_events + s),
            None => (events, non_events),
        };
        let woe = self.total_woe - (ne / e).ln();

        let dist_events = events / self.total_events as f64;
        let dist_non_events = non_events / self.total_non_events as f64;
        let iv_contribution = (dist_events - dist_non_events) * woe;

        (woe, iv_contribution)
    }
}
