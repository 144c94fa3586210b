//! Catstats: Categorical Variable Library
//!
//! Statistical utilities for categorical variables in binary classification
//! datasets: Cramér's V association, Weight of Evidence encoding tables,
//! and the left join that attaches an encoding to a dataset.

pub mod error;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::{CategoricalError, Result};
