//! Utility helpers shared across modules

pub mod styling;

pub use styling::*;
