//! Report module - rendering and exporting results

pub mod summary;
pub mod woe_export;

pub use summary::*;
pub use woe_export::*;
