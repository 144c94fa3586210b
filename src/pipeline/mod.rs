//! Pipeline module - association, encoding and join operations

pub mod apply;
pub mod association;
pub mod labels;
pub mod target;
pub mod woe;

pub use apply::*;
pub use association::*;
pub use labels::column_labels;
pub use target::*;
pub use woe::*;
