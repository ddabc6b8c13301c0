//! Transformation module.
//!
//! This module turns a parsed grid into display tables:
//! - Projector: Row window and column selection
//! - Formatter: Locale number formatting
//! - Filter: Hiding rows with blank monitored cells
//! - Compactor: Span-aware empty column removal
//! - Merger: Positional cell merges and summary rows
//! - Styler: Content-based row and cell styling
//! - Pipeline: Fixed-order composition of the above

pub mod compactor;
pub mod filter;
pub mod formatter;
pub mod merger;
pub mod pipeline;
pub mod projector;
pub mod styler;

pub use compactor::{compact, OccupancyMatrix};
pub use filter::hide_empty;
pub use formatter::format_numbers;
pub use merger::{merge_cells, merge_summary};
pub use pipeline::*;
pub use projector::project;
pub use styler::apply_rule;
