//! # Sheetview - published spreadsheet to display tables
//!
//! Sheetview fetches CSV exports of published spreadsheets, slices them
//! into named views and normalizes their layout (hidden empty rows,
//! span-aware column removal, merges, summary rows, conditional styling,
//! Bengali number formatting) into display tables a client can render.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │  Sheet CSV  │────▶│   Parser    │────▶│  Pipeline   │────▶│ DisplayTable │
//! │   (HTTP)    │     │  (auto-enc) │     │ (per view)  │     │  JSON / CSV  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheetview::{parse_grid, render_views, AppConfig};
//!
//! let config = AppConfig::load("configs/ledger.json")?;
//! let grid = parse_grid(&std::fs::read_to_string("ledger.csv")?);
//! for table in render_views(&grid, &config) {
//!     println!("{}: {} rows", table.view_id, table.visible_rows().count());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Grid, rows, cells and display tables
//! - [`parser`] - CSV parsing with encoding detection
//! - [`numerals`] - Bengali numerals and number formatting
//! - [`config`] - View configuration
//! - [`validation`] - Configuration schema validation
//! - [`transform`] - Projection, filtering, compaction, merging, styling
//! - [`lookup`] - Detail record lookup
//! - [`fetch`] - Sheet download
//! - [`export`] - CSV export
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Input
pub mod numerals;
pub mod parser;

// Configuration
pub mod config;
pub mod validation;

// Transformation
pub mod lookup;
pub mod transform;

// I/O
pub mod export;
pub mod fetch;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, CsvError, ExportError, FetchError, PipelineError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Cell, CellStyle, DisplayTable, Grid, Row, RowClass};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use numerals::{format_bengali, to_arabic, to_bengali};
pub use parser::{decode_bytes, detect_encoding, parse_bytes, parse_csv_file, parse_grid};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{AppConfig, ColorTable, StyleRule, ViewConfig, ViewDefinition};
pub use validation::{is_valid_view_config, validate_view_config};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use lookup::{DetailRecord, RecordSource};
pub use transform::pipeline::{
    load_record, load_view, load_views, render_view, render_view_by_id, render_views,
    ViewPipeline,
};

// =============================================================================
// Re-exports - I/O
// =============================================================================

pub use export::to_csv;
pub use fetch::SheetClient;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
