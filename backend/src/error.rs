//! Error types for the Sheetview rendering pipeline.
//!
//! This module defines the error hierarchy:
//!
//! - [`CsvError`] - Input decoding errors
//! - [`FetchError`] - Network / HTTP status errors at the fetch boundary
//! - [`ConfigError`] - Configuration loading and validation errors
//! - [`ExportError`] - CSV export errors
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Grid transforms never fail: out-of-range positions and malformed
//! cells degrade to empty strings or no-ops. A missing record is not an
//! error either, lookups return `Option`.

use thiserror::Error;

// =============================================================================
// CSV Input Errors
// =============================================================================

/// Errors while turning raw bytes into CSV text.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Input is not decodable text.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

// =============================================================================
// Fetch Errors
// =============================================================================

/// Errors from fetching a published sheet.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Server answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Status { url: String, status: u16 },

    /// Body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading the view configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Config IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration is not valid JSON or does not match the types.
    #[error("Config JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration does not match the embedded schema.
    #[error("Config schema validation failed: {errors:?}")]
    Schema { errors: Vec<String> },

    /// Configuration is structurally fine but semantically wrong.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing a display table out as CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV flush error: {0}")]
    Flush(String),

    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::load_views`]
/// and [`crate::transform::pipeline::load_record`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Network error.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Requested view id is not configured.
    #[error("Unknown view: {0}")]
    UnknownView(String),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV input operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
