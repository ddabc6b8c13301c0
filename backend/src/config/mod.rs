//! View configuration.
//!
//! The whole configuration surface (sheet URLs, per-view row windows and
//! column lists, post-processing steps, colour tokens, detail-view field
//! ids) is one immutable [`AppConfig`] value built at startup and passed
//! explicitly to every entry point.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheetview::config::AppConfig;
//!
//! let config = AppConfig::load("configs/results.json")?;
//! for view in &config.views {
//!     println!("{}: rows {}..{}", view.id, view.row_start, view.row_end);
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::models::RowClass;
use crate::validation::validate_view_config;

/// Environment variable overriding [`AppConfig::table_url`].
pub const TABLE_URL_ENV: &str = "SHEETVIEW_TABLE_URL";

/// Environment variable overriding [`AppConfig::record_url`].
pub const RECORD_URL_ENV: &str = "SHEETVIEW_RECORD_URL";

// =============================================================================
// Top-level configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Published CSV feeding the table views.
    pub table_url: String,

    /// Published CSV feeding the detail view.
    #[serde(default)]
    pub record_url: Option<String>,

    /// Output views, rendered in order.
    pub views: Vec<ViewDefinition>,

    /// Detail-view mapping.
    #[serde(default)]
    pub record: Option<RecordConfig>,

    /// Colour tokens used by the styling rules.
    #[serde(default)]
    pub colors: ColorTable,
}

// =============================================================================
// Views
// =============================================================================

/// Row window and column selection of one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub view_id: String,
    /// First source row, inclusive.
    pub row_start: usize,
    /// Last source row, exclusive.
    pub row_end: usize,
    /// Source column indices in output order; duplicates allowed.
    pub columns: Vec<usize>,
}

/// How numeric cells are displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// Leave text as it is.
    #[default]
    None,
    /// Bengali digits with lakh grouping.
    Bengali,
}

/// A static header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub text: String,
    #[serde(default = "default_span")]
    pub col_span: usize,
    #[serde(default = "default_span")]
    pub row_span: usize,
}

fn default_span() -> usize {
    1
}

/// Merge two cells of one body row (1-based positions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSpec {
    pub row: usize,
    pub col1: usize,
    pub col2: usize,
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    " ".to_string()
}

/// Turn a body row into a labelled summary row (1-based positions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySpec {
    pub row: usize,
    #[serde(default = "default_summary_col")]
    pub col: usize,
    pub span: usize,
    pub label: String,
}

fn default_summary_col() -> usize {
    1
}

/// Content-based styling rules, applied in order.
///
/// Column positions are physical positions in the final body rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StyleRule {
    /// Classify rows by grade keyword; the last match in a row wins.
    GradeRows {
        /// Positions to scan (all cells when absent).
        #[serde(default)]
        columns: Option<Vec<usize>>,
    },

    /// Bold red text on cells reading `F`.
    FailLetters,

    /// Colour a name cell by comparing deposit against expense.
    Balance {
        name: usize,
        deposit: usize,
        expense: usize,
    },

    /// Colour a cell whose trimmed text is one of the codes.
    StatusCodes {
        column: usize,
        codes: HashMap<String, String>,
    },

    /// Bottom border under the maximum of each hundred within `[min, max)`.
    HundredMaxBorder {
        column: usize,
        #[serde(default = "default_border_min")]
        min: i64,
        #[serde(default = "default_border_max")]
        max: i64,
        /// Groups with fewer values than this get no border.
        #[serde(default = "default_min_group", rename = "minGroup")]
        min_group: usize,
    },
}

fn default_border_min() -> i64 {
    100
}

fn default_border_max() -> i64 {
    500
}

fn default_min_group() -> usize {
    2
}

/// Full definition of one output view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDefinition {
    pub id: String,
    pub row_start: usize,
    pub row_end: usize,
    pub columns: Vec<usize>,

    /// Static header rows.
    #[serde(default)]
    pub header: Vec<Vec<HeaderCell>>,

    #[serde(default)]
    pub format_numbers: NumberFormat,

    /// Hide rows with a blank cell at any of these positions.
    #[serde(default)]
    pub hide_empty: Vec<usize>,

    /// Drop columns that are empty in every visible body row.
    #[serde(default)]
    pub compact: bool,

    #[serde(default)]
    pub summaries: Vec<SummarySpec>,

    #[serde(default)]
    pub merges: Vec<MergeSpec>,

    #[serde(default)]
    pub styles: Vec<StyleRule>,

    /// Source column carrying the key for the detail view.
    #[serde(default)]
    pub detail_key_column: Option<usize>,
}

impl ViewDefinition {
    /// Row window and column selection of this view.
    pub fn view_config(&self) -> ViewConfig {
        ViewConfig {
            view_id: self.id.clone(),
            row_start: self.row_start,
            row_end: self.row_end,
            columns: self.columns.clone(),
        }
    }
}

// =============================================================================
// Detail view
// =============================================================================

/// Detail-view lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordConfig {
    #[serde(default = "default_key_column")]
    pub key_column: usize,
    /// Field identifiers mapped by position to the record's cells.
    pub fields: Vec<String>,
}

fn default_key_column() -> usize {
    3
}

// =============================================================================
// Colours
// =============================================================================

/// Colour tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorTable {
    pub first: String,
    pub second: String,
    pub third: String,
    pub fail: String,
    pub positive: String,
    pub negative: String,
    pub neutral: String,
    pub fail_text: String,
    pub border: String,
}

impl Default for ColorTable {
    fn default() -> Self {
        Self {
            first: "#f9e6ff".to_string(),
            second: "#e6fff0".to_string(),
            third: "#fffde6".to_string(),
            fail: "#fff0f0".to_string(),
            positive: "#34d399".to_string(),
            negative: "#f87171".to_string(),
            neutral: "#60a5fa".to_string(),
            fail_text: "#ff0000".to_string(),
            border: "2px solid #1e3c72".to_string(),
        }
    }
}

impl ColorTable {
    /// Background colour of a grade class.
    pub fn grade(&self, class: RowClass) -> &str {
        match class {
            RowClass::First => &self.first,
            RowClass::Second => &self.second,
            RowClass::Third => &self.third,
            RowClass::Fail => &self.fail,
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

impl AppConfig {
    /// Parse, schema-check and semantically check a JSON configuration.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Same as [`AppConfig::from_json`] for an already parsed value.
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        validate_view_config(&value).map_err(|errors| ConfigError::Schema { errors })?;
        let config: AppConfig = serde_json::from_value(value)?;
        config.check()?;
        Ok(config)
    }

    /// Read a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Read a configuration file and apply `.env` / environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        // Load .env file (if present)
        dotenvy::dotenv().ok();
        Ok(Self::from_file(path)?.with_env_overrides())
    }

    /// Replace the sheet URLs with environment values when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(TABLE_URL_ENV) {
            self.table_url = url;
        }
        if let Ok(url) = std::env::var(RECORD_URL_ENV) {
            self.record_url = Some(url);
        }
        self
    }

    /// Find a view by id.
    pub fn view(&self, id: &str) -> Option<&ViewDefinition> {
        self.views.iter().find(|v| v.id == id)
    }

    /// Checks the schema cannot express.
    fn check(&self) -> ConfigResult<()> {
        let mut seen = std::collections::HashSet::new();
        for view in &self.views {
            if !seen.insert(view.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate view id '{}'", view.id)));
            }
            if view.row_start > view.row_end {
                return Err(ConfigError::Invalid(format!(
                    "view '{}': rowStart {} is after rowEnd {}",
                    view.id, view.row_start, view.row_end
                )));
            }
        }
        if self.record.is_some() && self.record_url.is_none() {
            return Err(ConfigError::Invalid(
                "record mapping configured without recordUrl".to_string(),
            ));
        }
        Ok(())
    }
}
