//! Single-record lookup for the detail view.
//!
//! The record sheet is a plain grid whose first row is a header. A record
//! is found by exact string equality on one key column and then mapped, by
//! position, onto the configured field identifiers.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheetview::lookup::{DetailRecord, RecordSource};
//! use sheetview::parser::parse_grid;
//!
//! let source = RecordSource::new(parse_grid(&csv), 3);
//! match source.find("101") {
//!     Some(row) => println!("{:?}", DetailRecord::populate("101", row, &fields)),
//!     None => println!("not found"),
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::RecordConfig;
use crate::models::{Grid, Row};
use crate::transform::styler::FAIL_GRADE_CLASS;

/// A grid searched by one key column. Row 0 is the header.
#[derive(Debug, Clone)]
pub struct RecordSource {
    pub grid: Grid,
    pub key_column: usize,
}

impl RecordSource {
    pub fn new(grid: Grid, key_column: usize) -> Self {
        Self { grid, key_column }
    }

    pub fn from_config(grid: Grid, config: &RecordConfig) -> Self {
        Self::new(grid, config.key_column)
    }

    /// First body row whose key cell equals `key` exactly.
    pub fn find(&self, key: &str) -> Option<&Row> {
        self.grid
            .rows
            .iter()
            .skip(1)
            .find(|row| row.cells.get(self.key_column).is_some_and(|c| c.text == key))
    }

    /// Number of searchable rows.
    pub fn body_len(&self) -> usize {
        self.grid.len().saturating_sub(1)
    }
}

/// One labelled value of a detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailField {
    pub id: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

/// A found record mapped onto field identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    pub key: String,
    pub fields: Vec<DetailField>,
}

impl DetailRecord {
    /// Map `row[i]` to `fields[i]`; cells past the row end read as `""`.
    ///
    /// A value reading `F` (trimmed, case-insensitive) is tagged with the
    /// fail-grade class.
    pub fn populate(key: impl Into<String>, row: &Row, fields: &[String]) -> Self {
        let fields = fields
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let value = row.text(i).to_string();
                let class = (value.trim().to_uppercase() == "F")
                    .then(|| FAIL_GRADE_CLASS.to_string());
                DetailField {
                    id: id.clone(),
                    value,
                    class,
                }
            })
            .collect();

        Self {
            key: key.into(),
            fields,
        }
    }

    /// Value of a field by identifier.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.value.as_str())
    }

    pub fn failed_fields(&self) -> impl Iterator<Item = &DetailField> {
        self.fields.iter().filter(|f| f.class.is_some())
    }
}

/// Find `key` in `source` and map it through `config`.
pub fn lookup(source: &RecordSource, config: &RecordConfig, key: &str) -> Option<DetailRecord> {
    source
        .find(key)
        .map(|row| DetailRecord::populate(key, row, &config.fields))
}
