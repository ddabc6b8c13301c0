//! Domain models for the Sheetview rendering pipeline.
//!
//! This module contains the data structures that flow through every stage:
//!
//! - [`Cell`] - Text value with spans and an optional style
//! - [`Row`] - Physical cells plus row-level annotations
//! - [`Grid`] - Ordered rows, as parsed or projected
//! - [`DisplayTable`] - Header and body of one rendered view
//! - [`RowClass`] - Grade classification of a row
//!
//! A grid is rectangular only logically: once spans are applied a row may
//! hold fewer physical cells than the table has columns.

use serde::{Deserialize, Serialize};

// =============================================================================
// Cell
// =============================================================================

/// Presentation hints for a single cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    /// Foreground colour token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Bold text.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    /// Named class, e.g. `f-grade`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl CellStyle {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && !self.bold && self.class.is_none()
    }
}

/// One physical table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub text: String,
    /// Logical columns covered, always at least 1.
    pub col_span: usize,
    /// Logical rows covered, always at least 1.
    pub row_span: usize,
    #[serde(default, skip_serializing_if = "CellStyle::is_empty")]
    pub style: CellStyle,
}

impl Cell {
    /// Create a plain cell spanning one column and one row.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            col_span: 1,
            row_span: 1,
            style: CellStyle::default(),
        }
    }

    /// Set the column span (clamped to at least 1).
    pub fn with_col_span(mut self, span: usize) -> Self {
        self.col_span = span.max(1);
        self
    }

    /// Set the row span (clamped to at least 1).
    pub fn with_row_span(mut self, span: usize) -> Self {
        self.row_span = span.max(1);
        self
    }

    /// True when the trimmed text is empty.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// =============================================================================
// Row
// =============================================================================

/// Grade classification assigned to a whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowClass {
    First,
    Second,
    Third,
    Fail,
}

impl RowClass {
    /// Match a grade keyword (`1st`, `2nd`, `3rd`, `fail`), trimmed and case-insensitive.
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "1st" => Some(RowClass::First),
            "2nd" => Some(RowClass::Second),
            "3rd" => Some(RowClass::Third),
            "fail" => Some(RowClass::Fail),
            _ => None,
        }
    }
}

/// One table row: physical cells plus row-level annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub cells: Vec<Cell>,
    /// Hidden rows stay in place so positional merges keep their meaning.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Labelled total row; its cells no longer line up with the columns.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub summary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<RowClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<String>,
    /// Record key used to open the detail view for this row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_key: Option<String>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            ..Self::default()
        }
    }

    /// Build a row of plain cells from raw field strings.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(fields.into_iter().map(Cell::new).collect())
    }

    /// Text at a physical position, `""` when out of range.
    pub fn text(&self, index: usize) -> &str {
        self.cells.get(index).map(|c| c.text.as_str()).unwrap_or("")
    }

    /// Sum of the column spans of the physical cells.
    pub fn logical_width(&self) -> usize {
        self.cells.iter().map(|c| c.col_span).sum()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }
}

// =============================================================================
// Grid
// =============================================================================

/// Ordered sequence of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: Vec<Row>,
}

impl Grid {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a grid of plain cells from nested field vectors.
    pub fn from_records(records: Vec<Vec<String>>) -> Self {
        Self {
            rows: records.into_iter().map(Row::from_fields).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain text view, one `Vec<String>` per row.
    pub fn to_records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.text.clone()).collect())
            .collect()
    }
}

// =============================================================================
// Display table
// =============================================================================

/// Final, annotated output of one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTable {
    /// View identifier, e.g. `table4`.
    pub view_id: String,
    /// Header rows, possibly with spans.
    pub header: Vec<Row>,
    /// Body rows after every pipeline stage.
    pub body: Vec<Row>,
}

impl DisplayTable {
    /// Body rows a renderer should draw.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.body.iter().filter(|r| !r.hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_class_keywords() {
        assert_eq!(RowClass::from_keyword(" 1ST "), Some(RowClass::First));
        assert_eq!(RowClass::from_keyword("2nd"), Some(RowClass::Second));
        assert_eq!(RowClass::from_keyword("3rd"), Some(RowClass::Third));
        assert_eq!(RowClass::from_keyword("Fail"), Some(RowClass::Fail));
        assert_eq!(RowClass::from_keyword("4th"), None);
    }

    #[test]
    fn test_row_text_out_of_range() {
        let row = Row::from_fields(["a", "b"]);
        assert_eq!(row.text(1), "b");
        assert_eq!(row.text(5), "");
    }

    #[test]
    fn test_logical_width_counts_spans() {
        let row = Row::new(vec![Cell::new("x").with_col_span(3), Cell::new("y")]);
        assert_eq!(row.logical_width(), 4);
        assert_eq!(Cell::new("z").with_col_span(0).col_span, 1);
    }

    #[test]
    fn test_cell_serialization_skips_default_style() {
        let json = serde_json::to_value(Cell::new("90")).unwrap();
        assert_eq!(json["text"], "90");
        assert_eq!(json["colSpan"], 1);
        assert!(json.get("style").is_none());
    }
}
