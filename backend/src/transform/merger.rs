//! Positional cell merges.
//!
//! Positions are 1-based and physical, so these run after row filtering
//! and column compaction. Calls on the same row are order-sensitive: a
//! merge removes a cell and shifts every later position left by one.

use crate::models::Row;

/// Merge `col2` into `col1` on body row `row_index`.
///
/// `col1` becomes a two-column cell holding
/// `trim(col1) + separator + trim(col2)` and `col2` is removed. Missing
/// rows or cells, zero positions and `col1 == col2` are silent no-ops.
/// Returns whether the merge happened.
pub fn merge_cells(rows: &mut [Row], row_index: usize, col1: usize, col2: usize, separator: &str) -> bool {
    if row_index == 0 || col1 == 0 || col2 == 0 || col1 == col2 {
        return false;
    }
    let Some(row) = rows.get_mut(row_index - 1) else {
        return false;
    };
    let (first, second) = (col1 - 1, col2 - 1);
    if first >= row.cells.len() || second >= row.cells.len() {
        return false;
    }

    let tail = row.cells.remove(second);
    let target = if second < first { first - 1 } else { first };
    let cell = &mut row.cells[target];
    cell.text = format!("{}{}{}", cell.text.trim(), separator, tail.text.trim());
    cell.col_span = 2;
    true
}

/// Turn a body row into a labelled summary row.
///
/// The cell at `col` gets `label` as its text and spans `span` columns;
/// up to `span - 1` cells following it are removed. On a row too short
/// for `span` the span is cut to the cells actually covered. A missing
/// row or cell is a no-op. Returns whether the row was changed.
pub fn merge_summary(rows: &mut [Row], row_index: usize, col: usize, span: usize, label: &str) -> bool {
    if row_index == 0 || col == 0 || span == 0 {
        return false;
    }
    let Some(row) = rows.get_mut(row_index - 1) else {
        return false;
    };
    let index = col - 1;
    if index >= row.cells.len() {
        return false;
    }

    let end = index.saturating_add(span).min(row.cells.len());
    row.cells.drain(index + 1..end);
    row.summary = true;
    let cell = &mut row.cells[index];
    cell.text = label.to_string();
    cell.col_span = end - index;
    true
}
