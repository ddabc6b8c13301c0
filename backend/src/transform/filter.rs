//! Hide rows with blank monitored cells.

use crate::models::Row;

/// Mark rows hidden when any cell at `columns` is missing or blank.
///
/// Rows are never removed, so later 1-based merges still address the same
/// rows. Already hidden rows stay hidden. Returns the number of rows newly
/// hidden.
pub fn hide_empty(rows: &mut [Row], columns: &[usize]) -> usize {
    let mut hidden = 0;
    for row in rows.iter_mut().filter(|r| !r.hidden) {
        let blank = columns
            .iter()
            .any(|&i| row.cells.get(i).map_or(true, |c| c.is_blank()));
        if blank {
            row.hidden = true;
            hidden += 1;
        }
    }
    hidden
}
