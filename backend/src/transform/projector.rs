//! Slice a parsed grid into one view's window.

use crate::config::ViewConfig;
use crate::models::{Cell, Grid, Row};

/// Project `grid` through a row window and column selection.
///
/// Produces up to `row_end - row_start` rows, silently truncated when the
/// source is shorter. Each output row has exactly one cell per entry of
/// `config.columns`, in that order (duplicates kept); an index past the
/// end of a source row yields `""`.
pub fn project(grid: &Grid, config: &ViewConfig) -> Grid {
    let start = config.row_start.min(grid.len());
    let end = config.row_end.clamp(start, grid.len());

    let rows = grid.rows[start..end]
        .iter()
        .map(|source| {
            let cells = config
                .columns
                .iter()
                .map(|&col| Cell::new(source.text(col)))
                .collect();
            Row::new(cells)
        })
        .collect();

    Grid::new(rows)
}

/// Key values (`source[key_column]`) for the same window [`project`] reads.
pub fn window_keys(grid: &Grid, config: &ViewConfig, key_column: usize) -> Vec<String> {
    let start = config.row_start.min(grid.len());
    let end = config.row_end.clamp(start, grid.len());
    grid.rows[start..end]
        .iter()
        .map(|row| row.text(key_column).to_string())
        .collect()
}
