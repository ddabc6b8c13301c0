//! Locale number formatting of body cells.

use crate::config::NumberFormat;
use crate::models::Row;
use crate::numerals::format_bengali;

/// Rewrite every plain numeric cell according to `format`.
///
/// Non-numeric cells are left as they are. Returns the number of cells
/// rewritten.
pub fn format_numbers(rows: &mut [Row], format: NumberFormat) -> usize {
    if format == NumberFormat::None {
        return 0;
    }

    let mut changed = 0;
    for cell in rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
        if let Some(text) = format_bengali(&cell.text) {
            cell.text = text;
            changed += 1;
        }
    }
    changed
}
