//! CSV export of rendered views.
//!
//! Header rows come first, then visible body rows. A cell spanning `n`
//! columns is written once and followed by `n - 1` empty fields so every
//! written record keeps the logical column positions. Row spans are not
//! expanded.

use std::io::Write;

use crate::error::ExportError;
use crate::models::{DisplayTable, Row};

fn row_record(row: &Row) -> Vec<&str> {
    let mut record = Vec::with_capacity(row.logical_width());
    for cell in &row.cells {
        record.push(cell.text.as_str());
        record.extend(std::iter::repeat("").take(cell.col_span.saturating_sub(1)));
    }
    record
}

/// Write `table` as CSV into `writer`.
pub fn write_csv<W: Write>(table: &DisplayTable, writer: W) -> Result<(), ExportError> {
    let mut out = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    for row in table.header.iter().chain(table.visible_rows()) {
        out.write_record(row_record(row))?;
    }

    out.flush().map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(())
}

/// Render `table` as a CSV string.
pub fn to_csv(table: &DisplayTable) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
