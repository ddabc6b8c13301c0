//! CSV text to [`Grid`] parser with encoding auto-detection.
//!
//! The scan rule: a `"` toggles the quoted state and
//! is dropped, a delimiter outside quotes ends the field. Doubled quotes
//! (`""`) are not unescaped, they simply toggle twice. Malformed quoting
//! never fails, it degrades according to the same rule.

use std::mem::take;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::Grid;

/// Delimiter used by published spreadsheet exports.
pub const DEFAULT_DELIMITER: char = ',';

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the specified encoding.
///
/// Fails with [`CsvError::MalformedInput`] when the bytes are not valid in
/// that encoding or contain NUL bytes (binary payloads).
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    if bytes.contains(&0) {
        return Err(CsvError::MalformedInput("input contains NUL bytes".into()));
    }

    let encoding = encoding.to_lowercase();
    let codec = match encoding.as_str() {
        "utf-8" | "utf8" | "ascii" => {
            return String::from_utf8(bytes.to_vec())
                .map_err(|e| CsvError::MalformedInput(format!("invalid UTF-8: {}", e)));
        }
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::WINDOWS_1252,
        other => encoding_rs::Encoding::for_label(other.as_bytes()).unwrap_or(encoding_rs::UTF_8),
    };

    let (text, _, had_errors) = codec.decode(bytes);
    if had_errors {
        return Err(CsvError::MalformedInput(format!(
            "cannot decode input as {}",
            codec.name()
        )));
    }
    Ok(text.into_owned())
}

/// Decode raw bytes with auto-detected encoding.
pub fn decode_bytes(bytes: &[u8]) -> CsvResult<String> {
    // Published sheets are UTF-8; only fall back to detection if that fails.
    match std::str::from_utf8(bytes) {
        Ok(text) if !bytes.contains(&0) => Ok(text.to_string()),
        _ => decode_content(bytes, &detect_encoding(bytes)),
    }
}

/// Split one line into fields.
fn parse_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => fields.push(take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Parse CSV text with an explicit delimiter.
///
/// Surrounding whitespace of the whole input is trimmed first; an empty
/// input yields a zero-row grid. A trailing `\r` on each line is dropped.
pub fn parse_grid_with(text: &str, delimiter: char) -> Grid {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Grid::default();
    }

    let records = trimmed
        .split('\n')
        .map(|line| parse_line(line.strip_suffix('\r').unwrap_or(line), delimiter))
        .collect();

    Grid::from_records(records)
}

/// Parse comma-delimited CSV text into a grid.
///
/// # Example
/// ```ignore
/// use sheetview::parse_grid;
///
/// let grid = parse_grid("\"a,b\",c");
/// assert_eq!(grid.rows[0].texts(), vec!["a,b", "c"]);
/// ```
pub fn parse_grid(text: &str) -> Grid {
    parse_grid_with(text, DEFAULT_DELIMITER)
}

/// Decode and parse raw bytes.
pub fn parse_bytes(bytes: &[u8]) -> CsvResult<Grid> {
    let text = decode_bytes(bytes)?;
    Ok(parse_grid(&text))
}

/// Read and parse a CSV file.
pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> CsvResult<Grid> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes)
}
