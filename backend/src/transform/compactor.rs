//! Span-aware removal of empty columns.
//!
//! Physical cell positions stop matching logical columns as soon as a
//! header uses `colSpan`/`rowSpan`. The [`OccupancyMatrix`] resolves every
//! `(row, logical column)` slot to the physical cell covering it, which is
//! what makes it possible to drop a column from header and body together
//! without misaligning them.
//!
//! ```text
//! header  │ No (rs=2) │   Date (cs=3)   │ Total (rs=2) │
//!         │           │  1  │  2  │  3  │              │
//! body    │     1     │  x  │     │  y  │      9       │
//!                            ▲ empty in every body row
//! result  │ No        │  Date (cs=2)    │ Total        │
//!         │           │  1  │  3  │                    │
//! ```

use std::collections::HashSet;

use crate::models::Row;

/// Physical cell address: row index and cell index within that row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub cell: usize,
}

/// Maps `(row, logical column)` to the physical cell occupying it.
///
/// Built fresh for each compaction pass.
#[derive(Debug, Clone, Default)]
pub struct OccupancyMatrix {
    slots: Vec<Vec<Option<CellRef>>>,
}

impl OccupancyMatrix {
    /// Walk rows top to bottom, placing each cell at the first free slot at
    /// or after the running cursor and claiming `row_span × col_span` slots.
    /// Row spans running past the last row are clipped.
    pub fn build(rows: &[Row]) -> Self {
        let mut slots: Vec<Vec<Option<CellRef>>> = vec![Vec::new(); rows.len()];

        for (r, row) in rows.iter().enumerate() {
            let mut col = 0;
            for (i, cell) in row.cells.iter().enumerate() {
                while matches!(slots[r].get(col), Some(Some(_))) {
                    col += 1;
                }

                let last_row = (r + cell.row_span.max(1)).min(rows.len());
                let span = cell.col_span.max(1);
                for line in &mut slots[r..last_row] {
                    if line.len() < col + span {
                        line.resize(col + span, None);
                    }
                    for slot in &mut line[col..col + span] {
                        *slot = Some(CellRef { row: r, cell: i });
                    }
                }
                col += span;
            }
        }

        Self { slots }
    }

    /// Physical cell covering `(row, col)`, if any.
    pub fn owner(&self, row: usize, col: usize) -> Option<CellRef> {
        self.slots.get(row).and_then(|l| l.get(col)).copied().flatten()
    }

    /// Widest logical row.
    pub fn width(&self) -> usize {
        self.slots.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.slots.len()
    }
}

/// Logical columns that are blank in every visible body row.
///
/// Rows before `body_start` are header rows and never count. The last
/// logical column is the reserved total column and is never reported.
pub fn empty_columns(rows: &[Row], matrix: &OccupancyMatrix, body_start: usize) -> Vec<usize> {
    let last = matrix.width().saturating_sub(1);

    (0..last)
        .filter(|&c| {
            (body_start..rows.len())
                .filter(|&r| !rows[r].hidden)
                .all(|r| match matrix.owner(r, c) {
                    Some(at) => rows[at.row].cells[at.cell].is_blank(),
                    None => true,
                })
        })
        .collect()
}

/// Remove empty columns from a header + body pair.
///
/// Columns are processed from the highest index down. For each, every
/// covering cell is visited once: a cell spanning several columns loses one
/// from its span, a single-column cell is removed. Returns the removed
/// logical column indices in ascending order.
pub fn compact(header: &mut Vec<Row>, body: &mut Vec<Row>) -> Vec<usize> {
    let body_start = header.len();
    let mut rows: Vec<Row> = std::mem::take(header);
    rows.append(body);

    let matrix = OccupancyMatrix::build(&rows);
    let empty = empty_columns(&rows, &matrix, body_start);

    let mut removed: HashSet<CellRef> = HashSet::new();
    for &col in empty.iter().rev() {
        let mut visited: HashSet<CellRef> = HashSet::new();
        for r in 0..matrix.height() {
            let Some(at) = matrix.owner(r, col) else {
                continue;
            };
            if removed.contains(&at) || !visited.insert(at) {
                continue;
            }
            let cell = &mut rows[at.row].cells[at.cell];
            if cell.col_span > 1 {
                cell.col_span -= 1;
            } else {
                removed.insert(at);
            }
        }
    }

    for (r, row) in rows.iter_mut().enumerate() {
        let mut index = 0;
        row.cells.retain(|_| {
            let keep = !removed.contains(&CellRef { row: r, cell: index });
            index += 1;
            keep
        });
    }

    *body = rows.split_off(body_start);
    *header = rows;
    empty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;

    fn header_rows() -> Vec<Row> {
        vec![
            Row::new(vec![
                Cell::new("No").with_row_span(2),
                Cell::new("Date").with_col_span(3),
                Cell::new("Total").with_row_span(2),
            ]),
            Row::from_fields(["1", "2", "3"]),
        ]
    }

    #[test]
    fn test_occupancy_respects_rowspan() {
        let rows = header_rows();
        let matrix = OccupancyMatrix::build(&rows);
        assert_eq!(matrix.width(), 5);
        // second header row starts after the row-spanning "No"
        assert_eq!(matrix.owner(1, 0), Some(CellRef { row: 0, cell: 0 }));
        assert_eq!(matrix.owner(1, 1), Some(CellRef { row: 1, cell: 0 }));
        assert_eq!(matrix.owner(1, 4), Some(CellRef { row: 0, cell: 2 }));
        assert_eq!(matrix.owner(0, 2), Some(CellRef { row: 0, cell: 1 }));
    }

    #[test]
    fn test_empty_column_removed_and_span_shrinks() {
        let mut header = header_rows();
        let mut body = vec![
            Row::from_fields(["1", "x", "", "y", "9"]),
            Row::from_fields(["2", "", " ", "z", "4"]),
        ];

        let removed = compact(&mut header, &mut body);
        assert_eq!(removed, vec![2]);

        assert_eq!(header[0].cells[1].text, "Date");
        assert_eq!(header[0].cells[1].col_span, 2);
        assert_eq!(header[1].texts(), vec!["1", "3"]);
        assert_eq!(body[0].texts(), vec!["1", "x", "y", "9"]);
        assert_eq!(body[1].texts(), vec!["2", "", "z", "4"]);

        // header and body still agree on the logical width
        let matrix = OccupancyMatrix::build(&[header.clone(), body.clone()].concat());
        assert_eq!(matrix.width(), 4);
    }

    #[test]
    fn test_last_column_is_reserved() {
        let mut header = vec![Row::from_fields(["a", "b", "total"])];
        let mut body = vec![Row::from_fields(["1", "2", ""])];
        let removed = compact(&mut header, &mut body);
        assert!(removed.is_empty());
        assert_eq!(body[0].cells.len(), 3);
    }

    #[test]
    fn test_header_text_does_not_keep_column() {
        let mut header = vec![Row::from_fields(["a", "b", "total"])];
        let mut body = vec![
            Row::from_fields(["1", "", "3"]),
            Row::from_fields(["4", "", "6"]),
        ];
        compact(&mut header, &mut body);
        assert_eq!(header[0].texts(), vec!["a", "total"]);
        assert_eq!(body[1].texts(), vec!["4", "6"]);
    }

    #[test]
    fn test_hidden_rows_ignored_for_emptiness() {
        let mut header = Vec::new();
        let mut hidden = Row::from_fields(["x", "stale", "1"]);
        hidden.hidden = true;
        let mut body = vec![Row::from_fields(["y", "", "2"]), hidden];

        assert_eq!(compact(&mut header, &mut body), vec![1]);
        assert_eq!(body[0].texts(), vec!["y", "2"]);
        assert_eq!(body[1].texts(), vec!["x", "1"]);
        assert!(body[1].hidden);
    }

    #[test]
    fn test_span_over_two_empty_columns() {
        let mut header = vec![Row::new(vec![
            Cell::new("a"),
            Cell::new("wide").with_col_span(2),
            Cell::new("t"),
        ])];
        let mut body = vec![Row::from_fields(["1", "", "", "9"])];

        assert_eq!(compact(&mut header, &mut body), vec![1, 2]);
        assert_eq!(header[0].texts(), vec!["a", "t"]);
        assert_eq!(body[0].texts(), vec!["1", "9"]);
    }

    #[test]
    fn test_empty_table() {
        let mut header = Vec::new();
        let mut body = Vec::new();
        assert!(compact(&mut header, &mut body).is_empty());
    }
}
