//! Content-based styling of body rows and cells.
//!
//! Every rule is independent and idempotent: running it twice gives the
//! same annotations as running it once. Column positions are physical
//! positions in the final rows.

use std::collections::HashMap;

use crate::config::{ColorTable, StyleRule};
use crate::models::{Row, RowClass};
use crate::numerals::{parse_amount, parse_integer};

/// Class attached to cells reading `F`.
pub const FAIL_GRADE_CLASS: &str = "f-grade";

/// Apply one configured rule.
pub fn apply_rule(rows: &mut [Row], rule: &StyleRule, colors: &ColorTable) {
    match rule {
        StyleRule::GradeRows { columns } => grade_rows(rows, columns.as_deref(), colors),
        StyleRule::FailLetters => fail_letters(rows, colors),
        StyleRule::Balance { name, deposit, expense } => {
            balance(rows, *name, *deposit, *expense, colors)
        }
        StyleRule::StatusCodes { column, codes } => status_codes(rows, *column, codes),
        StyleRule::HundredMaxBorder { column, min, max, min_group } => {
            hundred_max_border(rows, *column, (*min, *max), *min_group, colors)
        }
    }
}

/// Grade class of one row: the last keyword match among the scanned cells.
pub fn row_class(row: &Row, columns: Option<&[usize]>) -> Option<RowClass> {
    let texts: Vec<&str> = match columns {
        Some(cols) => cols.iter().map(|&c| row.text(c)).collect(),
        None => row.texts(),
    };
    texts.into_iter().fold(None, |current, text| {
        RowClass::from_keyword(text).or(current)
    })
}

/// Classify rows by grade keyword and set their background.
pub fn grade_rows(rows: &mut [Row], columns: Option<&[usize]>, colors: &ColorTable) {
    for row in rows.iter_mut() {
        if let Some(class) = row_class(row, columns) {
            row.class = Some(class);
            row.background = Some(colors.grade(class).to_string());
        }
    }
}

/// Bold red text on every cell whose trimmed, uppercased text is `F`.
pub fn fail_letters(rows: &mut [Row], colors: &ColorTable) {
    for cell in rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
        if cell.text.trim().to_uppercase() == "F" {
            cell.style.bold = true;
            cell.style.color = Some(colors.fail_text.clone());
        }
    }
}

/// Colour the name cell green when deposit exceeds expense, red when it
/// falls short and blue when they are equal. Rows missing any of the three
/// cells are skipped.
pub fn balance(rows: &mut [Row], name: usize, deposit: usize, expense: usize, colors: &ColorTable) {
    for row in rows.iter_mut() {
        let len = row.cells.len();
        if name >= len || deposit >= len || expense >= len {
            continue;
        }
        let paid = parse_amount(&row.cells[deposit].text);
        let spent = parse_amount(&row.cells[expense].text);

        let color = if paid > spent {
            &colors.positive
        } else if paid < spent {
            &colors.negative
        } else {
            &colors.neutral
        };
        row.cells[name].style.color = Some(color.clone());
    }
}

/// Colour a cell whose trimmed text exactly matches one of `codes`.
pub fn status_codes(rows: &mut [Row], column: usize, codes: &HashMap<String, String>) {
    for row in rows.iter_mut() {
        if let Some(cell) = row.cells.get_mut(column) {
            if let Some(color) = codes.get(cell.text.trim()) {
                cell.style.color = Some(color.clone());
            }
        }
    }
}

/// Border the rows holding the maximum of each hundred.
///
/// Values are read from `column` as leading integers; only values within
/// `[min, max)` take part. Within each group `value / 100` holding at least
/// `min_group` values, the rows equal to the group maximum get a bottom
/// border. Every other row with a cell at `column` has its border cleared.
/// Summary rows neither count towards a group nor get a border.
pub fn hundred_max_border(
    rows: &mut [Row],
    column: usize,
    (min, max): (i64, i64),
    min_group: usize,
    colors: &ColorTable,
) {
    let in_range = |v: &i64| (min..max).contains(v);

    let values: Vec<Option<i64>> = rows
        .iter()
        .map(|r| {
            if r.summary {
                return None;
            }
            r.cells.get(column).and_then(|c| parse_integer(&c.text))
        })
        .collect();

    // group -> (maximum, member count)
    let mut groups: HashMap<i64, (i64, usize)> = HashMap::new();
    for value in values.iter().flatten().filter(|v| in_range(v)) {
        let group = groups.entry(value.div_euclid(100)).or_insert((*value, 0));
        group.0 = group.0.max(*value);
        group.1 += 1;
    }

    for (row, value) in rows.iter_mut().zip(values) {
        if row.cells.get(column).is_none() {
            continue;
        }
        let is_max = value
            .filter(in_range)
            .and_then(|v| groups.get(&v.div_euclid(100)).map(|g| (v, g)))
            .is_some_and(|(v, &(top, count))| count >= min_group && top == v);
        row.border_bottom = is_max.then(|| colors.border.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Row> {
        data.iter().map(|r| Row::from_fields(r.iter().copied())).collect()
    }

    #[test]
    fn test_last_grade_keyword_wins() {
        let row = Row::from_fields(["1st", "x", "Fail"]);
        assert_eq!(row_class(&row, None), Some(RowClass::Fail));
        assert_eq!(row_class(&row, Some(&[0, 1])), Some(RowClass::First));
        assert_eq!(row_class(&Row::from_fields(["a"]), None), None);
    }

    #[test]
    fn test_grade_rows_background() {
        let colors = ColorTable::default();
        let mut data = rows(&[&["2nd", "70"], &["none", "1"]]);
        grade_rows(&mut data, None, &colors);
        assert_eq!(data[0].class, Some(RowClass::Second));
        assert_eq!(data[0].background.as_deref(), Some("#e6fff0"));
        assert_eq!(data[1].class, None);
    }

    #[test]
    fn test_fail_letters() {
        let colors = ColorTable::default();
        let mut data = rows(&[&[" f ", "F+", "A"]]);
        fail_letters(&mut data, &colors);
        assert!(data[0].cells[0].style.bold);
        assert_eq!(data[0].cells[0].style.color.as_deref(), Some("#ff0000"));
        assert!(!data[0].cells[1].style.bold);
    }

    #[test]
    fn test_balance_colors() {
        let colors = ColorTable::default();
        let mut data = rows(&[
            &["Rahim", "১,২০০", "১,০০০"],
            &["Karim", "500", "৮০০"],
            &["Jamal", "", "0"],
            &["Short"],
        ]);
        balance(&mut data, 0, 1, 2, &colors);
        assert_eq!(data[0].cells[0].style.color.as_deref(), Some("#34d399"));
        assert_eq!(data[1].cells[0].style.color.as_deref(), Some("#f87171"));
        assert_eq!(data[2].cells[0].style.color.as_deref(), Some("#60a5fa"));
        assert_eq!(data[3].cells[0].style.color, None);
    }

    #[test]
    fn test_status_codes_exact_match() {
        let codes: HashMap<String, String> = [("0", "red"), ("1", "blue"), ("2", "green")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut data = rows(&[&[" 1 "], &["2"], &["3"], &["01"]]);
        status_codes(&mut data, 0, &codes);
        assert_eq!(data[0].cells[0].style.color.as_deref(), Some("blue"));
        assert_eq!(data[1].cells[0].style.color.as_deref(), Some("green"));
        assert_eq!(data[2].cells[0].style.color, None);
        assert_eq!(data[3].cells[0].style.color, None);
    }

    #[test]
    fn test_hundred_max_border() {
        let colors = ColorTable::default();
        let mut data = rows(&[&["105"], &["120"], &["250"], &["310"], &["305"], &["৫২০"], &["x"]]);
        hundred_max_border(&mut data, 0, (100, 500), 2, &colors);

        let bordered: Vec<bool> = data.iter().map(|r| r.border_bottom.is_some()).collect();
        assert_eq!(bordered, vec![false, true, false, true, false, false, false]);
    }

    #[test]
    fn test_hundred_max_border_single_member_groups() {
        let colors = ColorTable::default();
        let mut data = rows(&[&["105"], &["120"], &["250"]]);
        hundred_max_border(&mut data, 0, (100, 500), 1, &colors);

        let bordered: Vec<bool> = data.iter().map(|r| r.border_bottom.is_some()).collect();
        assert_eq!(bordered, vec![false, true, true]);
    }

    #[test]
    fn test_hundred_max_border_ties_and_reset() {
        let colors = ColorTable::default();
        let mut data = rows(&[&["150"], &["১৫০"], &["99"]]);
        data[2].border_bottom = Some("stale".into());
        hundred_max_border(&mut data, 0, (100, 500), 2, &colors);
        assert!(data[0].border_bottom.is_some());
        assert!(data[1].border_bottom.is_some());
        assert!(data[2].border_bottom.is_none());
    }

    #[test]
    fn test_hundred_max_border_skips_summary_rows() {
        let colors = ColorTable::default();
        let mut data = rows(&[&["1", "110"], &["2", "120"], &["মোট", "190"]]);
        data[2].summary = true;
        hundred_max_border(&mut data, 1, (100, 500), 2, &colors);

        let bordered: Vec<bool> = data.iter().map(|r| r.border_bottom.is_some()).collect();
        assert_eq!(bordered, vec![false, true, false]);
    }

    #[test]
    fn test_rules_idempotent() {
        let colors = ColorTable::default();
        let rule = StyleRule::HundredMaxBorder { column: 0, min: 100, max: 500, min_group: 2 };
        let mut once = rows(&[&["120"], &["110"]]);
        apply_rule(&mut once, &rule, &colors);
        let mut twice = once.clone();
        apply_rule(&mut twice, &rule, &colors);
        assert_eq!(once, twice);
    }
}
