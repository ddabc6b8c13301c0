//! Bengali ↔ Arabic numeral conversion and locale number handling.
//!
//! Cells in the published sheets mix both digit sets. Everything numeric
//! goes through [`to_arabic`] before parsing; display formatting goes the
//! other way through [`format_bengali`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Digit pairs `(bengali, arabic)` for 0–9.
pub const NUMERAL_PAIRS: [(char, char); 10] = [
    ('০', '0'),
    ('১', '1'),
    ('২', '2'),
    ('৩', '3'),
    ('৪', '4'),
    ('৫', '5'),
    ('৬', '6'),
    ('৭', '7'),
    ('৮', '8'),
    ('৯', '9'),
];

/// A plain decimal number as a whole cell, e.g. `-12`, `+5`, `.25`, `1e3`.
static PLAIN_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid regex")
});

/// Leading float prefix, the way a lenient float reader sees it.
static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid regex")
});

/// Leading integer prefix.
static INT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+").expect("valid regex"));

fn bengali_to_arabic(c: char) -> char {
    NUMERAL_PAIRS
        .iter()
        .find(|(bn, _)| *bn == c)
        .map(|(_, ar)| *ar)
        .unwrap_or(c)
}

fn arabic_to_bengali(c: char) -> char {
    NUMERAL_PAIRS
        .iter()
        .find(|(_, ar)| *ar == c)
        .map(|(bn, _)| *bn)
        .unwrap_or(c)
}

/// Replace every Bengali digit with its Arabic equivalent.
///
/// All other characters, including Arabic digits, commas and decimal
/// points, are kept as they are.
pub fn to_arabic(s: &str) -> String {
    s.chars().map(bengali_to_arabic).collect()
}

/// Replace every Arabic digit with its Bengali equivalent.
pub fn to_bengali(s: &str) -> String {
    s.chars().map(arabic_to_bengali).collect()
}

/// Parse a money-like amount: Bengali digits allowed, commas ignored.
///
/// Reads the longest leading number; anything unparseable is `0.0`.
pub fn parse_amount(s: &str) -> f64 {
    let normalized = to_arabic(s).replace(',', "");
    FLOAT_PREFIX
        .find(normalized.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse the leading integer of a cell, Bengali digits allowed.
pub fn parse_integer(s: &str) -> Option<i64> {
    let normalized = to_arabic(s.trim());
    INT_PREFIX
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Group integer digits the South-Asian way: `1234567` → `12,34,567`.
fn group_digits(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Format a plain numeric cell with Bengali digits and lakh grouping.
///
/// Returns `None` when the trimmed text is not a plain decimal number
/// (an explicit sign and an exponent are allowed) or does not fit a
/// finite `f64`, so non-numeric cells are left untouched by callers. At
/// most three fraction digits are kept.
pub fn format_bengali(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if !PLAIN_NUMBER.is_match(trimmed) {
        return None;
    }
    let value: f64 = trimmed.parse().ok().filter(|v: &f64| v.is_finite())?;

    let rounded = format!("{:.3}", value.abs());
    let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rounded, None),
    };

    let negative = value < 0.0 && rounded != "0";
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    Some(to_bengali(&out))
}
