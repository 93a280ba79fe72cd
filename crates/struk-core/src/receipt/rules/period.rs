//! Billing period normalization and Indonesian month names.

use super::patterns::{MONTH_WORD_YEAR_ANCHORED, MONTH_YEAR_ANCHORED, YEAR_MONTH_COMPACT};

/// Indonesian month names, January first.
pub const MONTHS: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni",
    "Juli", "Agustus", "September", "Oktober", "November", "Desember",
];

/// Translate a two-digit month code ("01".."12") to its Indonesian name.
///
/// Anything else is returned unchanged.
pub fn month_name(code: &str) -> String {
    month_index(code)
        .map(|i| MONTHS[i].to_string())
        .unwrap_or_else(|| code.to_string())
}

fn month_index(code: &str) -> Option<usize> {
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match code.parse::<usize>() {
        Ok(n @ 1..=12) => Some(n - 1),
        _ => None,
    }
}

/// Month index for an Indonesian month name or its common abbreviation.
pub fn month_from_word(word: &str) -> Option<usize> {
    let upper = word.trim().to_uppercase();
    let index = match upper.get(..3)? {
        "JAN" => 0,
        "FEB" => 1,
        "MAR" => 2,
        "APR" => 3,
        "MEI" => 4,
        "JUN" => 5,
        "JUL" => 6,
        "AGU" | "AGS" => 7,
        "SEP" => 8,
        "OKT" => 9,
        "NOV" => 10,
        "DES" => 11,
        _ => return None,
    };
    Some(index)
}

/// Format a month index and year as `MONTHNAME YEAR`.
pub fn month_year(index: usize, year: &str) -> String {
    format!("{} {}", MONTHS[index % 12], year)
}

/// Normalize a captured period: compact `YYYYMM`, `MM/YYYY` and abbreviated
/// month shapes become `MONTHNAME YEAR`, and the result is uppercased.
pub fn normalize_period(period: &str) -> String {
    let trimmed = period.trim();

    let expanded = if let Some(caps) = YEAR_MONTH_COMPACT.captures(trimmed) {
        format!("{} {}", month_name(&caps[2]), &caps[1])
    } else if let Some(caps) = MONTH_YEAR_ANCHORED.captures(trimmed) {
        format!("{} {}", month_name(&caps[1]), &caps[2])
    } else if let Some(full) = MONTH_WORD_YEAR_ANCHORED
        .captures(trimmed)
        .and_then(|caps| Some(month_year(month_from_word(&caps[1])?, &caps[2])))
    {
        full
    } else {
        trimmed.to_string()
    };

    expanded.to_uppercase()
}
