//! Energy quantity reconstruction.
//!
//! OCR regularly drops the decimal separator of quantities such as "35,30",
//! leaving "3530". The last two digits are hundredths in that case.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::amounts::parse_amount;

/// Rebuild a kWh value from a digit run ("3530" → "35,3", "46" → "46,0").
///
/// Non-digits are stripped first. Runs shorter than two digits come back as-is.
pub fn format_kwh_digits(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        2 => format!("{},0", digits),
        n if n >= 3 => Decimal::from_str(&digits)
            .ok()
            .map(|v| one_decimal(v / Decimal::from(100)))
            .unwrap_or(digits),
        _ => digits,
    }
}

/// Normalize a captured kWh value to one decimal place.
///
/// A value carrying a decimal marker is kept as read ("32,5" → "32,5",
/// "67,10" → "67,1"). A bare digit run goes through [`format_kwh_digits`].
pub fn format_kwh_value(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.contains([',', '.']) {
        if let Ok(v) = Decimal::from_str(&trimmed.replace(',', ".")) {
            return one_decimal(v);
        }
    }
    format_kwh_digits(trimmed)
}

/// Render a kWh value for printing ("35,3" → "35,3 KWH", "3530" → "35,3 KWH").
///
/// Only values without a decimal marker above 1000 get the hundredths
/// correction.
pub fn format_kwh_display(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return "0,0 KWH".to_string();
    }

    let has_marker = cleaned.contains([',', '.']);
    let parsed = if has_marker {
        Decimal::from_str(&cleaned.replace(',', ".")).ok()
    } else {
        parse_amount(&cleaned)
    };

    match parsed {
        Some(v) if !has_marker && v > Decimal::from(1000) => {
            format!("{} KWH", one_decimal(v / Decimal::from(100)))
        }
        Some(v) => format!("{} KWH", one_decimal(v)),
        None => format!("{} KWH", value.trim()),
    }
}

fn one_decimal(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}", rounded).replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kwh_digits() {
        assert_eq!(format_kwh_digits("46"), "46,0");
        assert_eq!(format_kwh_digits("3530"), "35,3");
        assert_eq!(format_kwh_digits("14090"), "140,9");
        assert_eq!(format_kwh_digits("35,30"), "35,3");
        assert_eq!(format_kwh_digits("353"), "3,5");
    }

    #[test]
    fn test_format_kwh_digits_short_runs() {
        assert_eq!(format_kwh_digits("7"), "7");
        assert_eq!(format_kwh_digits(""), "");
        assert_eq!(format_kwh_digits("kwh"), "");
    }

    #[test]
    fn test_format_kwh_value_keeps_decimal_marker() {
        assert_eq!(format_kwh_value("32,5"), "32,5");
        assert_eq!(format_kwh_value("67,10"), "67,1");
        assert_eq!(format_kwh_value("35.3"), "35,3");
        assert_eq!(format_kwh_value("14090"), "140,9");
        assert_eq!(format_kwh_value("46"), "46,0");
    }

    #[test]
    fn test_format_kwh_display() {
        assert_eq!(format_kwh_display("35,3"), "35,3 KWH");
        assert_eq!(format_kwh_display("35.3"), "35,3 KWH");
        assert_eq!(format_kwh_display("3530"), "35,3 KWH");
        assert_eq!(format_kwh_display("500"), "500,0 KWH");
        assert_eq!(format_kwh_display(""), "0,0 KWH");
    }
}
