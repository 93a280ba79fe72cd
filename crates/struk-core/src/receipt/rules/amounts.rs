//! Money values: denomination snapping, rupiah parsing and display formatting.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::config::{ExtractionConfig, DEFAULT_DENOMINATIONS, DEFAULT_SNAP_TOLERANCE_PERCENT};

use super::patterns::TRAILING_CENTS;

/// The set of valid token face values an OCR amount may be corrected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenominationCatalog {
    denominations: Vec<u64>,
    tolerance_percent: u64,
}

impl DenominationCatalog {
    /// Create a catalog. Denominations are scanned in ascending order.
    pub fn new(mut denominations: Vec<u64>, tolerance_percent: u64) -> Self {
        denominations.sort_unstable();
        denominations.dedup();
        denominations.retain(|&d| d > 0);
        Self {
            denominations,
            tolerance_percent,
        }
    }

    pub fn denominations(&self) -> &[u64] {
        &self.denominations
    }

    pub fn tolerance_percent(&self) -> u64 {
        self.tolerance_percent
    }

    /// Whether `amount` is exactly one of the catalog values.
    pub fn contains(&self, amount: u64) -> bool {
        self.denominations.binary_search(&amount).is_ok()
    }

    /// First denomination (ascending) within tolerance of `amount`.
    pub fn nearest(&self, amount: u64) -> Option<u64> {
        self.denominations.iter().copied().find(|&d| {
            u128::from(amount.abs_diff(d)) * 100
                <= u128::from(d) * u128::from(self.tolerance_percent)
        })
    }
}

impl Default for DenominationCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_DENOMINATIONS.to_vec(), DEFAULT_SNAP_TOLERANCE_PERCENT)
    }
}

impl From<&ExtractionConfig> for DenominationCatalog {
    fn from(config: &ExtractionConfig) -> Self {
        Self::new(config.denominations.clone(), config.snap_tolerance_percent)
    }
}

/// Snap an integer string to the catalog.
///
/// Unparseable input and amounts outside tolerance of every denomination are
/// returned unchanged.
pub fn snap_denomination(value: &str, catalog: &DenominationCatalog) -> String {
    match value.trim().parse::<u64>() {
        Ok(amount) => catalog
            .nearest(amount)
            .map(|d| d.to_string())
            .unwrap_or_else(|| value.to_string()),
        Err(_) => value.to_string(),
    }
}

/// Reduce a printed rupiah amount to whole-rupiah digits.
///
/// A trailing two-digit decimal part (`42.000,00`) is dropped first; the
/// remaining separators are thousands separators.
pub fn rupiah_digits(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches(['.', ',']);
    let whole = match TRAILING_CENTS.find(trimmed) {
        Some(m) if m.start() > 0 => &trimmed[..m.start()],
        _ => trimmed,
    };

    whole.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse a comma- or dot-decimal amount (e.g. "1.234,56", "1234.56", "12.500").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let normalized = match (commas, dots) {
        (0, 0) => cleaned,
        (1, 0) => cleaned.replace(',', "."),
        (_, 0) => cleaned.replace(',', ""),
        (0, _) if is_thousands_grouped(&cleaned, '.') => cleaned.replace('.', ""),
        (0, 1) => cleaned,
        (0, _) => return None,
        _ => {
            // Both present: whichever comes last is the decimal separator
            let comma_pos = cleaned.rfind(',');
            let dot_pos = cleaned.rfind('.');
            match (comma_pos, dot_pos) {
                (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
                _ => cleaned.replace(',', ""),
            }
        }
    };

    Decimal::from_str(&normalized).ok()
}

fn is_thousands_grouped(s: &str, separator: char) -> bool {
    let mut groups = s.split(separator);
    let head_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()));
    head_ok && groups.all(|g| g.len() == 3)
}

/// Format an integer string with "." thousands separators ("1234567" → "1.234.567").
///
/// Input without any digit renders as "0".
pub fn format_rp(value: &str) -> String {
    let digits: Vec<char> = value.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return "0".to_string();
    }

    let mut formatted = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    formatted
}

/// Format a decimal amount with two decimals and a comma ("1234.5" → "1234,50").
///
/// Empty or digit-free input renders as "0,00". Input that still fails to parse
/// is returned unchanged.
pub fn format_decimal(value: &str) -> String {
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return "0,00".to_string();
    }

    match parse_amount(value) {
        Some(amount) => format!("{:.2}", amount.round_dp(2)).replace('.', ","),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_documented_cases() {
        let catalog = DenominationCatalog::default();
        assert_eq!(snap_denomination("42000", &catalog), "50000");
        assert_eq!(snap_denomination("18500", &catalog), "20000");
        assert_eq!(snap_denomination("73000", &catalog), "73000");
    }

    #[test]
    fn test_snap_exact_and_unparseable() {
        let catalog = DenominationCatalog::default();
        assert_eq!(snap_denomination("100000", &catalog), "100000");
        assert_eq!(snap_denomination("98000", &catalog), "100000");
        assert_eq!(snap_denomination("abc", &catalog), "abc");
        assert_eq!(snap_denomination("", &catalog), "");
        assert_eq!(snap_denomination("1234", &catalog), "1234");
    }

    #[test]
    fn test_snap_prefers_lower_denomination_in_scan_order() {
        // 150 sits inside both windows; 200 is nearer but 100 is scanned first.
        let catalog = DenominationCatalog::new(vec![200, 100], 50);
        assert_eq!(catalog.denominations(), &[100, 200]);
        assert_eq!(snap_denomination("150", &catalog), "100");
    }

    #[test]
    fn test_snap_alternate_catalog() {
        let catalog = DenominationCatalog::new(vec![25_000, 75_000], 10);
        assert_eq!(snap_denomination("74000", &catalog), "75000");
        assert_eq!(snap_denomination("50000", &catalog), "50000");
    }

    #[test]
    fn test_rupiah_digits() {
        assert_eq!(rupiah_digits("2.500"), "2500");
        assert_eq!(rupiah_digits("42.000,00"), "42000");
        assert_eq!(rupiah_digits("1,234,567"), "1234567");
        assert_eq!(rupiah_digits("50.000."), "50000");
        assert_eq!(rupiah_digits("2500"), "2500");
        assert_eq!(rupiah_digits(""), "");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.234,56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_amount("1234.56"), Some(Decimal::from_str("1234.56").unwrap()));
        assert_eq!(parse_amount("12.500"), Some(Decimal::from(12500)));
        assert_eq!(parse_amount("0,5"), Some(Decimal::from_str("0.5").unwrap()));
        assert_eq!(parse_amount("1.2.3"), None);
    }

    #[test]
    fn test_format_rp() {
        assert_eq!(format_rp("1234567"), "1.234.567");
        assert_eq!(format_rp("123456"), "123.456");
        assert_eq!(format_rp("999"), "999");
        assert_eq!(format_rp(""), "0");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal("1234,5"), "1234,50");
        assert_eq!(format_decimal("0"), "0,00");
        assert_eq!(format_decimal(""), "0,00");
        assert_eq!(format_decimal("abc"), "0,00");
        assert_eq!(format_decimal("3.636,36"), "3636,36");
        assert_eq!(format_decimal("1.2.3,4,5"), "1.2.3,4,5");
    }
}
