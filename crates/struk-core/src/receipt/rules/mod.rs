//! Rule primitives shared by the token and payment extractors.

pub mod amounts;
pub mod kwh;
pub mod patterns;
pub mod period;
pub mod sanitize;

pub use amounts::{
    format_decimal, format_rp, parse_amount, rupiah_digits, snap_denomination, DenominationCatalog,
};
pub use kwh::{format_kwh_digits, format_kwh_display, format_kwh_value};
pub use period::{month_name, normalize_period};
pub use sanitize::clean;

use regex::Regex;

/// One way of locating a field value in receipt text.
pub type Matcher = fn(&str) -> Option<String>;

/// Run matchers in order and return the first value found.
///
/// Later matchers only run when every earlier one came back empty.
pub fn first_match(text: &str, matchers: &[Matcher]) -> Option<String> {
    matchers.iter().find_map(|matcher| matcher(text))
}

/// First capture produced by any pattern, trying patterns in order.
pub fn first_capture(text: &str, patterns: &[&Regex]) -> Option<String> {
    patterns.iter().find_map(|re| capture(re, text))
}

/// First capture group of the first match, trimmed. Empty captures count as
/// no match.
pub fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Like [`capture`], but skips matches whose preceding word is `word`
/// (compared case-insensitively).
pub fn capture_not_after(re: &Regex, text: &str, word: &str) -> Option<String> {
    re.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let before = text[..whole.start()].trim_end();
        let preceded = before.len() >= word.len()
            && before.is_char_boundary(before.len() - word.len())
            && before[before.len() - word.len()..].eq_ignore_ascii_case(word);

        if preceded {
            return None;
        }

        caps.get(1)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref AMOUNT: Regex = Regex::new(r"(?i)Tagihan\s*(\d+)").unwrap();
    }

    fn never(_: &str) -> Option<String> {
        None
    }

    fn always(_: &str) -> Option<String> {
        Some("first".to_string())
    }

    fn second(_: &str) -> Option<String> {
        Some("second".to_string())
    }

    #[test]
    fn test_first_match_order() {
        assert_eq!(first_match("", &[never, always, second]), Some("first".to_string()));
        assert_eq!(first_match("", &[never, never]), None);
        assert_eq!(first_match("", &[]), None);
    }

    #[test]
    fn test_capture_not_after_skips_excluded_word() {
        let text = "Periode Tagihan 202512\nTagihan 50000";
        assert_eq!(
            capture_not_after(&AMOUNT, text, "periode"),
            Some("50000".to_string())
        );
        assert_eq!(capture(&AMOUNT, text), Some("202512".to_string()));
    }
}
