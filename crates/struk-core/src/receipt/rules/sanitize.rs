//! Value sanitization shared by every extracted field.

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::WHITESPACE;

lazy_static! {
    /// Label fragments a captured value may start with, stripped in order.
    ///
    /// Each entry is applied at most once; stripping one never re-runs the
    /// entries before it.
    pub static ref LABEL_PREFIXES: Vec<Regex> = vec![
        Regex::new(r"^T\s+").unwrap(),
        Regex::new(
            r"(?i)^(?:Nama|Tarif\s*/\s*Daya|Tarif|Daya|IDPEL|Nomor\s+Pelanggan|Nomor\s+Meter|No\.\s*Ref|No|Ref|Stroom|Token)(?:\s*[:\-.]+\s*|\s+|$)"
        ).unwrap(),
        Regex::new(r"(?i)^Rp\.?\s*").unwrap(),
    ];
}

/// Collapse whitespace, trim, and strip leading label fragments.
///
/// ```
/// use struk_core::receipt::rules::clean;
///
/// assert_eq!(clean("  IDPEL :  530123456789 "), "530123456789");
/// assert_eq!(clean("T R1M/900 VA"), "R1M/900 VA");
/// assert_eq!(clean(""), "");
/// ```
pub fn clean(value: &str) -> String {
    let collapsed = WHITESPACE.replace_all(value, " ");
    let mut cleaned = collapsed.trim().to_string();

    for prefix in LABEL_PREFIXES.iter() {
        if let Some(m) = prefix.find(&cleaned) {
            cleaned = cleaned[m.end()..].trim_start().to_string();
        }
    }

    cleaned
}
