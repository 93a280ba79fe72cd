//! Print layout helpers.
//!
//! Turns a finished record into fixed-width text lines and an ESC/POS byte
//! stream. Delivering the bytes to a printer is left to the caller.

pub mod escpos;
mod layout;

pub use layout::{PrintHeader, ReceiptLayout, DEFAULT_LINE_WIDTH};

const TOKEN_DIGITS: usize = 20;
const GROUP_LEN: usize = 4;

fn token_groups(token: &str) -> Option<Vec<&str>> {
    if token.len() != TOKEN_DIGITS || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(
        (0..TOKEN_DIGITS)
            .step_by(GROUP_LEN)
            .map(|i| &token[i..i + GROUP_LEN])
            .collect(),
    )
}

/// Group a 20-digit token in runs of four ("1234 5678 9012 3456 7890").
///
/// Anything that is not exactly 20 digits comes back unchanged.
pub fn format_token(token: &str) -> String {
    match token_groups(token) {
        Some(groups) => groups.join(" "),
        None => token.to_string(),
    }
}

/// Split a 20-digit token over two printed lines: groups 1-3 and 4-5, joined
/// by hyphens.
///
/// Anything that is not exactly 20 digits comes back as a single line.
pub fn split_token(token: &str) -> Vec<String> {
    match token_groups(token) {
        Some(groups) => vec![groups[..3].join("-"), groups[3..].join("-")],
        None => vec![token.to_string()],
    }
}
