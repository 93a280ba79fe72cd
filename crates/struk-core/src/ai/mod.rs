//! AI parser collaborator interface.
//!
//! An AI parser gets the first attempt at token receipts. Whatever it returns
//! is only a candidate: the orchestrator checks the shape and falls back to
//! the rules on any error.

use async_trait::async_trait;
use image::DynamicImage;
use serde_json::{Map, Value};

use crate::error::AiError;
use crate::models::receipt::{ReceiptRecord, TokenReceipt};

/// Instructions sent with every token receipt request.
pub const TOKEN_RECEIPT_PROMPT: &str = "\
You read Indonesian PLN prepaid electricity (token) receipts. \
Answer with a single JSON object and nothing else, using these string keys: \
token (the 20 digits only, no separators), idpel, nama, tarif \
(for example \"R1/900 VA\"), kwh (for example \"32,5\"), nominal (digits only), \
admin (digits only), total (digits only), ppn, angsmat (\"angsuran/materai\"), \
noPesanan. Use an empty string for anything that is not on the receipt.";

/// What the parser gets to look at.
#[derive(Debug, Clone, Copy)]
pub enum AiInput<'a> {
    /// OCR text of the receipt.
    Text(&'a str),
    /// The receipt image itself, for vision-capable models.
    Image(&'a DynamicImage),
}

/// Trait for AI receipt parsers.
#[async_trait]
pub trait AiReceiptParser: Send + Sync {
    /// Parse a token receipt.
    ///
    /// `Ok(None)` means the service answered but found nothing usable.
    async fn parse(&self, input: AiInput<'_>) -> Result<Option<ReceiptRecord>, AiError>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "ai"
    }
}

/// Parse the content of an AI response into a token record.
///
/// Markdown code fences are stripped, numeric and null values are coerced to
/// strings, and a `mode` other than `token` is rejected.
pub fn parse_ai_response(content: &str) -> Result<ReceiptRecord, AiError> {
    let body = strip_code_fence(content);
    let value: Value =
        serde_json::from_str(body).map_err(|e| AiError::MalformedResponse(e.to_string()))?;

    let Value::Object(mut object) = value else {
        return Err(AiError::Schema("expected a JSON object".to_string()));
    };

    match object.remove("mode") {
        None | Some(Value::Null) => {}
        Some(Value::String(mode)) if mode.eq_ignore_ascii_case("token") => {}
        Some(other) => {
            return Err(AiError::Schema(format!("unexpected mode {}", other)));
        }
    }

    let fields = coerce_scalars(object)?;
    let receipt: TokenReceipt = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AiError::Schema(e.to_string()))?;

    Ok(ReceiptRecord::Token(receipt))
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn coerce_scalars(object: Map<String, Value>) -> Result<Map<String, Value>, AiError> {
    object
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => Value::String(s),
                Value::Number(n) => Value::String(n.to_string()),
                Value::Null => Value::String(String::new()),
                other => {
                    return Err(AiError::Schema(format!("field {} is not a string: {}", key, other)));
                }
            };
            Ok((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_plain_json() {
        let record = parse_ai_response(
            r#"{"token": "12345678901234567890", "nama": "BUDI", "nominal": "50000"}"#,
        )
        .unwrap();

        let ReceiptRecord::Token(receipt) = record else {
            panic!("expected a token record");
        };
        assert_eq!(receipt.token, "12345678901234567890");
        assert_eq!(receipt.nama, "BUDI");
        assert_eq!(receipt.nominal, "50000");
        assert_eq!(receipt.ppn, "0");
        assert_eq!(receipt.angsmat, "0,00/0,00");
    }

    #[test]
    fn test_parse_fenced_json() {
        let content = "```json\n{\"idpel\": \"123456789012\", \"mode\": \"token\"}\n```";
        let record = parse_ai_response(content).unwrap();
        assert_eq!(record.idpel(), "123456789012");
    }

    #[test]
    fn test_numbers_and_nulls_coerced() {
        let record = parse_ai_response(r#"{"nominal": 100000, "admin": null}"#).unwrap();
        let ReceiptRecord::Token(receipt) = record else {
            panic!("expected a token record");
        };
        assert_eq!(receipt.nominal, "100000");
        assert_eq!(receipt.admin, "");
    }

    #[test]
    fn test_malformed_response() {
        assert!(matches!(
            parse_ai_response("maaf, saya tidak bisa membaca struk ini"),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_schema_mismatch() {
        assert!(matches!(parse_ai_response("[1, 2, 3]"), Err(AiError::Schema(_))));
        assert!(matches!(
            parse_ai_response(r#"{"mode": "payment", "idpel": "1"}"#),
            Err(AiError::Schema(_))
        ));
        assert!(matches!(
            parse_ai_response(r#"{"token": ["1234"]}"#),
            Err(AiError::Schema(_))
        ));
    }
}
