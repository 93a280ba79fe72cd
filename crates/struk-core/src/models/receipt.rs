//! Structured receipt records.
//!
//! Every field is a string. A field that could not be recovered is the empty
//! string (or the mode's canonical default), never absent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default tax value for token receipts.
pub const DEFAULT_PPN: &str = "0";

/// Default installment/stamp-duty composite for token receipts.
pub const DEFAULT_ANGSMAT: &str = "0,00/0,00";

/// Which receipt layout family a text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptMode {
    /// Prepaid electricity token purchase receipt.
    Token,
    /// Generic bill/payment receipt (water, postpaid electricity, ...).
    Payment,
}

impl fmt::Display for ReceiptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => f.write_str("token"),
            Self::Payment => f.write_str("payment"),
        }
    }
}

/// A structured receipt, tagged by `mode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ReceiptRecord {
    Token(TokenReceipt),
    Payment(PaymentReceipt),
}

/// Prepaid electricity token receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenReceipt {
    /// Customer/connection identifier.
    pub idpel: String,
    /// Customer name.
    pub nama: String,
    /// Administrative fee, whole rupiah.
    pub admin: String,
    /// Grand total, whole rupiah.
    pub total: String,
    /// Order reference.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub no_pesanan: String,
    /// Verbatim OCR text.
    pub raw: String,
    /// 20-digit prepaid code.
    pub token: String,
    /// Tariff and power class, e.g. `R1M/900 VA`.
    pub tarif: String,
    /// Energy quantity with a comma decimal, e.g. `35,3`.
    pub kwh: String,
    /// Token face value snapped to a known denomination.
    pub nominal: String,
    /// Tax amount with its decimal marker preserved.
    pub ppn: String,
    /// `angsuran/materai` composite.
    pub angsmat: String,
}

impl Default for TokenReceipt {
    fn default() -> Self {
        Self {
            idpel: String::new(),
            nama: String::new(),
            admin: String::new(),
            total: String::new(),
            no_pesanan: String::new(),
            raw: String::new(),
            token: String::new(),
            tarif: String::new(),
            kwh: String::new(),
            nominal: String::new(),
            ppn: DEFAULT_PPN.to_string(),
            angsmat: DEFAULT_ANGSMAT.to_string(),
        }
    }
}

/// Bill or payment receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentReceipt {
    pub idpel: String,
    pub nama: String,
    pub admin: String,
    pub total: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub no_pesanan: String,
    pub raw: String,
    /// Utility/provider location label.
    pub lokasi: String,
    /// Billing period as `MONTHNAME YEAR`.
    pub periode: String,
    /// Meter reading.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stand: String,
    /// Bill amount before the administrative fee.
    pub tagihan: String,
    /// Late fee.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub denda: String,
}

impl ReceiptRecord {
    pub fn mode(&self) -> ReceiptMode {
        match self {
            Self::Token(_) => ReceiptMode::Token,
            Self::Payment(_) => ReceiptMode::Payment,
        }
    }

    pub fn idpel(&self) -> &str {
        match self {
            Self::Token(r) => &r.idpel,
            Self::Payment(r) => &r.idpel,
        }
    }

    pub fn nama(&self) -> &str {
        match self {
            Self::Token(r) => &r.nama,
            Self::Payment(r) => &r.nama,
        }
    }

    pub fn admin(&self) -> &str {
        match self {
            Self::Token(r) => &r.admin,
            Self::Payment(r) => &r.admin,
        }
    }

    pub fn total(&self) -> &str {
        match self {
            Self::Token(r) => &r.total,
            Self::Payment(r) => &r.total,
        }
    }

    pub fn no_pesanan(&self) -> &str {
        match self {
            Self::Token(r) => &r.no_pesanan,
            Self::Payment(r) => &r.no_pesanan,
        }
    }

    /// The verbatim OCR text this record was produced from.
    pub fn raw(&self) -> &str {
        match self {
            Self::Token(r) => &r.raw,
            Self::Payment(r) => &r.raw,
        }
    }

    pub(crate) fn set_raw(&mut self, raw: &str) {
        match self {
            Self::Token(r) => r.raw = raw.to_string(),
            Self::Payment(r) => r.raw = raw.to_string(),
        }
    }

    /// Whether the record carries the value a receipt exists for: the token
    /// code for token receipts, a bill amount for payment receipts.
    pub fn has_payload(&self) -> bool {
        match self {
            Self::Token(r) => !r.token.is_empty(),
            Self::Payment(r) => !r.tagihan.is_empty() || !r.total.is_empty(),
        }
    }

    /// Replace the administrative fee with a user-supplied one.
    ///
    /// The total moves by the fee difference when it is a plain integer.
    /// A payment receipt without a usable total gets `tagihan + fee` instead.
    pub fn apply_admin_override(&mut self, fee: u64) {
        let (admin, total, tagihan) = match self {
            Self::Token(r) => (&mut r.admin, &mut r.total, None),
            Self::Payment(r) => (&mut r.admin, &mut r.total, Some(r.tagihan.as_str())),
        };

        let old_fee = admin.parse::<u64>().unwrap_or(0);

        if let Ok(current) = total.parse::<u64>() {
            *total = current.saturating_sub(old_fee).saturating_add(fee).to_string();
        } else if let Some(bill) = tagihan.and_then(|t| t.parse::<u64>().ok()) {
            *total = bill.saturating_add(fee).to_string();
        }

        *admin = fee.to_string();
    }
}

impl From<TokenReceipt> for ReceiptRecord {
    fn from(receipt: TokenReceipt) -> Self {
        Self::Token(receipt)
    }
}

impl From<PaymentReceipt> for ReceiptRecord {
    fn from(receipt: PaymentReceipt) -> Self {
        Self::Payment(receipt)
    }
}
