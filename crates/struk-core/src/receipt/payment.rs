//! Field extraction for bill and payment receipts.

use tracing::debug;

use crate::models::receipt::{PaymentReceipt, ReceiptMode, ReceiptRecord};

use super::rules::patterns::*;
use super::rules::period::{month_from_word, month_year};
use super::rules::{
    capture, capture_not_after, clean, first_capture, first_match, normalize_period,
    rupiah_digits, Matcher,
};
use super::ReceiptExtractor;

/// Field markers that end a customer name when they appear as separate words.
pub const PAYMENT_NAME_MARKERS: &[&str] = &[
    "NO.PEL", "ID PEL", "NO SAMB", "PERIODE", "ALAMAT", "TOTAL", "TAGIHAN",
];

/// Longest label-based period that is still believable.
const MAX_PERIOD_LEN: usize = 20;

const LOKASI_MATCHERS: &[Matcher] = &[lokasi_provider, lokasi_region, lokasi_first_line];

const PERIOD_MATCHERS: &[Matcher] = &[period_labeled, period_month_word, period_numeric];

const TAGIHAN_MATCHERS: &[Matcher] = &[tagihan_label, jml_tagihan, total_air, biaya_air];

/// Rule-based extractor for bill and payment receipts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentExtractor;

impl PaymentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract a payment receipt from OCR text.
    pub fn extract_receipt(&self, text: &str) -> PaymentReceipt {
        let mut receipt = PaymentReceipt {
            raw: text.to_string(),
            ..Default::default()
        };

        if let Some(lokasi) = first_match(text, LOKASI_MATCHERS) {
            receipt.lokasi = lokasi;
        }
        if let Some(nama) = extract_name(text) {
            receipt.nama = nama;
        }
        if let Some(idpel) = first_capture(text, &[&*IDPEL_PAYMENT, &*IDPEL_BARE]) {
            receipt.idpel = idpel;
        }
        if let Some(periode) = first_match(text, PERIOD_MATCHERS) {
            receipt.periode = normalize_period(&periode);
        }
        if let Some(stand) = capture(&STAND, text) {
            receipt.stand = stand.replace([' ', '\t'], "");
        }
        if let Some(tagihan) = first_match(text, TAGIHAN_MATCHERS).map(|v| rupiah_digits(&v)) {
            receipt.tagihan = tagihan;
        }
        if let Some(admin) = money(text, &[&*ADMIN_BIAYA, &*ADMIN_LABEL, &*ADMIN_SHORT]) {
            receipt.admin = admin;
        }
        if let Some(total) = money(text, &[&*TOTAL_BAYAR, &*TOTAL_LABEL]) {
            receipt.total = total;
        }
        if let Some(denda) = money(text, &[&*DENDA]) {
            receipt.denda = denda;
        }

        // A known money value is never left without its counterpart
        if receipt.total.is_empty() && !receipt.tagihan.is_empty() {
            receipt.total = receipt.tagihan.clone();
        } else if receipt.tagihan.is_empty() && !receipt.total.is_empty() {
            receipt.tagihan = receipt.total.clone();
        }

        if let Some(order) = capture(&ORDER_NUMBER, text) {
            receipt.no_pesanan = order;
        }

        let receipt = sanitize(receipt);

        debug!(
            lokasi = %receipt.lokasi,
            periode = %receipt.periode,
            tagihan = %receipt.tagihan,
            "Extracted payment receipt"
        );

        receipt
    }
}

impl ReceiptExtractor for PaymentExtractor {
    fn mode(&self) -> ReceiptMode {
        ReceiptMode::Payment
    }

    fn extract(&self, text: &str) -> ReceiptRecord {
        ReceiptRecord::Payment(self.extract_receipt(text))
    }
}

fn trim_location_noise(value: &str) -> Option<String> {
    let trimmed = LOKASI_NOISE.replace(value.trim(), "");
    Some(trimmed.trim().to_string()).filter(|v| !v.is_empty())
}

fn lokasi_provider(text: &str) -> Option<String> {
    capture(&LOKASI_PROVIDER, text).and_then(|v| trim_location_noise(&v))
}

fn lokasi_region(text: &str) -> Option<String> {
    capture(&LOKASI_REGION, text).and_then(|v| trim_location_noise(&v))
}

fn lokasi_first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| line.chars().count() > 3 && !ISO_DATE.is_match(line))
        .and_then(trim_location_noise)
}

fn extract_name(text: &str) -> Option<String> {
    let value = capture(&NAME_LABEL, text)?;
    let pruned = prune_at_markers(&value);
    let name = NAME_RESTATED.replace(pruned.trim(), "");

    Some(name.trim().to_string()).filter(|n| !n.is_empty())
}

/// Cut `value` at the first marker that starts a separate word.
fn prune_at_markers(value: &str) -> &str {
    let upper = value.to_ascii_uppercase();

    let end = PAYMENT_NAME_MARKERS
        .iter()
        .filter_map(|marker| {
            upper
                .match_indices(marker)
                .map(|(i, _)| i)
                .find(|&i| i == 0 || upper[..i].ends_with(char::is_whitespace))
        })
        .min()
        .unwrap_or(value.len());

    &value[..end]
}

fn period_labeled(text: &str) -> Option<String> {
    [&*PERIODE_TAGIHAN, &*PERIODE, &*BULAN, &*THN_BLN, &*REKENING_BULAN]
        .iter()
        .filter_map(|re| capture(re, text))
        .map(|value| PERIOD_NOISE.replace(&value, "").trim().to_string())
        .find(|period| {
            (FOUR_DIGITS.is_match(period) || THREE_LETTERS.is_match(period))
                && period.chars().count() < MAX_PERIOD_LEN
        })
}

fn period_month_word(text: &str) -> Option<String> {
    let caps = MONTH_WORD_YEAR.captures(text)?;
    let index = month_from_word(&caps[1])?;
    Some(month_year(index, &caps[2]))
}

fn period_numeric(text: &str) -> Option<String> {
    let caps = MONTH_NUMERIC_YEAR.captures(text)?;
    let month: usize = caps[1].parse().ok()?;
    Some(month_year(month - 1, &caps[2]))
}

fn tagihan_label(text: &str) -> Option<String> {
    capture_not_after(&TAGIHAN, text, "Periode")
}

fn jml_tagihan(text: &str) -> Option<String> {
    capture(&JML_TAGIHAN, text)
}

fn total_air(text: &str) -> Option<String> {
    capture(&TOTAL_AIR, text)
}

fn biaya_air(text: &str) -> Option<String> {
    capture(&BIAYA_AIR, text)
}

fn money(text: &str, patterns: &[&regex::Regex]) -> Option<String> {
    first_capture(text, patterns)
        .map(|value| rupiah_digits(&value))
        .filter(|digits| !digits.is_empty())
}

/// Names keep their punctuation; everything else except `raw` is cleaned.
fn sanitize(receipt: PaymentReceipt) -> PaymentReceipt {
    PaymentReceipt {
        idpel: clean(&receipt.idpel),
        admin: clean(&receipt.admin),
        total: clean(&receipt.total),
        no_pesanan: clean(&receipt.no_pesanan),
        lokasi: clean(&receipt.lokasi),
        periode: clean(&receipt.periode),
        stand: clean(&receipt.stand),
        tagihan: clean(&receipt.tagihan),
        denda: clean(&receipt.denda),
        nama: receipt.nama,
        raw: receipt.raw,
    }
}
