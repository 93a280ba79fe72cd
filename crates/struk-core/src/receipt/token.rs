//! Field extraction for prepaid electricity token receipts.

use tracing::debug;

use crate::models::receipt::{ReceiptMode, ReceiptRecord, TokenReceipt};

use super::rules::patterns::*;
use super::rules::{
    capture, clean, first_capture, first_match, format_kwh_value, rupiah_digits,
    snap_denomination, DenominationCatalog, Matcher,
};
use super::ReceiptExtractor;

/// Tariff rules, most specific first.
const TARIF_MATCHERS: &[Matcher] = &[tarif_strict, tarif_labeled];

/// Rule-based extractor for token purchase receipts.
#[derive(Debug, Clone, Default)]
pub struct TokenExtractor {
    catalog: DenominationCatalog,
}

impl TokenExtractor {
    /// Create an extractor with the canonical denomination catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different denomination catalog for snapping the face value.
    pub fn with_catalog(mut self, catalog: DenominationCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &DenominationCatalog {
        &self.catalog
    }

    /// Extract a token receipt from OCR text. Fields that cannot be found keep
    /// their defaults.
    pub fn extract_receipt(&self, text: &str) -> TokenReceipt {
        let mut receipt = TokenReceipt {
            raw: text.to_string(),
            ..Default::default()
        };

        if let Some(token) = extract_token(text) {
            receipt.token = token;
        }
        if let Some(idpel) = first_capture(text, &[&*IDPEL_NOMOR, &*IDPEL_LABEL]) {
            receipt.idpel = idpel;
        }
        if let Some(nama) = extract_name(text) {
            receipt.nama = nama;
        }
        if let Some(tarif) = first_match(text, TARIF_MATCHERS) {
            receipt.tarif = tarif;
        }
        if let Some(kwh) = extract_kwh(text) {
            receipt.kwh = kwh;
        }
        if let Some(nominal) = self.extract_nominal(text) {
            receipt.nominal = nominal;
        }
        if let Some(admin) = money(text, &[&*ADMIN_BIAYA, &*ADMIN_LABEL]) {
            receipt.admin = admin;
        }
        if let Some(total) = money(text, &[&*TOTAL_TAGIHAN, &*TOTAL_LABEL, &*TOTAL_RP_BAYAR]) {
            receipt.total = total;
        }
        if let Some(ppn) = capture(&PPN, text) {
            receipt.ppn = ppn.replace(' ', "");
        }
        if let (Some(angsuran), Some(materai)) = (capture(&ANGSURAN, text), capture(&MATERAI, text)) {
            receipt.angsmat = format!("{}/{}", angsuran, materai);
        }
        if let Some(order) = capture(&ORDER_NUMBER, text) {
            receipt.no_pesanan = order;
        }

        let receipt = sanitize(receipt);

        debug!(
            token = !receipt.token.is_empty(),
            idpel = %receipt.idpel,
            nominal = %receipt.nominal,
            "Extracted token receipt"
        );

        receipt
    }

    fn extract_nominal(&self, text: &str) -> Option<String> {
        let amount = money(
            text,
            &[&*NOMINAL_RP_STROOM, &*NOMINAL_STROOM, &*NOMINAL_NILAI, &*NOMINAL_LABEL],
        )
        .or_else(|| self.bare_denomination(text))?;

        Some(snap_denomination(&amount, &self.catalog))
    }

    /// Any unlabeled amount that is exactly a catalog denomination.
    fn bare_denomination(&self, text: &str) -> Option<String> {
        BARE_AMOUNT
            .captures_iter(text)
            .filter_map(|caps| rupiah_digits(&caps[1]).parse::<u64>().ok())
            .find(|amount| self.catalog.contains(*amount))
            .map(|amount| amount.to_string())
    }
}

impl ReceiptExtractor for TokenExtractor {
    fn mode(&self) -> ReceiptMode {
        ReceiptMode::Token
    }

    fn extract(&self, text: &str) -> ReceiptRecord {
        ReceiptRecord::Token(self.extract_receipt(text))
    }
}

fn extract_token(text: &str) -> Option<String> {
    first_capture(text, &[&*TOKEN_LABELED, &*TOKEN_GROUPED, &*TOKEN_BARE])
        .map(|m| m.chars().filter(|c| c.is_ascii_digit()).collect::<String>())
        .filter(|digits| digits.len() == 20)
}

/// Name runs to the end of its line or the next field label on the same line.
fn extract_name(text: &str) -> Option<String> {
    let value = capture(&NAME_LABEL, text)?;
    let end = NAME_BOUNDARY
        .find(&value)
        .map(|m| m.start())
        .unwrap_or(value.len());

    Some(value[..end].trim().to_string()).filter(|name| !name.is_empty())
}

fn tarif_strict(text: &str) -> Option<String> {
    TARIF_STRICT
        .captures(text)
        .map(|caps| format!("{}/{} VA", caps[1].to_uppercase(), &caps[2]))
}

fn tarif_labeled(text: &str) -> Option<String> {
    let value = capture(&TARIF_LABEL, text)?;
    let collapsed = WHITESPACE.replace_all(&value, " ");
    let unlabeled = TARIF_RESTATED.replace(collapsed.trim(), "");
    let truncated = TARIF_GARBAGE.replace(&unlabeled, "");

    let mut tarif = truncated.trim().to_string();
    if tarif.is_empty() {
        return None;
    }

    if tarif.chars().any(|c| c.is_ascii_digit()) && !VA_SUFFIX.is_match(&tarif) {
        tarif.push_str(" VA");
    }

    Some(tarif)
}

fn extract_kwh(text: &str) -> Option<String> {
    first_capture(text, &[&*KWH_AFTER, &*KWH_BEFORE])
        .map(|value| format_kwh_value(&value))
        .filter(|kwh| !kwh.is_empty())
}

fn money(text: &str, patterns: &[&regex::Regex]) -> Option<String> {
    first_capture(text, patterns)
        .map(|value| rupiah_digits(&value))
        .filter(|digits| !digits.is_empty())
}

fn sanitize(receipt: TokenReceipt) -> TokenReceipt {
    TokenReceipt {
        idpel: clean(&receipt.idpel),
        nama: clean(&receipt.nama),
        admin: clean(&receipt.admin),
        total: clean(&receipt.total),
        no_pesanan: clean(&receipt.no_pesanan),
        token: clean(&receipt.token),
        tarif: clean(&receipt.tarif),
        kwh: clean(&receipt.kwh),
        nominal: clean(&receipt.nominal),
        ppn: clean(&receipt.ppn),
        angsmat: clean(&receipt.angsmat),
        raw: receipt.raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLN_RECEIPT: &str = r#"STRUK PEMBELIAN LISTRIK PRABAYAR
NO METER     : 14123456789
IDPEL        : 530123456789
NAMA         : SITI AMINAH
TARIF/DAYA   : R1/1300 VA
NO REF       : 0ABC12345DEF
RP BAYAR     : Rp 102.500
METERAI      : Rp 0,00
PPn          : Rp 0,00
PPj          : Rp 2.400,00
ANGSURAN     : Rp 0,00
RP STROOM/TOKEN : Rp 97.600,00
JML KWH      : 67,10
STROOM/TOKEN : 1234 5678 9012 3456 7890
ADMIN BANK   : Rp 2.500"#;

    #[test]
    fn test_extract_scenario() {
        let text = "Nomor Pelanggan 530123456789\n\
                    Nama: BUDI SANTOSO\n\
                    R1M/900 VA\n\
                    Jumlah KWH 3530\n\
                    Stroom/Token Rp42000\n\
                    Biaya Admin Rp2500";

        let receipt = TokenExtractor::new().extract_receipt(text);

        assert_eq!(receipt.idpel, "530123456789");
        assert_eq!(receipt.nama, "BUDI SANTOSO");
        assert_eq!(receipt.tarif, "R1M/900 VA");
        assert_eq!(receipt.kwh, "35,3");
        assert_eq!(receipt.nominal, "50000");
        assert_eq!(receipt.admin, "2500");
        assert_eq!(receipt.raw, text);
    }

    #[test]
    fn test_extract_full_receipt() {
        let receipt = TokenExtractor::new().extract_receipt(PLN_RECEIPT);

        let expected = TokenReceipt {
            idpel: "530123456789".to_string(),
            nama: "SITI AMINAH".to_string(),
            admin: "2500".to_string(),
            total: "102500".to_string(),
            no_pesanan: String::new(),
            raw: PLN_RECEIPT.to_string(),
            token: "12345678901234567890".to_string(),
            tarif: "R1/1300 VA".to_string(),
            kwh: "67,1".to_string(),
            nominal: "100000".to_string(),
            ppn: "0,00".to_string(),
            angsmat: "0,00/0,00".to_string(),
        };

        assert_eq!(receipt, expected);
    }

    #[test]
    fn test_empty_text_defaults() {
        let receipt = TokenExtractor::new().extract_receipt("");
        assert_eq!(receipt, TokenReceipt::default());
    }

    #[test]
    fn test_token_formats() {
        assert_eq!(
            extract_token("TOKEN: 1234-5678-9012-3456-7890"),
            Some("12345678901234567890".to_string())
        );
        assert_eq!(
            extract_token("kode\n0987 6543 2109 8765 4321\nterima kasih"),
            Some("09876543210987654321".to_string())
        );
        assert_eq!(
            extract_token("12345678901234567890"),
            Some("12345678901234567890".to_string())
        );
        assert_eq!(extract_token("1234 5678 9012"), None);
    }

    #[test]
    fn test_name_stops_at_label_on_same_line() {
        let text = "Nama : AHMAD DAHLAN Tarif/Daya : R1/900 VA";
        assert_eq!(extract_name(text), Some("AHMAD DAHLAN".to_string()));
        assert_eq!(extract_name("Nama:\nTarif R1"), None);
    }

    #[test]
    fn test_tarif_fallback() {
        assert_eq!(
            tarif_labeled("Tarif/Daya : R1  /  1300 No Ref 123"),
            Some("R1 / 1300 VA".to_string())
        );
        assert_eq!(
            tarif_labeled("Daya: 2200VA Jam 10:00"),
            Some("2200VA".to_string())
        );
        assert_eq!(tarif_labeled("Tarif: R1T"), Some("R1T VA".to_string()));
        assert_eq!(
            tarif_labeled("Tarif: RUMAH TANGGA"),
            Some("RUMAH TANGGA".to_string())
        );
        assert_eq!(tarif_labeled("no power class here"), None);
    }

    #[test]
    fn test_tarif_strict_normalizes_spacing() {
        assert_eq!(
            first_match("daya r1m / 900va", TARIF_MATCHERS),
            Some("R1M/900 VA".to_string())
        );
    }

    #[test]
    fn test_kwh_spaced_label() {
        assert_eq!(extract_kwh("K W H : 14090"), Some("140,9".to_string()));
        assert_eq!(extract_kwh("46 kWh"), Some("46,0".to_string()));
        assert_eq!(extract_kwh("no energy"), None);
    }

    #[test]
    fn test_kwh_keeps_decimal_value() {
        assert_eq!(extract_kwh("JML KWH : 32,5"), Some("32,5".to_string()));
        assert_eq!(extract_kwh("12,25 kWh"), Some("12,3".to_string()));
    }

    #[test]
    fn test_idpel_spaced_label() {
        let receipt = TokenExtractor::new().extract_receipt("ID PEL: 530123456789");
        assert_eq!(receipt.idpel, "530123456789");
    }

    #[test]
    fn test_token_without_separators() {
        let receipt = TokenExtractor::new().extract_receipt("TOKEN: 12345678901234567890");
        assert_eq!(receipt.token, "12345678901234567890");
    }

    #[test]
    fn test_nominal_from_bare_denomination() {
        let extractor = TokenExtractor::new();
        let text = "IDPEL 530123456789\nHarga 20.000\nterima kasih";
        assert_eq!(extractor.extract_nominal(text), Some("20000".to_string()));
        assert_eq!(extractor.extract_nominal("Harga 12.345"), None);
    }

    #[test]
    fn test_nominal_uses_injected_catalog() {
        let extractor =
            TokenExtractor::new().with_catalog(DenominationCatalog::new(vec![25_000], 10));
        assert_eq!(
            extractor.extract_nominal("Nilai Token: Rp 24.000"),
            Some("25000".to_string())
        );
    }

    #[test]
    fn test_angsmat_requires_both_values() {
        let only_angsuran = TokenExtractor::new().extract_receipt("Angsuran: 1.500,00");
        assert_eq!(only_angsuran.angsmat, "0,00/0,00");

        let both = TokenExtractor::new().extract_receipt("Angsuran: 1.500,00\nMaterai: 0,00");
        assert_eq!(both.angsmat, "1.500,00/0,00");
    }

    #[test]
    fn test_order_number() {
        let receipt = TokenExtractor::new().extract_receipt("No. Pesanan: INV20251201A");
        assert_eq!(receipt.no_pesanan, "INV20251201A");
    }
}
