//! Fixed-width text layout of a receipt record.

use chrono::NaiveDateTime;

use crate::models::receipt::{PaymentReceipt, ReceiptRecord, TokenReceipt};
use crate::receipt::rules::{format_decimal, format_kwh_display, format_rp};

use super::split_token;

/// Columns on a 58 mm printer.
pub const DEFAULT_LINE_WIDTH: usize = 32;

const MIN_LINE_WIDTH: usize = 16;
const LABEL_WIDTH: usize = 10;

/// What is printed above the record.
#[derive(Debug, Clone)]
pub struct PrintHeader {
    pub store_name: String,
    pub printed_at: NaiveDateTime,
}

/// Lays a record out as fixed-width lines.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptLayout {
    width: usize,
}

impl ReceiptLayout {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(MIN_LINE_WIDTH),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Render the header and record. No line exceeds the layout width.
    pub fn render(&self, record: &ReceiptRecord, header: &PrintHeader) -> Vec<String> {
        let mut lines = Vec::new();

        lines.extend(self.centered(&header.store_name.to_uppercase()));
        let title = match record {
            ReceiptRecord::Token(_) => "STRUK PEMBELIAN LISTRIK PRABAYAR",
            ReceiptRecord::Payment(_) => "STRUK PEMBAYARAN TAGIHAN",
        };
        lines.extend(self.centered(title));
        lines.extend(self.centered(&header.printed_at.format("%d/%m/%Y %H:%M").to_string()));
        lines.push(self.rule());

        match record {
            ReceiptRecord::Token(receipt) => self.token_body(receipt, &mut lines),
            ReceiptRecord::Payment(receipt) => self.payment_body(receipt, &mut lines),
        }

        lines.push(self.rule());
        lines.extend(self.centered("TERIMA KASIH"));
        lines
    }

    fn token_body(&self, receipt: &TokenReceipt, lines: &mut Vec<String>) {
        self.row(lines, "IDPEL", &receipt.idpel);
        self.row(lines, "NAMA", &receipt.nama);
        self.row(lines, "TARIF", &receipt.tarif);
        self.row(lines, "NOMINAL", &rupiah(&receipt.nominal));
        self.row(lines, "ADMIN", &rupiah(&receipt.admin));
        self.row(lines, "TOTAL", &rupiah(&receipt.total));
        self.row(lines, "PPN", &format_decimal(&receipt.ppn));
        self.row(lines, "ANGS/MAT", &receipt.angsmat);
        self.row(lines, "KWH", &format_kwh_display(&receipt.kwh));
        if !receipt.no_pesanan.is_empty() {
            self.row(lines, "NO PESANAN", &receipt.no_pesanan);
        }

        lines.push(self.rule());
        lines.extend(self.centered("TOKEN"));
        for part in split_token(&receipt.token) {
            lines.extend(self.centered(&part));
        }
    }

    fn payment_body(&self, receipt: &PaymentReceipt, lines: &mut Vec<String>) {
        self.row(lines, "IDPEL", &receipt.idpel);
        self.row(lines, "NAMA", &receipt.nama);
        self.row(lines, "LOKASI", &receipt.lokasi);
        self.row(lines, "PERIODE", &receipt.periode);
        if !receipt.stand.is_empty() {
            self.row(lines, "STAND", &receipt.stand);
        }
        self.row(lines, "TAGIHAN", &rupiah(&receipt.tagihan));
        if !receipt.denda.is_empty() {
            self.row(lines, "DENDA", &rupiah(&receipt.denda));
        }
        self.row(lines, "ADMIN", &rupiah(&receipt.admin));
        self.row(lines, "TOTAL", &rupiah(&receipt.total));
        if !receipt.no_pesanan.is_empty() {
            self.row(lines, "NO PESANAN", &receipt.no_pesanan);
        }
    }

    /// `LABEL     : value`, wrapping long values under the value column.
    fn row(&self, lines: &mut Vec<String>, label: &str, value: &str) {
        let indent = LABEL_WIDTH + 2;
        let chunks = wrap(value, self.width - indent);

        let mut chunks = chunks.into_iter();
        let first = chunks.next().unwrap_or_default();
        lines.push(format!("{:<w$}: {}", label, first, w = LABEL_WIDTH).trim_end().to_string());
        for chunk in chunks {
            lines.push(format!("{}{}", " ".repeat(indent), chunk));
        }
    }

    fn centered(&self, text: &str) -> Vec<String> {
        wrap(text, self.width)
            .into_iter()
            .map(|chunk| {
                let pad = (self.width - chunk.chars().count()) / 2;
                format!("{}{}", " ".repeat(pad), chunk)
            })
            .collect()
    }

    fn rule(&self) -> String {
        "-".repeat(self.width)
    }
}

impl Default for ReceiptLayout {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_WIDTH)
    }
}

fn rupiah(value: &str) -> String {
    format!("Rp {}", format_rp(value))
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            out.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = usize::from(!current.is_empty()) + word.chars().count();
        if current.chars().count() + needed > width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn header() -> PrintHeader {
        PrintHeader {
            store_name: "Loket Berkah".to_string(),
            printed_at: NaiveDate::from_ymd_opt(2025, 12, 1)
                .unwrap()
                .and_hms_opt(9, 5, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("SITI AMINAH BINTI ABDULLAH", 12), vec!["SITI AMINAH", "BINTI", "ABDULLAH"]);
        assert_eq!(wrap("ABCDEFGHIJ", 4), vec!["ABCD", "EFGH", "IJ"]);
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn test_render_token() {
        let record = ReceiptRecord::Token(TokenReceipt {
            idpel: "530123456789".to_string(),
            nama: "SITI AMINAH".to_string(),
            tarif: "R1/1300 VA".to_string(),
            kwh: "67,1".to_string(),
            nominal: "100000".to_string(),
            admin: "2500".to_string(),
            total: "102500".to_string(),
            token: "12345678901234567890".to_string(),
            ..Default::default()
        });

        let lines = ReceiptLayout::default().render(&record, &header());

        assert_eq!(lines[0], "          LOKET BERKAH");
        assert_eq!(lines[2], "        01/12/2025 09:05");
        assert!(lines.contains(&"NOMINAL   : Rp 100.000".to_string()));
        assert!(lines.contains(&"KWH       : 67,1 KWH".to_string()));
        assert!(lines.contains(&"         1234-5678-9012".to_string()));
        assert!(lines.contains(&"           3456-7890".to_string()));
        assert!(lines.iter().all(|l| l.chars().count() <= DEFAULT_LINE_WIDTH));
    }

    #[test]
    fn test_render_ppn_two_decimals() {
        let layout = ReceiptLayout::default();

        let lines = layout.render(&ReceiptRecord::Token(TokenReceipt::default()), &header());
        assert!(lines.contains(&"PPN       : 0,00".to_string()));

        let record = ReceiptRecord::Token(TokenReceipt {
            ppn: "1234,5".to_string(),
            ..Default::default()
        });
        let lines = layout.render(&record, &header());
        assert!(lines.contains(&"PPN       : 1234,50".to_string()));
    }

    #[test]
    fn test_render_payment_wraps_long_values() {
        let record = ReceiptRecord::Payment(PaymentReceipt {
            nama: "PT SUMBER AIR BERSIH SEJAHTERA ABADI".to_string(),
            periode: "DESEMBER 2025".to_string(),
            tagihan: "85500".to_string(),
            total: "88000".to_string(),
            ..Default::default()
        });

        let lines = ReceiptLayout::new(24).render(&record, &header());

        assert!(lines.contains(&"NAMA      : PT SUMBER".to_string()));
        assert!(lines.contains(&"            AIR BERSIH".to_string()));
        assert!(lines.contains(&"TAGIHAN   : Rp 85.500".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("STAND")));
        assert!(lines.iter().all(|l| l.chars().count() <= 24));
    }
}
