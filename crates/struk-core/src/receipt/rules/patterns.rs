//! Regex patterns for Indonesian utility receipts.
//!
//! Each field gets several narrow patterns rather than one alternation, so the
//! extractors control precedence explicitly.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Whitespace runs
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Token (20 digits, usually printed as five groups of four)
    pub static ref TOKEN_LABELED: Regex = Regex::new(
        r"(?i)(?:Stroom\s*/\s*Token|Nomor\s+Token|Token)\s*[:.]?\s*(\d{4}(?:[ \t-]*\d{4}){4})\b"
    ).unwrap();

    pub static ref TOKEN_GROUPED: Regex = Regex::new(
        r"\b(\d{4}(?:[ \t-]+\d{4}){4})\b"
    ).unwrap();

    pub static ref TOKEN_BARE: Regex = Regex::new(r"\b(\d{20})\b").unwrap();

    // Customer id
    pub static ref IDPEL_NOMOR: Regex = Regex::new(
        r"(?i)Nomor\s+Pelanggan\s*[:.]?\s*(\d{11,12})\b"
    ).unwrap();

    pub static ref IDPEL_LABEL: Regex = Regex::new(
        r"(?i)\bID\s?PEL\s*[:.]?\s*(\d{11,12})\b"
    ).unwrap();

    pub static ref IDPEL_PAYMENT: Regex = Regex::new(
        r"(?i)(?:Nomor\s+Pelanggan|Nomor\s+Sambungan|No\.?\s*Pel(?:anggan)?|No\.?\s*Samb(?:ungan)?|\bID\s?PEL)\s*[:.]?\s*(\d+)"
    ).unwrap();

    pub static ref IDPEL_BARE: Regex = Regex::new(r"\b(\d{6,12})\b").unwrap();

    // Customer name
    pub static ref NAME_LABEL: Regex = Regex::new(
        r"(?i)\bNama(?:\s+Pelanggan)?[ \t]*[:.]?[ \t]*([^\n]*)"
    ).unwrap();

    pub static ref NAME_BOUNDARY: Regex = Regex::new(
        r"(?i)\b(?:Tarif|Daya|Nomor\s+Pelanggan|ID\s?PEL|Stroom|Token|Total|No\.?\s*Pesanan|Nomor\s+Pesanan|Nomor\s+Meter|No\.?\s*Meter)\b"
    ).unwrap();

    pub static ref NAME_RESTATED: Regex = Regex::new(
        r"(?i)^Nama(?:\s+Pelanggan)?\s*[:.]?\s*"
    ).unwrap();

    // Tariff / power class
    pub static ref TARIF_STRICT: Regex = Regex::new(
        r"(?i)\b(R[A-Z0-9]{1,3})\s*/\s*(\d+(?:[.,]\d+)?)\s*VA\b"
    ).unwrap();

    pub static ref TARIF_LABEL: Regex = Regex::new(
        r"(?i)\b(?:Tarif\s*/\s*Daya|Tarif|Daya)[ \t]*[:.]?[ \t]*([^\n]+)"
    ).unwrap();

    pub static ref TARIF_RESTATED: Regex = Regex::new(
        r"(?i)^(?:Tarif\s*/\s*Daya|Tarif|Daya)\s*[:.]?\s*"
    ).unwrap();

    pub static ref TARIF_GARBAGE: Regex = Regex::new(
        r"(?i)\s+(?:No|Ref|Nomor|Jam|Tgl|Tanggal)\b.*$"
    ).unwrap();

    pub static ref VA_SUFFIX: Regex = Regex::new(r"(?i)VA$").unwrap();

    // Energy quantity
    pub static ref KWH_AFTER: Regex = Regex::new(
        r"(?i)K[ \t]*W[ \t]*H[ \t]*[:.]?[ \t]*(\d+(?:[.,]\d+)?)"
    ).unwrap();

    pub static ref KWH_BEFORE: Regex = Regex::new(
        r"(?i)(\d+(?:[.,]\d+)?)[ \t]*K[ \t]*W[ \t]*H\b"
    ).unwrap();

    // Token face value
    pub static ref NOMINAL_RP_STROOM: Regex = Regex::new(
        r"(?i)Rp\.?\s*Stroom\s*/\s*Token\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref NOMINAL_STROOM: Regex = Regex::new(
        r"(?i)Stroom\s*/\s*Token\s*[:.]?\s*Rp\.?\s*(\d[\d.,]*)"
    ).unwrap();

    pub static ref NOMINAL_NILAI: Regex = Regex::new(
        r"(?i)Nilai\s+Token\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref NOMINAL_LABEL: Regex = Regex::new(
        r"(?i)\bNominal\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref BARE_AMOUNT: Regex = Regex::new(
        r"\b(\d{1,3}(?:[.,]\d{3})+|\d{5,7})\b"
    ).unwrap();

    // Fees and totals
    pub static ref ADMIN_BIAYA: Regex = Regex::new(
        r"(?i)Biaya\s+Admin(?:istrasi)?\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref ADMIN_LABEL: Regex = Regex::new(
        r"(?i)\bAdmin(?:\s+Bank)?\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref ADMIN_SHORT: Regex = Regex::new(
        r"(?i)\bAdm\.?\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref TOTAL_TAGIHAN: Regex = Regex::new(
        r"(?i)Total\s+Tagihan\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref TOTAL_BAYAR: Regex = Regex::new(
        r"(?i)Total\s+Bayar\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref TOTAL_LABEL: Regex = Regex::new(
        r"(?i)\bTotal\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref TOTAL_RP_BAYAR: Regex = Regex::new(
        r"(?i)\bRp\.?\s*Bayar\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref TAGIHAN: Regex = Regex::new(
        r"(?i)\bTagihan\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref JML_TAGIHAN: Regex = Regex::new(
        r"(?i)\bJml\.?\s*Tagihan\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref TOTAL_AIR: Regex = Regex::new(
        r"(?i)Total\s+Air\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref BIAYA_AIR: Regex = Regex::new(
        r"(?i)Biaya\s+Air\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref DENDA: Regex = Regex::new(
        r"(?i)\bDenda\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    // Tax and installment/stamp duty
    pub static ref PPN: Regex = Regex::new(
        r"(?i)\bPPn\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d., ]*\d|\d)"
    ).unwrap();

    pub static ref ANGSURAN: Regex = Regex::new(
        r"(?i)\bAngsuran\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    pub static ref MATERAI: Regex = Regex::new(
        r"(?i)\bM[ae]t[ae]rai\s*[:.]?\s*(?:Rp\.?\s*)?(\d[\d.,]*)"
    ).unwrap();

    // Order reference
    pub static ref ORDER_NUMBER: Regex = Regex::new(
        r"(?i)(?:No\.?\s*Pesanan|Nomor\s+Pesanan)\s*[:.]?\s*([A-Za-z0-9]+)"
    ).unwrap();

    // Location
    pub static ref LOKASI_PROVIDER: Regex = Regex::new(
        r"(?i)\b(?:PDAM|PERUMDA|TIRTA)\b[ \t.:]*([^\n]+)"
    ).unwrap();

    pub static ref LOKASI_REGION: Regex = Regex::new(
        r"(?i)\b((?:KAB\.|KABUPATEN|KOTA)[ \t]*[^\n]+)"
    ).unwrap();

    pub static ref LOKASI_NOISE: Regex = Regex::new(
        r"(?i)\s+(?:No|Nomor|Pelanggan)\b.*$"
    ).unwrap();

    pub static ref ISO_DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap();

    // Meter reading
    pub static ref STAND: Regex = Regex::new(
        r"(?i)\bStand(?:\s+Meter)?\s*[:.]?\s*(\d+(?:[ \t]*-[ \t]*\d+)?)"
    ).unwrap();

    // Billing period
    pub static ref PERIODE_TAGIHAN: Regex = Regex::new(
        r"(?i)Periode\s+Tagihan[ \t]*[:.]?[ \t]*([^\n]+)"
    ).unwrap();

    pub static ref PERIODE: Regex = Regex::new(
        r"(?i)\bPeriode[ \t]*[:.]?[ \t]*([^\n]+)"
    ).unwrap();

    pub static ref BULAN: Regex = Regex::new(
        r"(?i)\bBulan[ \t]*[:.]?[ \t]*([^\n]+)"
    ).unwrap();

    pub static ref THN_BLN: Regex = Regex::new(
        r"(?i)\bThn\.?\s*Bln[ \t]*[:.]?[ \t]*([^\n]+)"
    ).unwrap();

    pub static ref REKENING_BULAN: Regex = Regex::new(
        r"(?i)\bRek[eo]ning\s+Bulan[ \t]*[:.]?[ \t]*([^\n]+)"
    ).unwrap();

    pub static ref PERIOD_NOISE: Regex = Regex::new(
        r"(?i)\b(?:Meter|Lalu|Kini|Stand|Total|Tagihan)\b.*$"
    ).unwrap();

    pub static ref FOUR_DIGITS: Regex = Regex::new(r"\d{4}").unwrap();

    pub static ref THREE_LETTERS: Regex = Regex::new(r"[A-Za-z]{3,}").unwrap();

    pub static ref MONTH_WORD_YEAR: Regex = Regex::new(
        r"(?i)\b(JANUARI|JAN|FEBRUARI|FEB|MARET|MAR|APRIL|APR|MEI|JUNI|JUN|JULI|JUL|AGUSTUS|AGU|AGS|SEPTEMBER|SEP|OKTOBER|OKT|NOVEMBER|NOV|DESEMBER|DES)[\s\-/.']*(\d{2,4})\b"
    ).unwrap();

    pub static ref MONTH_NUMERIC_YEAR: Regex = Regex::new(
        r"\b(0[1-9]|1[0-2])[/-](\d{4})\b"
    ).unwrap();

    pub static ref YEAR_MONTH_COMPACT: Regex = Regex::new(
        r"^(\d{4})(0[1-9]|1[0-2])$"
    ).unwrap();

    pub static ref MONTH_YEAR_ANCHORED: Regex = Regex::new(
        r"^(0[1-9]|1[0-2])[/-](\d{4})$"
    ).unwrap();

    pub static ref MONTH_WORD_YEAR_ANCHORED: Regex = Regex::new(
        r"(?i)^(JANUARI|JAN|FEBRUARI|FEB|MARET|MAR|APRIL|APR|MEI|JUNI|JUN|JULI|JUL|AGUSTUS|AGU|AGS|SEPTEMBER|SEP|OKTOBER|OKT|NOVEMBER|NOV|DESEMBER|DES)[\s\-/.']*(\d{2,4})$"
    ).unwrap();

    // Money formatting
    pub static ref TRAILING_CENTS: Regex = Regex::new(r"[.,]\d{2}$").unwrap();
}
