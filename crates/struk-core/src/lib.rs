//! Core library for Indonesian utility receipt OCR processing.
//!
//! This crate provides:
//! - Receipt data models (prepaid electricity token and payment/bill receipts)
//! - Rule-based field extraction with value sanitization and numeric heuristics
//! - An extraction orchestrator that tries an AI parser before the rules
//! - Capability traits for the OCR, AI and PDF rasterization collaborators
//! - Print layout helpers (token formatting, text layout, ESC/POS stream)

pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod ai;
pub mod receipt;
pub mod print;

pub use error::{AiError, OcrError, PdfError, Result, StrukError};
pub use models::config::StrukConfig;
pub use models::receipt::{PaymentReceipt, ReceiptMode, ReceiptRecord, TokenReceipt};
pub use ocr::{OcrEngine, OcrText};
pub use pdf::PdfRasterizer;
pub use ai::{AiInput, AiReceiptParser};
pub use print::{format_token, split_token, PrintHeader, ReceiptLayout};
pub use receipt::{
    DenominationCatalog, Document, ExtractionOutcome, ExtractionSource, ExtractionState,
    Orchestrator, PaymentExtractor, ReceiptExtractor, TokenExtractor,
};
