//! Receipt field extraction.
//!
//! Two rule-based extractors (token purchase and bill payment) built from
//! ordered matchers, plus the orchestrator that decides whether an AI parser
//! gets the first attempt.

mod orchestrator;
mod payment;
pub mod rules;
mod token;

pub use orchestrator::{
    Document, ExtractionOutcome, ExtractionSource, ExtractionState, Orchestrator,
    PDF_RENDER_SCALE,
};
pub use payment::{PaymentExtractor, PAYMENT_NAME_MARKERS};
pub use rules::DenominationCatalog;
pub use token::TokenExtractor;

use crate::models::receipt::{ReceiptMode, ReceiptRecord};

/// Trait for rule-based receipt extractors.
///
/// Extraction never fails: fields that cannot be found keep their defaults.
pub trait ReceiptExtractor {
    /// The receipt family this extractor handles.
    fn mode(&self) -> ReceiptMode;

    /// Extract a record from OCR text.
    fn extract(&self, text: &str) -> ReceiptRecord;
}
