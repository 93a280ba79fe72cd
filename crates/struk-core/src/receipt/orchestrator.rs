//! Extraction orchestration: AI first for token receipts, rules otherwise.

use std::fmt;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ai::{AiInput, AiReceiptParser};
use crate::error::{Result, StrukError};
use crate::models::config::ExtractionConfig;
use crate::models::receipt::{ReceiptMode, ReceiptRecord};
use crate::ocr::OcrEngine;
use crate::pdf::PdfRasterizer;

use super::{DenominationCatalog, PaymentExtractor, ReceiptExtractor, TokenExtractor};

/// Scale factor PDF pages are rendered at before OCR.
pub const PDF_RENDER_SCALE: f32 = 2.0;

/// Steps of a single extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    AiAttempt,
    RuleFallback,
    Done,
}

/// Which path produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    Ai,
    Rules,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionSource::Ai => write!(f, "ai"),
            ExtractionSource::Rules => write!(f, "rules"),
        }
    }
}

/// Result of an extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub record: ReceiptRecord,
    pub source: ExtractionSource,
}

/// An input document.
#[derive(Debug, Clone)]
pub enum Document {
    /// Encoded image bytes (PNG, JPEG, ...).
    Image(Vec<u8>),
    /// PDF bytes; only the first page is used.
    Pdf(Vec<u8>),
}

impl Document {
    /// Classify raw bytes by their PDF magic number.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        if bytes.starts_with(b"%PDF") {
            Document::Pdf(bytes)
        } else {
            Document::Image(bytes)
        }
    }
}

/// Extraction orchestrator.
///
/// Token receipts go to the AI parser first when one is configured; any
/// error, empty answer or wrong-mode record falls through to the rules.
/// Payment receipts always use the rules. `extract` itself never fails.
pub struct Orchestrator {
    token: TokenExtractor,
    payment: PaymentExtractor,
    ai: Option<Box<dyn AiReceiptParser>>,
    use_vision: bool,
}

impl Orchestrator {
    /// Create an orchestrator with default rules and no AI parser.
    pub fn new() -> Self {
        Self {
            token: TokenExtractor::new(),
            payment: PaymentExtractor::new(),
            ai: None,
            use_vision: false,
        }
    }

    /// Create an orchestrator using the configured denomination catalog.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let mut orchestrator = Self::new();
        orchestrator.token = TokenExtractor::new().with_catalog(DenominationCatalog::from(config));
        orchestrator
    }

    /// Give token receipts to an AI parser first.
    pub fn with_ai(mut self, parser: Box<dyn AiReceiptParser>) -> Self {
        self.ai = Some(parser);
        self
    }

    /// Send the receipt image instead of the OCR text to the AI parser when
    /// an image is available.
    pub fn with_vision(mut self, use_vision: bool) -> Self {
        self.use_vision = use_vision;
        self
    }

    pub fn has_ai(&self) -> bool {
        self.ai.is_some()
    }

    /// Extract a record from OCR text.
    pub async fn extract(
        &self,
        text: &str,
        image: Option<&DynamicImage>,
        mode: ReceiptMode,
    ) -> ExtractionOutcome {
        let mut state = match mode {
            ReceiptMode::Token if self.ai.is_some() => ExtractionState::AiAttempt,
            _ => ExtractionState::RuleFallback,
        };
        let mut outcome = None;

        while state != ExtractionState::Done {
            debug!(?state, %mode, "extraction step");
            state = match state {
                ExtractionState::AiAttempt => match self.try_ai(text, image).await {
                    Some(record) => {
                        outcome = Some(ExtractionOutcome {
                            record,
                            source: ExtractionSource::Ai,
                        });
                        ExtractionState::Done
                    }
                    None => ExtractionState::RuleFallback,
                },
                ExtractionState::RuleFallback => {
                    outcome = Some(self.run_rules(text, mode));
                    ExtractionState::Done
                }
                ExtractionState::Done => ExtractionState::Done,
            };
        }

        match outcome {
            Some(outcome) => outcome,
            None => self.run_rules(text, mode),
        }
    }

    /// Rasterize or decode a document, run OCR, then extract.
    ///
    /// Rasterization and OCR failures are returned; extraction never fails.
    pub async fn process_document(
        &self,
        document: &Document,
        mode: ReceiptMode,
        ocr: &dyn OcrEngine,
        rasterizer: Option<&dyn PdfRasterizer>,
    ) -> Result<ExtractionOutcome> {
        let image = match document {
            Document::Image(bytes) => image::load_from_memory(bytes)?,
            Document::Pdf(bytes) => {
                let rasterizer = rasterizer
                    .ok_or_else(|| StrukError::Config("no PDF rasterizer configured".to_string()))?;
                rasterizer.render_first_page(bytes, PDF_RENDER_SCALE).await?
            }
        };

        let ocr_text = ocr.recognize(&image).await?;
        info!(
            chars = ocr_text.text.len(),
            confidence = ocr_text.confidence,
            language = ocr.language(),
            "OCR complete"
        );

        Ok(self.extract(&ocr_text.text, Some(&image), mode).await)
    }

    async fn try_ai(&self, text: &str, image: Option<&DynamicImage>) -> Option<ReceiptRecord> {
        let parser = self.ai.as_ref()?;
        let input = match image {
            Some(image) if self.use_vision => AiInput::Image(image),
            _ => AiInput::Text(text),
        };

        match parser.parse(input).await {
            Ok(Some(mut record)) if record.mode() == ReceiptMode::Token => {
                record.set_raw(text);
                info!(parser = parser.name(), "AI parser accepted");
                Some(record)
            }
            Ok(Some(record)) => {
                warn!(parser = parser.name(), mode = %record.mode(), "AI returned wrong receipt mode");
                None
            }
            Ok(None) => {
                info!(parser = parser.name(), "AI returned no record");
                None
            }
            Err(e) => {
                warn!(parser = parser.name(), error = %e, "AI parser failed, using rules");
                None
            }
        }
    }

    fn run_rules(&self, text: &str, mode: ReceiptMode) -> ExtractionOutcome {
        let record = match mode {
            ReceiptMode::Token => self.token.extract(text),
            ReceiptMode::Payment => self.payment.extract(text),
        };
        ExtractionOutcome {
            record,
            source: ExtractionSource::Rules,
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::parse_ai_response;
    use crate::error::{AiError, OcrError, PdfError};
    use crate::models::receipt::{PaymentReceipt, TokenReceipt};
    use crate::ocr::OcrText;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TOKEN_TEXT: &str = "STRUK PEMBELIAN LISTRIK PRABAYAR\n\
        IDPEL : 532110012345\n\
        NAMA : BUDI SANTOSO\n\
        TARIF/DAYA : R1/900 VA\n\
        NOMINAL : Rp 50.000\n\
        TOKEN : 1234 5678 9012 3456 7890\n";

    enum Reply {
        Record,
        Nothing,
        Transport,
        Timeout,
        Garbage,
        WrongMode,
    }

    struct FakeAi {
        reply: Reply,
        calls: Arc<AtomicUsize>,
        saw_image: Arc<AtomicUsize>,
    }

    impl FakeAi {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: Arc::new(AtomicUsize::new(0)),
                saw_image: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl AiReceiptParser for FakeAi {
        async fn parse(&self, input: AiInput<'_>) -> std::result::Result<Option<ReceiptRecord>, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let AiInput::Image(_) = input {
                self.saw_image.fetch_add(1, Ordering::SeqCst);
            }
            match self.reply {
                Reply::Record => Ok(Some(ReceiptRecord::Token(TokenReceipt {
                    token: "9999-8888-7777-6666-5555".to_string(),
                    nama: "DARI AI".to_string(),
                    raw: "ignored".to_string(),
                    ..Default::default()
                }))),
                Reply::Nothing => Ok(None),
                Reply::Transport => Err(AiError::Transport("connection refused".to_string())),
                Reply::Timeout => Err(AiError::Timeout),
                Reply::Garbage => parse_ai_response("<html>bad gateway</html>").map(Some),
                Reply::WrongMode => Ok(Some(ReceiptRecord::Payment(PaymentReceipt::default()))),
            }
        }
    }

    struct FakeOcr(std::result::Result<String, ()>);

    #[async_trait]
    impl OcrEngine for FakeOcr {
        async fn recognize(&self, _image: &DynamicImage) -> std::result::Result<OcrText, OcrError> {
            match &self.0 {
                Ok(text) => Ok(OcrText::new(text.clone(), 0.9)),
                Err(()) => Err(OcrError::Recognition("blank image".to_string())),
            }
        }
    }

    struct FakeRasterizer {
        scale: Arc<std::sync::Mutex<Option<f32>>>,
        fail: bool,
    }

    #[async_trait]
    impl PdfRasterizer for FakeRasterizer {
        async fn render_first_page(
            &self,
            _pdf: &[u8],
            scale: f32,
        ) -> std::result::Result<DynamicImage, PdfError> {
            *self.scale.lock().unwrap() = Some(scale);
            if self.fail {
                return Err(PdfError::NoPages);
            }
            Ok(DynamicImage::new_rgb8(4, 4))
        }
    }

    fn png_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::new_rgb8(4, 4)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn test_rules_without_ai() {
        let outcome = Orchestrator::new()
            .extract(TOKEN_TEXT, None, ReceiptMode::Token)
            .await;

        assert_eq!(outcome.source, ExtractionSource::Rules);
        let ReceiptRecord::Token(receipt) = outcome.record else {
            panic!("expected a token record");
        };
        assert_eq!(receipt.token, "12345678901234567890");
        assert_eq!(receipt.nominal, "50000");
        assert_eq!(receipt.raw, TOKEN_TEXT);
    }

    #[tokio::test]
    async fn test_ai_record_accepted() {
        let orchestrator = Orchestrator::new().with_ai(Box::new(FakeAi::new(Reply::Record)));
        let outcome = orchestrator.extract(TOKEN_TEXT, None, ReceiptMode::Token).await;

        assert_eq!(outcome.source, ExtractionSource::Ai);
        assert_eq!(outcome.record.nama(), "DARI AI");
        assert_eq!(outcome.record.raw(), TOKEN_TEXT);
    }

    #[tokio::test]
    async fn test_ai_failures_fall_back_to_rules() {
        for reply in [
            Reply::Nothing,
            Reply::Transport,
            Reply::Timeout,
            Reply::Garbage,
            Reply::WrongMode,
        ] {
            let orchestrator = Orchestrator::new().with_ai(Box::new(FakeAi::new(reply)));
            let outcome = orchestrator.extract(TOKEN_TEXT, None, ReceiptMode::Token).await;

            assert_eq!(outcome.source, ExtractionSource::Rules);
            assert_eq!(outcome.record.mode(), ReceiptMode::Token);
            assert_eq!(outcome.record.nama(), "BUDI SANTOSO");
        }
    }

    #[tokio::test]
    async fn test_payment_mode_skips_ai() {
        let ai = FakeAi::new(Reply::Record);
        let calls = Arc::clone(&ai.calls);
        let orchestrator = Orchestrator::new().with_ai(Box::new(ai));

        let outcome = orchestrator
            .extract("Total Bayar : Rp 10.000", None, ReceiptMode::Payment)
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.source, ExtractionSource::Rules);
        assert_eq!(outcome.record.mode(), ReceiptMode::Payment);
        assert_eq!(outcome.record.total(), "10000");
    }

    #[tokio::test]
    async fn test_vision_sends_image() {
        let ai = FakeAi::new(Reply::Record);
        let saw_image = Arc::clone(&ai.saw_image);
        let orchestrator = Orchestrator::new()
            .with_ai(Box::new(ai))
            .with_vision(true);
        let image = DynamicImage::new_rgb8(2, 2);

        orchestrator
            .extract(TOKEN_TEXT, Some(&image), ReceiptMode::Token)
            .await;
        orchestrator.extract(TOKEN_TEXT, None, ReceiptMode::Token).await;

        assert_eq!(saw_image.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_configured_catalog() {
        let config = ExtractionConfig {
            denominations: vec![25_000],
            snap_tolerance_percent: 10,
        };
        let outcome = Orchestrator::from_config(&config)
            .extract("Nominal : Rp 24.000", None, ReceiptMode::Token)
            .await;

        let ReceiptRecord::Token(receipt) = outcome.record else {
            panic!("expected a token record");
        };
        assert_eq!(receipt.nominal, "25000");
    }

    #[tokio::test]
    async fn test_process_image_document() {
        let ocr = FakeOcr(Ok(TOKEN_TEXT.to_string()));
        let outcome = Orchestrator::new()
            .process_document(&Document::Image(png_bytes()), ReceiptMode::Token, &ocr, None)
            .await
            .unwrap();

        assert_eq!(outcome.record.idpel(), "532110012345");
    }

    #[tokio::test]
    async fn test_process_pdf_renders_first_page() {
        let scale = Arc::new(std::sync::Mutex::new(None));
        let rasterizer = FakeRasterizer {
            scale: Arc::clone(&scale),
            fail: false,
        };
        let ocr = FakeOcr(Ok("Total Bayar : Rp 10.000".to_string()));
        let document = Document::from_bytes(b"%PDF-1.4 fake".to_vec());

        let outcome = Orchestrator::new()
            .process_document(&document, ReceiptMode::Payment, &ocr, Some(&rasterizer))
            .await
            .unwrap();

        assert_eq!(*scale.lock().unwrap(), Some(PDF_RENDER_SCALE));
        assert_eq!(outcome.record.total(), "10000");
    }

    #[tokio::test]
    async fn test_collaborator_errors_propagate() {
        let orchestrator = Orchestrator::new();

        let ocr = FakeOcr(Err(()));
        let result = orchestrator
            .process_document(&Document::Image(png_bytes()), ReceiptMode::Token, &ocr, None)
            .await;
        assert!(matches!(result, Err(StrukError::Ocr(_))));

        let rasterizer = FakeRasterizer {
            scale: Arc::new(std::sync::Mutex::new(None)),
            fail: true,
        };
        let ocr = FakeOcr(Ok(String::new()));
        let result = orchestrator
            .process_document(&Document::Pdf(b"%PDF".to_vec()), ReceiptMode::Token, &ocr, Some(&rasterizer))
            .await;
        assert!(matches!(result, Err(StrukError::Pdf(PdfError::NoPages))));

        let result = orchestrator
            .process_document(&Document::Pdf(b"%PDF".to_vec()), ReceiptMode::Token, &ocr, None)
            .await;
        assert!(matches!(result, Err(StrukError::Config(_))));

        let result = orchestrator
            .process_document(&Document::Image(b"not an image".to_vec()), ReceiptMode::Token, &ocr, None)
            .await;
        assert!(matches!(result, Err(StrukError::Image(_))));
    }
}
