//! Error types for the struk-core library.

use thiserror::Error;

/// Main error type for the struk library.
#[derive(Error, Debug)]
pub enum StrukError {
    /// PDF rasterization error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR collaborator error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// AI collaborator error.
    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors reported by a PDF rasterizer.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to render the page into an image.
    #[error("failed to render page: {0}")]
    Render(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors reported by an OCR engine.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The engine could not be reached or initialized.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors reported by an AI receipt parser.
///
/// The orchestrator never surfaces these; any of them sends extraction down
/// the rule-based path.
#[derive(Error, Debug)]
pub enum AiError {
    /// Network or connection failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The request did not finish in time.
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response was not parseable JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response parsed but does not have the expected shape.
    #[error("schema mismatch: {0}")]
    Schema(String),
}

/// Result type for the struk library.
pub type Result<T> = std::result::Result<T, StrukError>;
