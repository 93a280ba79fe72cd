//! OCR collaborator interface.
//!
//! Recognition itself happens outside this crate; the orchestrator only needs
//! something that turns a receipt image into text.

use async_trait::async_trait;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Language receipts are recognized in.
pub const DEFAULT_LANGUAGE: &str = "ind";

/// Text recognized from one image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrText {
    /// Full text, lines separated by newlines.
    pub text: String,

    /// Mean recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl OcrText {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Trait for OCR engines.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize the text of a receipt image.
    async fn recognize(&self, image: &DynamicImage) -> Result<OcrText, OcrError>;

    /// Recognition language code.
    fn language(&self) -> &str {
        DEFAULT_LANGUAGE
    }
}
