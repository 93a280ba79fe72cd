//! PDF rasterization collaborator interface.

use async_trait::async_trait;
use image::DynamicImage;

use crate::error::PdfError;

/// Trait for PDF renderers. Only the first page of a receipt PDF is ever used.
#[async_trait]
pub trait PdfRasterizer: Send + Sync {
    /// Render page 1 of `pdf` at `scale` times its natural size.
    async fn render_first_page(&self, pdf: &[u8], scale: f32) -> Result<DynamicImage, PdfError>;
}
