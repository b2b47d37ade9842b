//! PDF text extraction adapter.
//!
//! Implements the core [`TextExtractor`] trait over pdf-extract, with
//! lopdf supplying the page count. Parsing is CPU-bound, so it runs on
//! the blocking thread pool.

use async_trait::async_trait;

use docforge_core::extract::{ExtractError, ExtractedText, TextExtractor};

/// Extracts plain text and page count from PDF bytes.
pub struct PdfExtractor;

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
        let bytes = bytes.to_vec();

        tokio::task::spawn_blocking(move || {
            let document = lopdf::Document::load_mem(&bytes)
                .map_err(|e| ExtractError::Malformed(e.to_string()))?;
            let page_count = document.get_pages().len() as i64;

            let text = pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|e| ExtractError::Failed(e.to_string()))?;

            Ok(ExtractedText {
                text: text.trim().to_string(),
                page_count,
            })
        })
        .await
        .map_err(|e| ExtractError::Failed(format!("extraction task panicked: {}", e)))?
    }
}
