//! Text extraction collaborator boundary.
//!
//! The pipeline consumes extraction as a capability: raw document bytes
//! in, full plain text plus page count out. Concrete extractors (PDF via
//! pdf-extract) live in the application crate.

use async_trait::async_trait;
use thiserror::Error;

/// Full plain text and page count extracted from a raw document.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: i64,
}

/// Extraction failure. Always fatal for the ingestion run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("text extraction failed: {0}")]
    Failed(String),
}

/// Extracts plain text from raw document bytes.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractError>;
}
