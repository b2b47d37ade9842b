//! Ingestion pipeline orchestration.
//!
//! Coordinates the full flow for one document: extraction → chunking →
//! per-chunk embedding → single batch persist → status transition.
//! Extraction and batch-persist failures are fatal and mark the document
//! `error`; an embedding failure is isolated to its chunk, which is
//! dropped while the run continues.
//!
//! The pipeline holds no per-document state and performs no locking:
//! each run is the sole writer to its document's rows, and runs for
//! different documents may proceed fully concurrently.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::chunk::chunk_text;
use crate::embed::Embedder;
use crate::extract::TextExtractor;
use crate::models::ChunkRecord;
use crate::store::{ChunkStore, DocumentStore};

/// Chunking parameters for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub target_tokens: usize,
    pub overlap_tokens: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_tokens: crate::chunk::DEFAULT_TARGET_TOKENS,
            overlap_tokens: crate::chunk::DEFAULT_OVERLAP_TOKENS,
        }
    }
}

/// What a successful run did, per chunk.
#[derive(Debug, Default)]
pub struct IngestSummary {
    pub page_count: i64,
    /// Chunks produced by the chunker.
    pub chunks_total: usize,
    /// Chunks whose embedding succeeded and were persisted.
    pub chunks_embedded: usize,
    /// Chunks dropped because their embedding call failed.
    pub failures: Vec<ChunkFailure>,
}

/// A chunk dropped from the run because its embedding call failed.
#[derive(Debug)]
pub struct ChunkFailure {
    pub chunk_index: i64,
    pub error: String,
}

/// Drives ingestion for one document at a time.
///
/// Collaborators are injected at construction; the pipeline itself is
/// cheap to share behind an `Arc` across worker tasks.
pub struct IngestPipeline {
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn Embedder>,
    documents: Arc<dyn DocumentStore>,
    chunks: Arc<dyn ChunkStore>,
    config: PipelineConfig,
}

impl IngestPipeline {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn Embedder>,
        documents: Arc<dyn DocumentStore>,
        chunks: Arc<dyn ChunkStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extractor,
            embedder,
            documents,
            chunks,
            config,
        }
    }

    /// Run the full ingestion flow for one document.
    ///
    /// The outcome is recorded on the document record (`ready` with a
    /// page count, or `error` with a message) and is observable only
    /// through the document store. Every failure path ends in a status
    /// transition; a document is never left in `processing` by a
    /// completed run.
    pub async fn run(&self, document_id: &str, owner_id: &str, bytes: &[u8]) {
        match self.process(document_id, owner_id, bytes).await {
            Ok(summary) => {
                if let Err(e) = self
                    .documents
                    .mark_ready(document_id, summary.page_count)
                    .await
                {
                    error!(document_id, error = %e, "failed to mark document ready");
                    return;
                }
                info!(
                    document_id,
                    pages = summary.page_count,
                    chunks = summary.chunks_embedded,
                    dropped = summary.failures.len(),
                    "document ready"
                );
            }
            Err(e) => {
                warn!(document_id, error = %e, "ingestion failed");
                if let Err(mark_err) = self.documents.mark_error(document_id, &format!("{e:#}")).await
                {
                    error!(document_id, error = %mark_err, "failed to mark document errored");
                }
            }
        }
    }

    /// The fallible body of a run. An `Err` here is fatal: no chunks are
    /// left behind and the caller marks the document `error`.
    async fn process(
        &self,
        document_id: &str,
        owner_id: &str,
        bytes: &[u8],
    ) -> Result<IngestSummary> {
        let extracted = self
            .extractor
            .extract(bytes)
            .await
            .context("text extraction failed")?;
        debug!(
            document_id,
            pages = extracted.page_count,
            chars = extracted.text.len(),
            "extracted text"
        );

        // Pages are concatenated upstream; the whole document is chunked
        // as page 1.
        let chunks = chunk_text(
            &extracted.text,
            1,
            self.config.target_tokens,
            self.config.overlap_tokens,
        );

        let mut summary = IngestSummary {
            page_count: extracted.page_count,
            chunks_total: chunks.len(),
            ..Default::default()
        };

        let mut records = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            match self.embedder.embed(&chunk.content).await {
                Ok(embedding) => records.push(ChunkRecord {
                    document_id: document_id.to_string(),
                    owner_id: owner_id.to_string(),
                    content: chunk.content,
                    page_number: chunk.page_number,
                    chunk_index: chunk.chunk_index,
                    embedding,
                }),
                Err(e) => {
                    warn!(
                        document_id,
                        chunk_index = chunk.chunk_index,
                        error = %e,
                        "embedding failed, dropping chunk"
                    );
                    summary.failures.push(ChunkFailure {
                        chunk_index: chunk.chunk_index,
                        error: e.to_string(),
                    });
                }
            }
        }
        summary.chunks_embedded = records.len();

        if !records.is_empty() {
            self.chunks
                .insert_chunks(&records)
                .await
                .context("failed to persist chunks")?;
        } else if summary.chunks_total > 0 {
            // Extraction succeeded, so the run still counts as a success.
            warn!(document_id, "no chunk embeddings succeeded, document will have zero chunks");
        }

        Ok(summary)
    }
}
