//! Storage abstraction for Docforge.
//!
//! Two collaborator contracts back the pipeline: [`DocumentStore`] holds
//! document records and their lifecycle status, [`ChunkStore`] holds the
//! embedded chunk batches. Implementations must be `Send + Sync`; the
//! in-memory implementation in [`memory`] backs the test suites, the
//! SQLite implementation lives in the application crate.
//!
//! The document status row is the only channel through which a pipeline
//! run's completion becomes visible: pollers call
//! [`DocumentStore::get_document`] until the status leaves `processing`.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ChunkRecord, Document, NewDocument};

/// Document records and their lifecycle status.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`create_document`](DocumentStore::create_document) | Create a record in `processing` state |
/// | [`get_document`](DocumentStore::get_document) | Fetch one record (the polling read) |
/// | [`list_documents`](DocumentStore::list_documents) | List an owner's documents, newest first |
/// | [`mark_ready`](DocumentStore::mark_ready) | `processing → ready`, recording the page count |
/// | [`mark_error`](DocumentStore::mark_error) | `processing → error`, recording a message |
/// | [`rename_document`](DocumentStore::rename_document) | Update the display name |
/// | [`delete_document`](DocumentStore::delete_document) | Remove the record (chunks cascade) |
///
/// `mark_ready` and `mark_error` only apply to documents still in
/// `processing`; a record already in a terminal state is left untouched.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document record in `processing` state. Returns its id.
    async fn create_document(&self, doc: &NewDocument) -> Result<String>;

    /// Fetch a document by id.
    async fn get_document(&self, id: &str) -> Result<Option<Document>>;

    /// List all documents for an owner, newest first.
    async fn list_documents(&self, owner_id: &str) -> Result<Vec<Document>>;

    /// Transition `processing → ready`, recording the extracted page count.
    async fn mark_ready(&self, id: &str, page_count: i64) -> Result<()>;

    /// Transition `processing → error` with a human-readable message.
    async fn mark_error(&self, id: &str, message: &str) -> Result<()>;

    /// Update the display name.
    async fn rename_document(&self, id: &str, name: &str) -> Result<()>;

    /// Delete the document and cascade its chunks.
    async fn delete_document(&self, id: &str) -> Result<()>;
}

/// Embedded chunk batches, keyed by owning document.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Insert all records in a single atomic batch: either every record
    /// is persisted or none are.
    async fn insert_chunks(&self, records: &[ChunkRecord]) -> Result<()>;

    /// Remove all chunks for a document.
    async fn delete_by_document(&self, document_id: &str) -> Result<()>;

    /// Fetch a document's chunks ordered by chunk index.
    async fn chunks_for_document(&self, document_id: &str) -> Result<Vec<ChunkRecord>>;
}
