//! Core data models used throughout Docforge.
//!
//! These types represent the documents and chunks that flow through the
//! ingestion pipeline and are persisted by the stores.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a document.
///
/// A document is `Processing` from creation until the pipeline finishes,
/// then becomes exactly one of `Ready` or `Error` and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    Ready,
    Error,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Ready => "ready",
            DocumentStatus::Error => "error",
        }
    }

    /// True once the document has left `processing`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DocumentStatus::Processing)
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(DocumentStatus::Processing),
            "ready" => Ok(DocumentStatus::Ready),
            "error" => Ok(DocumentStatus::Error),
            other => Err(anyhow::anyhow!("unknown document status: {}", other)),
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document record.
///
/// `page_count` is 0 until extraction completes; `error_message` is set
/// only when `status` is [`DocumentStatus::Error`]. Timestamps are unix
/// seconds.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub file_path: String,
    pub file_size: i64,
    pub page_count: i64,
    pub status: DocumentStatus,
    pub error_message: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields supplied when creating a document record.
///
/// The store assigns the id, timestamps, and the initial `processing`
/// status.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub owner_id: String,
    pub name: String,
    pub file_path: String,
    pub file_size: i64,
}

/// A chunk as produced by the chunker, before embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub content: String,
    pub page_number: i64,
    /// 0-based, contiguous within a document.
    pub chunk_index: i64,
}

/// A persisted chunk record: chunk text plus its embedding vector.
///
/// `owner_id` is denormalized from the document for access control.
/// Chunks are owned by their document and removed with it.
#[derive(Debug, Clone)]
pub struct ChunkRecord {
    pub document_id: String,
    pub owner_id: String,
    pub content: String,
    pub page_number: i64,
    pub chunk_index: i64,
    pub embedding: Vec<f32>,
}
