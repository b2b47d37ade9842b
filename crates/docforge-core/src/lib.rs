//! # Docforge Core
//!
//! Runtime-agnostic logic for the Docforge document ingestion pipeline:
//! data models, token estimation, the sentence-boundary chunker,
//! collaborator traits (text extraction, embedding, storage), and the
//! ingestion orchestrator.
//!
//! This crate contains no tokio, sqlx, HTTP, or filesystem I/O. All
//! external effects go through the traits in [`extract`], [`embed`], and
//! [`store`]; the application crate supplies concrete adapters.
//!
//! ## Pipeline shape
//!
//! ```text
//! bytes ──▶ TextExtractor ──▶ chunk_text ──▶ Embedder (per chunk)
//!                                                  │
//!                       DocumentStore ◀── status ──┤
//!                                                  ▼
//!                                      ChunkStore (single batch)
//! ```
//!
//! A document is created in `processing` state before the pipeline runs
//! and transitions exactly once, to `ready` or `error`. The document
//! store is the only channel through which completion becomes visible.

pub mod chunk;
pub mod embed;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod token;
