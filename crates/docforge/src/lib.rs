//! # Docforge
//!
//! A PDF document ingestion pipeline for retrieval-augmented assistants.
//!
//! Docforge takes an uploaded PDF, extracts its text, splits it into
//! overlapping token-bounded chunks along sentence boundaries, embeds
//! each chunk via a remote embedding provider, and persists the result
//! in SQLite under a document record whose status (`processing` →
//! `ready`/`error`) is the sole completion signal for pollers.
//!
//! ## Data Flow
//!
//! 1. `docforge ingest` validates the upload, creates the document row
//!    in `processing` state, and submits an [`worker::IngestJob`].
//! 2. A background worker picks the job up and drives the
//!    [`docforge_core::pipeline::IngestPipeline`]: extraction
//!    ([`extract`]) → chunking → per-chunk embedding ([`embedding`]) →
//!    a single batch insert ([`sqlite_store`]).
//! 3. The pipeline flips the document to `ready` (with its page count)
//!    or `error` (with a message); the submitting command polls the
//!    document row until it leaves `processing`.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | SQLite connection pool |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite document/chunk stores |
//! | [`extract`] | PDF text extraction adapter |
//! | [`embedding`] | OpenAI/Ollama embedding providers |
//! | [`upload`] | Upload validation (extension, size limit) |
//! | [`worker`] | Background ingestion worker pool |

pub mod config;
pub mod db;
pub mod embedding;
pub mod extract;
pub mod migrate;
pub mod sqlite_store;
pub mod upload;
pub mod worker;
