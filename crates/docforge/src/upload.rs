//! Upload validation.
//!
//! Applied before a document record is created, so rejected files never
//! leave a `processing` row behind.

use std::path::Path;

use anyhow::{bail, Result};

use crate::config::IngestConfig;

/// Reject files that should never reach the pipeline: anything without a
/// `.pdf` extension (case-insensitive) and anything over the configured
/// size limit.
pub fn validate_upload(file: &Path, size: u64, config: &IngestConfig) -> Result<()> {
    let is_pdf = file
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !is_pdf {
        bail!("only PDF files are supported: {}", file.display());
    }

    if size > config.max_file_size_bytes {
        bail!(
            "file too large: {} bytes (maximum is {} bytes)",
            size,
            config.max_file_size_bytes
        );
    }

    Ok(())
}
