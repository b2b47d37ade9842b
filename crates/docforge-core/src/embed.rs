//! Embedding collaborator boundary and vector helpers.
//!
//! Defines the [`Embedder`] trait the pipeline calls once per chunk, plus
//! pure helpers for encoding vectors as BLOBs for storage backends.
//! Concrete providers (OpenAI, Ollama) live in the application crate.

use async_trait::async_trait;
use thiserror::Error;

/// Embedding failure for a single text.
///
/// Non-fatal at the pipeline level: the offending chunk is dropped and
/// the run continues.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("embedding request failed: {0}")]
    Request(String),
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
}

/// Produces a fixed-length vector for a chunk of text.
///
/// Implementations must be `Send + Sync`; the pipeline holds them behind
/// an `Arc` and may call `embed` from multiple concurrent document runs.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model identifier (e.g. `"text-embedding-3-small"`).
    fn model_name(&self) -> &str;
    /// Vector dimensionality (e.g. `1536`).
    fn dims(&self) -> usize;
    /// Embed one chunk's text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Encode a float vector as a BLOB (little-endian f32 bytes).
///
/// Each `f32` becomes 4 bytes in little-endian order, so the BLOB is
/// `vec.len() × 4` bytes.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode a BLOB produced by [`vec_to_blob`] back into a float vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_roundtrip() {
        let vec = vec![1.0f32, -2.5, 3.125, 0.0, -0.001];
        let blob = vec_to_blob(&vec);
        assert_eq!(blob.len(), vec.len() * 4);
        assert_eq!(blob_to_vec(&blob), vec);
    }

    #[test]
    fn empty_blob_is_empty_vec() {
        assert!(blob_to_vec(&[]).is_empty());
    }
}
