//! Sentence-boundary text chunker with overlap carry-over.
//!
//! Splits extracted document text into overlapping, token-bounded
//! segments suitable for independent embedding. Sentences are never
//! split: a chunk closes when adding the next sentence would exceed the
//! target size, and the next chunk starts with the trailing words of the
//! one just closed so adjacent chunks share context.
//!
//! Sizes are in estimated-token units from [`crate::token`].

use crate::models::Chunk;
use crate::token::estimate_tokens;

/// Default chunk size in estimated tokens.
pub const DEFAULT_TARGET_TOKENS: usize = 500;
/// Default overlap between adjacent chunks, in estimated tokens.
pub const DEFAULT_OVERLAP_TOKENS: usize = 50;

/// Split `text` into ordered chunks with contiguous indices from 0.
///
/// Whitespace runs are collapsed to single spaces first; empty or
/// whitespace-only input yields no chunks. A single sentence larger than
/// `target_tokens` is emitted as its own oversized chunk rather than
/// split mid-sentence, and the final buffer is emitted even when
/// undersized.
pub fn chunk_text(
    text: &str,
    page_number: i64,
    target_tokens: usize,
    overlap_tokens: usize,
) -> Vec<Chunk> {
    let clean = normalize_whitespace(text);
    if clean.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut chunk_index: i64 = 0;

    for sentence in split_sentences(&clean) {
        let exceeds = estimate_tokens(&current) + estimate_tokens(sentence) > target_tokens;

        if exceeds && !current.is_empty() {
            // Carry the tail words of the closed chunk into the next one.
            let carry = overlap_words(&current, overlap_tokens);

            chunks.push(Chunk {
                content: std::mem::take(&mut current),
                page_number,
                chunk_index,
            });
            chunk_index += 1;

            if carry.is_empty() {
                current.push_str(sentence);
            } else {
                current = format!("{} {}", carry, sentence);
            }
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(sentence);
        }
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            content: current,
            page_number,
            chunk_index,
        });
    }

    chunks
}

/// Collapse all whitespace runs to single spaces and trim the ends.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text into sentences.
///
/// A boundary follows any `.`, `!`, or `?` immediately followed by
/// whitespace; the delimiter stays attached to the preceding sentence.
/// Input must already be whitespace-normalized, so the only whitespace
/// byte is a plain space.
fn split_sentences(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') && bytes.get(i + 1) == Some(&b' ') {
            sentences.push(&text[start..=i]);
            start = i + 2;
            i += 2;
        } else {
            i += 1;
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

/// Trailing words of a closed chunk, carried into the next one.
///
/// Word count is ceil(overlap / 2); overlap granularity is words, not
/// tokens.
fn overlap_words(content: &str, overlap_tokens: usize) -> String {
    let carry = overlap_tokens.div_ceil(2);
    if carry == 0 {
        return String::new();
    }
    let words: Vec<&str> = content.split(' ').collect();
    let start = words.len().saturating_sub(carry);
    words[start..].join(" ")
}
