//! Approximate token counting.
//!
//! Chunk-boundary decisions are made in estimated-token units rather than
//! characters. The estimate is a fixed chars-per-token ratio, not a real
//! tokenizer; it only needs to be a stable comparative cost signal.

/// Approximate chars-per-token ratio.
const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of `text` as ceil(chars / 4).
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}
