//! Fixed-size character chunking.
//!
//! Text is cut into consecutive windows of `chunk_size` Unicode scalar values. Boundaries ignore
//! words and sentences, so a chunk may end mid-word; the summarizer sees each window on its own.
//! Windows never overlap and together reproduce the input exactly.

use super::types::ChunkingError;

/// Number of characters per chunk sent to the summarizer.
pub const CHUNK_SIZE: usize = 1024;

/// Split `text` into consecutive windows of at most `chunk_size` characters.
///
/// Returns an empty vector for empty input. Slices always fall on character boundaries, so
/// multi-byte text is never split inside a code point.
pub fn chunk_text(text: &str, chunk_size: usize) -> Result<Vec<&str>, ChunkingError> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }

    let mut chunks = Vec::with_capacity(expected_chunk_count(text.len(), chunk_size));
    let mut start = 0;
    let mut count = 0;
    for (offset, _) in text.char_indices() {
        if count == chunk_size {
            chunks.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }

    Ok(chunks)
}

/// `ceil(len / chunk_size)`; `chunk_size` must be non-zero.
pub fn expected_chunk_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size)
}
