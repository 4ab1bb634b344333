//! Text chunking with configurable size and overlap.

/// Split text into overlapping chunks of at most `chunk_size` characters.
///
/// Sizes count `char`s, not bytes. When a window ends mid-text the cut is
/// moved back to the last whitespace in its second half, so words stay
/// whole where possible. Consecutive chunks share up to `overlap`
/// characters.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || chunk_size == 0 {
        return vec![];
    }

    let overlap = overlap.min(chunk_size.saturating_sub(1));
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + chunk_size).min(chars.len());

        if end < chars.len() {
            let floor = start + chunk_size / 2;
            if let Some(cut) = (floor..end).rev().find(|&i| chars[i].is_whitespace()) {
                end = cut + 1;
            }
        }

        let piece: String = chars[start..end].iter().collect();
        let piece = piece.trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }

        if end >= chars.len() {
            break;
        }

        // Always advance by at least one character.
        start = end.saturating_sub(overlap).max(start + 1);
    }

    tracing::debug!(
        "Chunked text into {} chunks (size: {}, overlap: {})",
        chunks.len(),
        chunk_size,
        overlap
    );

    chunks
}
