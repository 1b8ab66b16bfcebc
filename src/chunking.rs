//! Splitting transcripts into retrieval units.
//!
//! Transcripts are split on paragraph boundaries (blank lines) and packed
//! into chunks up to a target size. Character-based packing is crude compared
//! to token-aware splitting but keeps chunks comfortably inside embedding
//! input limits for transcript-sized text.

/// Target chunk size in characters.
pub const DEFAULT_CHUNK_CHARS: usize = 2000;

/// Split transcript text into chunks of at most `max_chars` characters.
///
/// Paragraphs are never split unless a single paragraph exceeds `max_chars`,
/// in which case it is divided on char boundaries. Whitespace-only input
/// yields no chunks.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if paragraph.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(split_oversized(paragraph, max_chars));
            continue;
        }

        // +2 for the paragraph separator we re-insert.
        if !current.is_empty() && current.len() + paragraph.len() + 2 > max_chars {
            chunks.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Divide a single oversized paragraph on char boundaries.
fn split_oversized(paragraph: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = paragraph.chars().collect();
    chars
        .chunks(max_chars)
        .map(|c| c.iter().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = split_text("Topic: AI safety.", 2000);
        assert_eq!(chunks, vec!["Topic: AI safety.".to_string()]);
    }

    #[test]
    fn test_whitespace_yields_no_chunks() {
        assert!(split_text("  \n\n   \n", 2000).is_empty());
        assert!(split_text("", 2000).is_empty());
    }

    #[test]
    fn test_paragraphs_pack_up_to_limit() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        let chunks = split_text(text, 11);
        // "aaaa\n\nbbbb" is 10 chars, "cccc" spills over.
        assert_eq!(chunks, vec!["aaaa\n\nbbbb".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn test_oversized_paragraph_is_divided() {
        let text = "x".repeat(4500);
        let chunks = split_text(&text, 2000);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() <= 2000));
        let total: usize = chunks.iter().map(|c| c.len()).sum();
        assert_eq!(total, 4500);
    }

    #[test]
    fn test_multibyte_input_splits_on_char_boundaries() {
        let text = "é".repeat(3000);
        let chunks = split_text(&text, 2000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 2000);
    }
}
