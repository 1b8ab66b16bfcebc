//! Retrieval-augmented question answering.
//!
//! Retrieves the top-scoring transcript chunks for a question and feeds them
//! to a streamed chat completion.

mod engine;

pub use engine::{QueryEngine, QueryResponse};

use crate::vector_store::ScoredChunk;
use serde::{Deserialize, Serialize};

/// A retrieved source as shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSnippet {
    /// Originating transcript file name.
    pub file: String,
    /// Similarity score (higher is better).
    pub score: f32,
    /// The retrieved text span.
    pub text: String,
}

impl From<ScoredChunk> for SourceSnippet {
    fn from(result: ScoredChunk) -> Self {
        let file = if result.chunk.file_name.is_empty() {
            "N/A".to_string()
        } else {
            result.chunk.file_name
        };
        Self {
            file,
            score: result.score,
            text: result.chunk.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::IndexedChunk;

    #[test]
    fn test_snippet_carries_file_and_score() {
        let scored = ScoredChunk {
            chunk: IndexedChunk::new("ep1.txt".into(), "Topic: AI safety.".into(), 0, vec![]),
            score: 0.92,
        };
        let snippet = SourceSnippet::from(scored);
        assert_eq!(snippet.file, "ep1.txt");
        assert_eq!(snippet.text, "Topic: AI safety.");
        assert!((snippet.score - 0.92).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_file_name_falls_back_to_placeholder() {
        let scored = ScoredChunk {
            chunk: IndexedChunk::new(String::new(), "orphan text".into(), 0, vec![]),
            score: 0.5,
        };
        let snippet = SourceSnippet::from(scored);
        assert_eq!(snippet.file, "N/A");
    }
}
