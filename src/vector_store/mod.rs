//! Persisted vector index for transcript chunks.
//!
//! Provides a trait-based interface so the indexer and query engine can run
//! against either the SQLite-backed store or an in-memory one in tests.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An embedded transcript chunk stored in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    /// Unique chunk ID.
    pub id: Uuid,
    /// Name of the transcript file this chunk came from.
    pub file_name: String,
    /// Text content of this chunk.
    pub content: String,
    /// Position of this chunk within its file.
    pub chunk_order: i32,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this chunk was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl IndexedChunk {
    /// Create a new chunk with a fresh ID and current timestamp.
    pub fn new(file_name: String, content: String, chunk_order: i32, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name,
            content,
            chunk_order,
            embedding,
            indexed_at: Utc::now(),
        }
    }
}

/// A search result with its similarity score (higher is better).
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: IndexedChunk,
    pub score: f32,
}

/// Summary of one indexed transcript file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedFile {
    pub file_name: String,
    pub chunk_count: u32,
    pub indexed_at: DateTime<Utc>,
}

/// Trait for vector index backends.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk insert chunks.
    async fn upsert_batch(&self, chunks: &[IndexedChunk]) -> Result<usize>;

    /// Return up to `limit` chunks most similar to the query embedding,
    /// best first, dropping anything below `min_score`.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredChunk>>;

    /// List indexed files with their chunk counts.
    async fn list_files(&self) -> Result<Vec<IndexedFile>>;

    /// Total number of indexed chunks.
    async fn chunk_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_chunk_ids_are_unique() {
        let a = IndexedChunk::new("ep1.txt".into(), "one".into(), 0, vec![]);
        let b = IndexedChunk::new("ep1.txt".into(), "two".into(), 1, vec![]);
        assert_ne!(a.id, b.id);
    }
}
