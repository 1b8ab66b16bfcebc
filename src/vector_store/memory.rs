//! In-memory vector store implementation.
//!
//! Used by tests; the real index lives in SQLite.

use super::{cosine_similarity, IndexedChunk, IndexedFile, ScoredChunk, VectorStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector store.
#[derive(Default)]
pub struct MemoryVectorStore {
    chunks: RwLock<Vec<IndexedChunk>>,
}

impl MemoryVectorStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, chunks: &[IndexedChunk]) -> Result<usize> {
        let mut store = self.chunks.write().unwrap();
        store.extend(chunks.iter().cloned());
        Ok(chunks.len())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredChunk>> {
        let chunks = self.chunks.read().unwrap();

        let mut results: Vec<ScoredChunk> = chunks
            .iter()
            .map(|chunk| ScoredChunk {
                score: cosine_similarity(query_embedding, &chunk.embedding),
                chunk: chunk.clone(),
            })
            .filter(|r| r.score >= min_score)
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    async fn list_files(&self) -> Result<Vec<IndexedFile>> {
        let chunks = self.chunks.read().unwrap();

        let mut file_map: HashMap<String, IndexedFile> = HashMap::new();
        for chunk in chunks.iter() {
            let entry = file_map
                .entry(chunk.file_name.clone())
                .or_insert_with(|| IndexedFile {
                    file_name: chunk.file_name.clone(),
                    chunk_count: 0,
                    indexed_at: chunk.indexed_at,
                });
            entry.chunk_count += 1;
            if chunk.indexed_at > entry.indexed_at {
                entry.indexed_at = chunk.indexed_at;
            }
        }

        let mut files: Vec<IndexedFile> = file_map.into_values().collect();
        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(files)
    }

    async fn chunk_count(&self) -> Result<usize> {
        Ok(self.chunks.read().unwrap().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_search_orders_by_score() {
        let store = MemoryVectorStore::new();

        let chunks = vec![
            IndexedChunk::new("ep1.txt".into(), "Hello world".into(), 0, vec![1.0, 0.0, 0.0]),
            IndexedChunk::new("ep1.txt".into(), "Goodbye world".into(), 1, vec![0.0, 1.0, 0.0]),
        ];
        store.upsert_batch(&chunks).await.unwrap();

        assert_eq!(store.chunk_count().await.unwrap(), 2);

        let results = store.search(&[1.0, 0.0, 0.0], 10, 0.0).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].chunk.content, "Hello world");

        let files = store.list_files().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].chunk_count, 2);
    }

    #[tokio::test]
    async fn test_search_respects_limit_and_threshold() {
        let store = MemoryVectorStore::new();

        let chunks: Vec<IndexedChunk> = (0..5)
            .map(|i| {
                IndexedChunk::new(
                    "ep1.txt".into(),
                    format!("chunk {}", i),
                    i,
                    vec![1.0, i as f32 / 10.0, 0.0],
                )
            })
            .collect();
        store.upsert_batch(&chunks).await.unwrap();

        let results = store.search(&[1.0, 0.0, 0.0], 3, 0.0).await.unwrap();
        assert_eq!(results.len(), 3);

        let results = store.search(&[0.0, 1.0, 0.0], 10, 0.9).await.unwrap();
        assert!(results.is_empty());
    }
}
