//! SQLite-based vector store implementation.
//!
//! Similarity is a full scan with cosine similarity computed in Rust. That is
//! plenty for a personal transcript library; a dataset large enough to hurt
//! here should move to sqlite-vec or a dedicated vector database.

use super::{cosine_similarity, IndexedChunk, IndexedFile, ScoredChunk, VectorStore};
use crate::error::{PodqError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    file_name TEXT NOT NULL,
    content TEXT NOT NULL,
    chunk_order INTEGER NOT NULL,
    embedding BLOB NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chunks_file_name ON chunks(file_name);
"#;

/// SQLite-backed vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) a store at the given path.
    #[instrument(skip_all)]
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Opened SQLite vector store at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| PodqError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize an embedding to little-endian bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize an embedding from little-endian bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn row_to_chunk(row: &rusqlite::Row<'_>) -> rusqlite::Result<IndexedChunk> {
        let id_str: String = row.get(0)?;
        let embedding_bytes: Vec<u8> = row.get(4)?;
        let indexed_at_str: String = row.get(5)?;

        Ok(IndexedChunk {
            id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
            file_name: row.get(1)?,
            content: row.get(2)?,
            chunk_order: row.get(3)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, chunks))]
    async fn upsert_batch(&self, chunks: &[IndexedChunk]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        for chunk in chunks {
            let embedding_bytes = Self::embedding_to_bytes(&chunk.embedding);
            tx.execute(
                r#"
                INSERT OR REPLACE INTO chunks
                (id, file_name, content, chunk_order, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    chunk.id.to_string(),
                    chunk.file_name,
                    chunk.content,
                    chunk.chunk_order,
                    embedding_bytes,
                    chunk.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} chunks", chunks.len());
        Ok(chunks.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredChunk>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, file_name, content, chunk_order, embedding, indexed_at FROM chunks",
        )?;

        let chunks = stmt.query_map([], Self::row_to_chunk)?;

        let mut results: Vec<ScoredChunk> = chunks
            .filter_map(|c| c.ok())
            .map(|chunk| ScoredChunk {
                score: cosine_similarity(query_embedding, &chunk.embedding),
                chunk,
            })
            .filter(|r| r.score >= min_score)
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        debug!("Found {} matching chunks", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn list_files(&self) -> Result<Vec<IndexedFile>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT file_name, COUNT(*) as chunk_count, MAX(indexed_at) as indexed_at
            FROM chunks
            GROUP BY file_name
            ORDER BY file_name
            "#,
        )?;

        let files = stmt.query_map([], |row| {
            let indexed_at_str: String = row.get(2)?;
            Ok(IndexedFile {
                file_name: row.get(0)?,
                chunk_count: row.get(1)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        Ok(files.filter_map(|f| f.ok()).collect())
    }

    async fn chunk_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_store_roundtrip() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let chunk = IndexedChunk::new(
            "ep1.txt".to_string(),
            "This is test content".to_string(),
            0,
            vec![1.0, 0.0, 0.0],
        );
        store.upsert_batch(&[chunk]).await.unwrap();

        let files = store.list_files().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "ep1.txt");
        assert_eq!(files[0].chunk_count, 1);

        let results = store.search(&[1.0, 0.0, 0.0], 10, 0.0).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);
        assert_eq!(results[0].chunk.content, "This is test content");
    }

    #[tokio::test]
    async fn test_embedding_survives_blob_roundtrip() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let embedding = vec![0.25, -1.5, 3.75, 0.0];
        let chunk = IndexedChunk::new("ep1.txt".into(), "x".into(), 0, embedding.clone());
        store.upsert_batch(&[chunk]).await.unwrap();

        let results = store.search(&embedding, 1, 0.0).await.unwrap();
        assert_eq!(results[0].chunk.embedding, embedding);
    }

    #[tokio::test]
    async fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage").join("index.db");

        let store = SqliteVectorStore::open(&path).unwrap();
        assert_eq!(store.chunk_count().await.unwrap(), 0);
        assert!(path.exists());
    }
}
