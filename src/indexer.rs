//! Index build and rebuild.
//!
//! Two entry points with intentionally different behavior:
//!
//! - [`build_index`] is non-destructive: an existing persisted index is left
//!   untouched (and costs no embedding calls).
//! - [`rebuild_index`] is what the `podq index` command runs: it deletes any
//!   existing index first, because an index built with a different embedding
//!   model (or dimensionality) is unusable and must not be mixed with new
//!   vectors.

use crate::chunking::{split_text, DEFAULT_CHUNK_CHARS};
use crate::config::Settings;
use crate::documents::load_documents;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{IndexedChunk, SqliteVectorStore, VectorStore};
use std::sync::Arc;
use tracing::{info, instrument};

/// Result of an index build.
#[derive(Debug)]
pub struct BuildOutcome {
    /// True when an existing index was found and nothing was done.
    pub skipped: bool,
    /// Number of transcript files indexed.
    pub files_indexed: usize,
    /// Number of chunks embedded and persisted.
    pub chunks_indexed: usize,
}

/// Check whether a persisted index exists for these settings.
pub fn index_exists(settings: &Settings) -> bool {
    settings.index_path().is_file()
}

/// Build the persisted index from the data directory.
///
/// No-op if an index already exists at the storage directory; use
/// [`rebuild_index`] to replace one. Loader errors (missing or empty data
/// directory) propagate to the caller.
#[instrument(skip(settings, embedder))]
pub async fn build_index(settings: &Settings, embedder: Arc<dyn Embedder>) -> Result<BuildOutcome> {
    if index_exists(settings) {
        info!(
            "Index already exists at {}, nothing to do",
            settings.storage_dir().display()
        );
        return Ok(BuildOutcome {
            skipped: true,
            files_indexed: 0,
            chunks_indexed: 0,
        });
    }

    let documents = load_documents(&settings.data_dir())?;
    let files_indexed = documents.len();

    // Chunk every document, remembering which file each chunk came from.
    let mut texts = Vec::new();
    let mut origins = Vec::new();
    for doc in &documents {
        for (order, chunk) in split_text(&doc.text, DEFAULT_CHUNK_CHARS).into_iter().enumerate() {
            origins.push((doc.file_name.clone(), order as i32));
            texts.push(chunk);
        }
    }

    info!("Embedding {} chunks from {} files", texts.len(), files_indexed);
    let embeddings = embedder.embed_batch(&texts).await?;

    let chunks: Vec<IndexedChunk> = origins
        .into_iter()
        .zip(texts)
        .zip(embeddings)
        .map(|(((file_name, order), content), embedding)| {
            IndexedChunk::new(file_name, content, order, embedding)
        })
        .collect();

    let store = SqliteVectorStore::open(&settings.index_path())?;
    let chunks_indexed = store.upsert_batch(&chunks).await?;

    info!(
        "Index built: {} chunks from {} files persisted to {}",
        chunks_indexed,
        files_indexed,
        settings.storage_dir().display()
    );

    Ok(BuildOutcome {
        skipped: false,
        files_indexed,
        chunks_indexed,
    })
}

/// Delete any existing index, then build a fresh one.
#[instrument(skip(settings, embedder))]
pub async fn rebuild_index(
    settings: &Settings,
    embedder: Arc<dyn Embedder>,
) -> Result<BuildOutcome> {
    let storage_dir = settings.storage_dir();
    if storage_dir.exists() {
        info!(
            "Deleting existing index at {} before rebuild",
            storage_dir.display()
        );
        std::fs::remove_dir_all(&storage_dir)?;
    }

    build_index(settings, embedder).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result as PodqResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic embedder that counts how many texts it embeds.
    struct StubEmbedder {
        calls: AtomicUsize,
    }

    impl StubEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn texts_embedded(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> PodqResult<Vec<f32>> {
            let batch = self.embed_batch(&[text.to_string()]).await?;
            Ok(batch.into_iter().next().unwrap())
        }

        async fn embed_batch(&self, texts: &[String]) -> PodqResult<Vec<Vec<f32>>> {
            self.calls.fetch_add(texts.len(), Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| vec![t.len() as f32, 1.0, 0.0])
                .collect())
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn test_settings(root: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        settings.general.data_dir = root.join("data").display().to_string();
        settings.general.storage_dir = root.join("storage").display().to_string();
        settings
    }

    #[tokio::test]
    async fn test_build_index_persists_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        std::fs::create_dir_all(settings.data_dir()).unwrap();
        std::fs::write(settings.data_dir().join("ep1.txt"), "Topic: AI safety.").unwrap();

        let embedder = Arc::new(StubEmbedder::new());
        let outcome = build_index(&settings, embedder.clone()).await.unwrap();

        assert!(!outcome.skipped);
        assert_eq!(outcome.files_indexed, 1);
        assert_eq!(outcome.chunks_indexed, 1);
        assert!(index_exists(&settings));
        assert_eq!(embedder.texts_embedded(), 1);

        let store = SqliteVectorStore::open(&settings.index_path()).unwrap();
        let files = store.list_files().await.unwrap();
        assert_eq!(files[0].file_name, "ep1.txt");
    }

    #[tokio::test]
    async fn test_build_index_skips_existing_without_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        std::fs::create_dir_all(settings.data_dir()).unwrap();
        std::fs::write(settings.data_dir().join("ep1.txt"), "Topic: AI safety.").unwrap();

        let first = Arc::new(StubEmbedder::new());
        build_index(&settings, first).await.unwrap();

        let second = Arc::new(StubEmbedder::new());
        let outcome = build_index(&settings, second.clone()).await.unwrap();

        assert!(outcome.skipped);
        assert_eq!(outcome.chunks_indexed, 0);
        assert_eq!(second.texts_embedded(), 0);
    }

    #[tokio::test]
    async fn test_rebuild_index_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        std::fs::create_dir_all(settings.data_dir()).unwrap();
        std::fs::write(settings.data_dir().join("ep1.txt"), "Topic: AI safety.").unwrap();

        build_index(&settings, Arc::new(StubEmbedder::new())).await.unwrap();

        // Marker proves the old storage directory was removed wholesale.
        let marker = settings.storage_dir().join("stale-marker");
        std::fs::write(&marker, "old").unwrap();

        let embedder = Arc::new(StubEmbedder::new());
        let outcome = rebuild_index(&settings, embedder.clone()).await.unwrap();

        assert!(!outcome.skipped);
        assert_eq!(embedder.texts_embedded(), 1);
        assert!(!marker.exists());
        assert!(index_exists(&settings));
    }

    #[tokio::test]
    async fn test_query_after_build_finds_source_file() {
        use crate::rag::{QueryEngine, SourceSnippet};

        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        std::fs::create_dir_all(settings.data_dir()).unwrap();
        std::fs::write(settings.data_dir().join("ep1.txt"), "Topic: AI safety.").unwrap();

        build_index(&settings, Arc::new(StubEmbedder::new())).await.unwrap();

        let store = Arc::new(SqliteVectorStore::open(&settings.index_path()).unwrap());
        let engine = QueryEngine::new(&settings, store, Arc::new(StubEmbedder::new()));

        let results = engine.retrieve("What topic is discussed?").await.unwrap();
        assert!(!results.is_empty());
        assert!(results.len() <= 3);

        let snippet = SourceSnippet::from(results[0].clone());
        assert_eq!(snippet.file, "ep1.txt");
        assert_eq!(snippet.text, "Topic: AI safety.");
    }

    #[tokio::test]
    async fn test_build_index_propagates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());

        let result = build_index(&settings, Arc::new(StubEmbedder::new())).await;
        assert!(result.is_err());
        assert!(!index_exists(&settings));
    }
}
