//! podq - Podcast Transcript Q&A
//!
//! A retrieval-augmented question-answering tool for podcast transcripts.
//!
//! # Overview
//!
//! podq lets you:
//! - Index a directory of transcript files into a persisted vector store
//! - Ask questions and get streamed, AI-generated answers with sources
//! - Run a chat-style web UI over your transcript library
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `documents` - Transcript file loading
//! - `chunking` - Splitting transcripts into retrieval units
//! - `embedding` - Embedding generation
//! - `vector_store` - Persisted vector index
//! - `indexer` - Index build and rebuild
//! - `rag` - Query engine (retrieve + streamed generation)
//! - `session` - Chat session bookkeeping
//! - `web` - Chat web application
//!
//! # Example
//!
//! ```rust,no_run
//! use podq::config::Settings;
//! use podq::embedding::OpenAiEmbedder;
//! use podq::indexer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let embedder = Arc::new(OpenAiEmbedder::with_config(
//!         &settings.embedding.model,
//!         settings.embedding.dimensions as usize,
//!     ));
//!
//!     let outcome = indexer::build_index(&settings, embedder).await?;
//!     println!("Indexed {} chunks", outcome.chunks_indexed);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod documents;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod openai;
pub mod rag;
pub mod session;
pub mod vector_store;
pub mod web;

pub use error::{PodqError, Result};
