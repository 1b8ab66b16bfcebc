//! Serve command: run the chat web application.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAiEmbedder;
use crate::rag::QueryEngine;
use crate::vector_store::SqliteVectorStore;
use crate::web::{router, AppState};
use std::sync::Arc;

/// Run the chat web server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    // Fail fast: no credential or no index means the app cannot function.
    if let Err(e) = preflight::check(Operation::Query, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    // The index and model clients are constructed exactly once here and
    // shared read-only across every turn of the session.
    let store = Arc::new(SqliteVectorStore::open(&settings.index_path())?);
    let embedder = Arc::new(OpenAiEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    let engine = QueryEngine::new(&settings, store, embedder);

    let state = Arc::new(AppState::new(engine));
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Podcast Q&A");
    println!();
    Output::success(&format!("Chat UI at http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Chat UI", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("History", "GET  /history");
    Output::kv("Ask", "POST /ask");
    Output::kv("Toggle sources", "POST /history/:index/toggle");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}
