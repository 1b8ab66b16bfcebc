//! Index command implementation.
//!
//! The command entry is destructive on purpose: a previously built index may
//! have been produced with a different embedding model, so it is deleted and
//! rebuilt rather than trusted. The non-destructive path is
//! [`crate::indexer::build_index`], for callers embedding podq as a library.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAiEmbedder;
use crate::indexer;
use anyhow::Result;
use std::sync::Arc;

/// Run the index command.
pub async fn run_index(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Index, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    if indexer::index_exists(&settings) {
        Output::info(&format!(
            "Found old index at {}. Deleting it to rebuild with the current embedding model.",
            settings.storage_dir().display()
        ));
    }

    let embedder = Arc::new(OpenAiEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));

    let spinner = Output::spinner(&format!(
        "Indexing transcripts from {}...",
        settings.data_dir().display()
    ));

    match indexer::rebuild_index(&settings, embedder).await {
        Ok(outcome) => {
            spinner.finish_and_clear();
            Output::success(&format!(
                "Indexed {} chunks from {} files into {}",
                outcome.chunks_indexed,
                outcome.files_indexed,
                settings.storage_dir().display()
            ));
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Index build failed: {}", e));
            Err(e.into())
        }
    }
}
