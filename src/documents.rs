//! Transcript file loading.
//!
//! Reads every regular file in the data directory into a [`SourceDocument`].
//! Files are treated as plain UTF-8 text; anything that fails to decode is an
//! error rather than a silent skip.

use crate::error::{PodqError, Result};
use std::path::Path;
use tracing::{debug, info};

/// A transcript file loaded from the data directory.
///
/// Exists only during an index build; the persisted form is the set of
/// embedded chunks derived from it.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// File name (without directory), used for source attribution.
    pub file_name: String,
    /// Raw transcript text.
    pub text: String,
}

/// Load all transcript files from a directory.
///
/// Returns files sorted by name so chunk ordering is deterministic across
/// runs. A missing directory or a directory with no readable files is an
/// error; the caller decides how to surface it.
pub fn load_documents(dir: &Path) -> Result<Vec<SourceDocument>> {
    if !dir.is_dir() {
        return Err(PodqError::Documents(format!(
            "Data directory not found: {}",
            dir.display()
        )));
    }

    let mut documents = Vec::new();

    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .filter(|e| e.path().is_file())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();

        // Dotfiles (e.g. .DS_Store) are not transcripts.
        if file_name.starts_with('.') {
            continue;
        }

        let text = std::fs::read_to_string(&path).map_err(|e| {
            PodqError::Documents(format!("Failed to read {}: {}", path.display(), e))
        })?;

        debug!("Loaded {} ({} bytes)", file_name, text.len());
        documents.push(SourceDocument { file_name, text });
    }

    if documents.is_empty() {
        return Err(PodqError::Documents(format!(
            "No transcript files found in {}",
            dir.display()
        )));
    }

    info!("Loaded {} transcript files from {}", documents.len(), dir.display());
    Ok(documents)
}
