//! Pre-flight checks before expensive operations.
//!
//! Validates credentials and preconditions up front so an operation fails
//! before any remote work starts, not midway through.

use crate::config::Settings;
use crate::error::{PodqError, Result};
use crate::indexer;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Building the index requires the API key.
    Index,
    /// Answering questions requires the API key and a persisted index.
    Query,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Index => {
            check_api_key()?;
        }
        Operation::Query => {
            check_api_key()?;
            check_index(settings)?;
        }
    }
    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(PodqError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(PodqError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check that the persisted index exists.
fn check_index(settings: &Settings) -> Result<()> {
    if indexer::index_exists(settings) {
        Ok(())
    } else {
        Err(PodqError::Config(format!(
            "No index found at {}. Run 'podq index' first to build it.",
            settings.storage_dir().display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_index_missing_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.general.storage_dir = dir.path().join("storage").display().to_string();

        let err = check_index(&settings).unwrap_err();
        assert!(err.to_string().contains("podq index"));
    }

    #[test]
    fn test_check_index_present() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.general.storage_dir = dir.path().display().to_string();
        std::fs::write(settings.index_path(), b"").unwrap();

        assert!(check_index(&settings).is_ok());
    }
}
