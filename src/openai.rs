//! Shared OpenAI client construction.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Timeout applied to every OpenAI API request (2 minutes).
///
/// Embedding batches and streamed completions both finish well within this;
/// it exists so a stalled connection cannot hang a build or a question turn
/// forever.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Create the OpenAI client used for embeddings and chat completions.
///
/// Reads `OPENAI_API_KEY` from the environment (validated earlier by the
/// preflight checks).
pub fn create_client() -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}
