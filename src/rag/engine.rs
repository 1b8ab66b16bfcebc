//! Streaming query engine.

use super::SourceSnippet;
use crate::config::Settings;
use crate::embedding::Embedder;
use crate::error::{PodqError, Result};
use crate::openai::create_client;
use crate::vector_store::{ScoredChunk, VectorStore};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

const SYSTEM_PROMPT: &str = "You are a helpful assistant answering questions about podcast \
transcripts. Answer using only the provided transcript excerpts. If the excerpts do not \
contain the answer, say so instead of guessing. Mention episode file names when citing.";

/// Retrieval-augmented query engine.
///
/// Holds the configured model clients and the loaded index; built once per
/// process and shared read-only across all turns of a session.
pub struct QueryEngine {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
    min_score: f32,
}

/// An answered question with its supporting sources.
#[derive(Debug, Clone)]
pub struct QueryResponse {
    /// The generated answer, fully joined from the streamed fragments.
    pub answer: String,
    /// Sources used for the answer, best match first.
    pub sources: Vec<SourceSnippet>,
}

impl QueryEngine {
    /// Create a query engine over a loaded index.
    pub fn new(
        settings: &Settings,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            client: create_client(),
            model: settings.generation.model.clone(),
            temperature: settings.generation.temperature,
            store,
            embedder,
            top_k: settings.retrieval.top_k,
            min_score: settings.retrieval.min_score,
        }
    }

    /// Retrieve the top-k chunks for a question.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.embedder.embed(question).await?;
        self.store
            .search(&query_embedding, self.top_k, self.min_score)
            .await
    }

    /// Answer a question: retrieve context, stream a completion to
    /// exhaustion, and return the joined answer with its sources.
    ///
    /// Remote failures propagate; they abort this question only.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<QueryResponse> {
        info!("Answering question");

        let retrieved = self.retrieve(question).await?;
        let sources: Vec<SourceSnippet> = retrieved.into_iter().map(SourceSnippet::from).collect();

        if sources.is_empty() {
            return Ok(QueryResponse {
                answer: "I couldn't find anything relevant in the indexed transcripts for this \
                         question."
                    .to_string(),
                sources,
            });
        }

        let user_prompt = format!(
            "Transcript excerpts:\n{}\n\nQuestion: {}",
            format_context(&sources),
            question
        );

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| PodqError::Query(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| PodqError::Query(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .stream(true)
            .build()
            .map_err(|e| PodqError::Query(e.to_string()))?;

        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| PodqError::OpenAI(format!("Failed to start completion: {}", e)))?;

        // Fragments arrive in generation order; concatenation preserves it.
        let mut answer = String::new();
        while let Some(next) = stream.next().await {
            let chunk =
                next.map_err(|e| PodqError::OpenAI(format!("Stream error: {}", e)))?;
            for choice in chunk.choices {
                if let Some(content) = choice.delta.content {
                    answer.push_str(&content);
                }
            }
        }

        if answer.is_empty() {
            return Err(PodqError::Query("Empty response from model".to_string()));
        }

        debug!("Generated answer with {} sources", sources.len());
        Ok(QueryResponse { answer, sources })
    }
}

/// Format retrieved sources for inclusion in the prompt.
fn format_context(sources: &[SourceSnippet]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("---\n[{}] {}\n{}\n---", i + 1, s.file, s.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
