//! Chat web application.
//!
//! A single-page UI over the query engine: ordered Q/A history, a per-turn
//! source toggle, and a question input. One process serves one session;
//! history lives in memory and dies with the process.

use crate::rag::{QueryEngine, SourceSnippet};
use crate::session::{normalize_question, ChatTurn, SessionHistory};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

const INDEX_PAGE: &str = include_str!("../../assets/index.html");

/// Shared application state.
///
/// The engine (and the index behind it) is constructed once at startup and
/// only ever read afterwards; the mutex guards the session history alone.
pub struct AppState {
    pub engine: QueryEngine,
    pub history: Mutex<SessionHistory>,
}

impl AppState {
    pub fn new(engine: QueryEngine) -> Self {
        Self {
            engine,
            history: Mutex::new(SessionHistory::new()),
        }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/history", get(history))
        .route("/ask", post(ask))
        .route("/history/{index}/toggle", post(toggle_sources))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    /// False when the submission was empty and no turn was recorded.
    created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    turn: Option<TurnView>,
}

#[derive(Serialize)]
struct TurnView {
    index: usize,
    question: String,
    answer: String,
    sources: Vec<SourceView>,
    sources_visible: bool,
}

#[derive(Serialize)]
struct SourceView {
    file: String,
    score: f32,
    text: String,
}

#[derive(Serialize)]
struct HistoryResponse {
    turns: Vec<TurnView>,
}

#[derive(Serialize)]
struct ToggleResponse {
    index: usize,
    visible: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn source_view(s: &SourceSnippet) -> SourceView {
    SourceView {
        file: s.file.clone(),
        score: s.score,
        text: s.text.clone(),
    }
}

fn turn_view(index: usize, turn: &ChatTurn, visible: bool) -> TurnView {
    TurnView {
        index,
        question: turn.question.clone(),
        answer: turn.answer.clone(),
        sources: turn.sources.iter().map(source_view).collect(),
        sources_visible: visible,
    }
}

// === Handlers ===

async fn index_page() -> impl IntoResponse {
    Html(INDEX_PAGE)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let history = state.history.lock().unwrap();
    let turns = history
        .iter()
        .enumerate()
        .map(|(i, turn)| turn_view(i, turn, history.sources_visible(i)))
        .collect();
    Json(HistoryResponse { turns })
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    // Whitespace-only submissions record nothing.
    let Some(question) = normalize_question(&req.question) else {
        return Json(AskResponse {
            created: false,
            turn: None,
        })
        .into_response();
    };

    match state.engine.ask(&question).await {
        Ok(response) => {
            let turn = ChatTurn {
                question,
                answer: response.answer,
                sources: response.sources,
            };
            let mut history = state.history.lock().unwrap();
            let index = history.push_turn(turn.clone());
            let view = turn_view(index, &turn, false);
            Json(AskResponse {
                created: true,
                turn: Some(view),
            })
            .into_response()
        }
        Err(e) => {
            warn!("Question failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn toggle_sources(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> impl IntoResponse {
    let mut history = state.history.lock().unwrap();
    match history.toggle_sources(index) {
        Some(visible) => Json(ToggleResponse { index, visible }).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No such turn: {}", index),
            }),
        )
            .into_response(),
    }
}
