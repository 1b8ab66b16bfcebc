//! Chat session bookkeeping.
//!
//! One session per process. History is append-only in submission order; a
//! turn is never mutated after it is recorded. Each turn carries an
//! independent source-visibility flag that starts hidden and is toggled
//! freely by the UI without touching anything else.

use crate::rag::SourceSnippet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One completed question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceSnippet>,
}

/// Ordered history of chat turns with per-turn visibility flags.
#[derive(Debug, Default)]
pub struct SessionHistory {
    turns: Vec<ChatTurn>,
    visible: HashMap<usize, bool>,
}

impl SessionHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return its index. Sources start hidden.
    pub fn push_turn(&mut self, turn: ChatTurn) -> usize {
        let index = self.turns.len();
        self.turns.push(turn);
        self.visible.insert(index, false);
        index
    }

    /// Flip the visibility flag for a turn, returning the new state.
    /// Returns `None` for an out-of-range index.
    pub fn toggle_sources(&mut self, index: usize) -> Option<bool> {
        if index >= self.turns.len() {
            return None;
        }
        let flag = self.visible.entry(index).or_insert(false);
        *flag = !*flag;
        Some(*flag)
    }

    /// Whether a turn's sources are currently shown.
    pub fn sources_visible(&self, index: usize) -> bool {
        self.visible.get(&index).copied().unwrap_or(false)
    }

    /// Number of recorded turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when no turns have been recorded.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Iterate turns in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }
}

/// Trim a submitted question, rejecting empty input.
///
/// Empty or whitespace-only submissions produce no turn; they are ignored,
/// not treated as errors.
pub fn normalize_question(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(question: &str) -> ChatTurn {
        ChatTurn {
            question: question.to_string(),
            answer: "an answer".to_string(),
            sources: vec![SourceSnippet {
                file: "ep1.txt".to_string(),
                score: 0.87,
                text: "Topic: AI safety.".to_string(),
            }],
        }
    }

    #[test]
    fn test_push_appends_in_submission_order() {
        let mut history = SessionHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.push_turn(turn("first")), 0);
        assert_eq!(history.push_turn(turn("second")), 1);
        assert_eq!(history.len(), 2);

        let questions: Vec<&str> = history.iter().map(|t| t.question.as_str()).collect();
        assert_eq!(questions, vec!["first", "second"]);
    }

    #[test]
    fn test_new_turn_sources_start_hidden() {
        let mut history = SessionHistory::new();
        let first = history.push_turn(turn("first"));
        history.toggle_sources(first);
        assert!(history.sources_visible(first));

        // Showing one turn's sources must not leak into the next turn.
        let second = history.push_turn(turn("second"));
        assert!(!history.sources_visible(second));
        assert!(history.sources_visible(first));
    }

    #[test]
    fn test_double_toggle_is_identity() {
        let mut history = SessionHistory::new();
        let idx = history.push_turn(turn("q"));

        assert_eq!(history.toggle_sources(idx), Some(true));
        assert_eq!(history.toggle_sources(idx), Some(false));
        assert!(!history.sources_visible(idx));
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut history = SessionHistory::new();
        assert_eq!(history.toggle_sources(0), None);
        history.push_turn(turn("q"));
        assert_eq!(history.toggle_sources(5), None);
    }

    #[test]
    fn test_normalize_question() {
        assert_eq!(normalize_question("  what?  "), Some("what?".to_string()));
        assert_eq!(normalize_question(""), None);
        assert_eq!(normalize_question("   \t\n"), None);
    }
}
