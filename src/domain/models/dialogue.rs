//! Dialogue history entries.

use serde::{Deserialize, Serialize};

use super::score::ScoreSet;

/// Kind of coaching turn emitted for the focus dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingKind {
    /// Plain Socratic question
    Ask,
    /// Worked before/after example, shown once per visit when stuck
    ModelExample,
}

impl CoachingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::ModelExample => "model_example",
        }
    }
}

/// One entry of the coaching dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogueTurn {
    Ask {
        dimension: String,
        question: String,
    },
    /// Before/after example; both halves live in `example` as generated.
    ModelExample {
        dimension: String,
        example: String,
    },
    /// Student's answer to a coaching question
    StudentResponse {
        dimension: String,
        response: String,
    },
    ReviseResult {
        old_scores: ScoreSet,
        new_scores: ScoreSet,
        feedback: String,
    },
}

impl DialogueTurn {
    /// Text shown to the student for this turn.
    pub fn text(&self) -> &str {
        match self {
            Self::Ask { question, .. } => question,
            Self::ModelExample { example, .. } => example,
            Self::StudentResponse { response, .. } => response,
            Self::ReviseResult { feedback, .. } => feedback,
        }
    }

    /// Whether the tutor produced this turn as coaching text.
    pub const fn is_coaching(&self) -> bool {
        matches!(self, Self::Ask { .. } | Self::ModelExample { .. })
    }

    /// Whether the student wrote this turn.
    pub const fn is_student(&self) -> bool {
        matches!(self, Self::StudentResponse { .. })
    }
}

/// A reflection question, the student's answer and the tutor's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionExchange {
    pub question: String,
    pub answer: String,
    pub response: String,
}
