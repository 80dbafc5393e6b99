use async_trait::async_trait;

use super::text_completion::CompletionError;
use crate::domain::models::RubricDimension;

/// Context for one piece of coaching text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoachingRequest {
    /// Socratic question about the focus dimension
    Question {
        dimension: RubricDimension,
        current_score: u8,
        target: u8,
        rationale: String,
        essay: String,
        passage: String,
        writing_prompt: String,
        /// Student's answer to the previous question, for a follow-up
        student_response: Option<String>,
    },
    /// Before/after worked example for a stuck dimension.
    ///
    /// The generator returns both halves and the closing nudge as one text.
    ModelExample {
        dimension: RubricDimension,
        current_score: u8,
        rationale: String,
    },
    /// Reply to a reflection answer
    ReflectionFollowup {
        question: String,
        guidance: String,
        answer: String,
        session_summary: String,
        final_turn: bool,
    },
}

impl CoachingRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Question { .. } => "question",
            Self::ModelExample { .. } => "model_example",
            Self::ReflectionFollowup { .. } => "reflection_followup",
        }
    }
}

/// Port for the coaching-text collaborator.
#[async_trait]
pub trait CoachingTextGenerator: Send + Sync {
    async fn generate(&self, request: &CoachingRequest) -> Result<String, CompletionError>;
}
