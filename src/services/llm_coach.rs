//! Coaching-text generator backed by a text-completion service.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use super::prompts;
use crate::domain::models::LlmConfig;
use crate::domain::ports::{
    CoachingRequest, CoachingTextGenerator, CompletionError, CompletionRequest, TextCompletion,
};

/// Token budgets per kind of coaching text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoachBudgets {
    pub question: u32,
    pub example: u32,
}

impl From<&LlmConfig> for CoachBudgets {
    fn from(config: &LlmConfig) -> Self {
        Self {
            question: config.coaching_max_tokens,
            example: config.example_max_tokens,
        }
    }
}

pub struct LlmCoach {
    completion: Arc<dyn TextCompletion>,
    budgets: CoachBudgets,
}

impl LlmCoach {
    pub fn new(completion: Arc<dyn TextCompletion>, budgets: CoachBudgets) -> Self {
        Self { completion, budgets }
    }

    fn build_request(&self, request: &CoachingRequest) -> CompletionRequest {
        match request {
            CoachingRequest::Question {
                dimension,
                current_score,
                target,
                rationale,
                essay,
                passage,
                writing_prompt,
                student_response,
            } => CompletionRequest::new(
                prompts::coaching_system(
                    dimension,
                    *current_score,
                    *target,
                    rationale,
                    essay,
                    passage,
                    writing_prompt,
                ),
                prompts::coaching_user(student_response.as_deref()),
                self.budgets.question,
            ),
            CoachingRequest::ModelExample {
                dimension,
                current_score,
                rationale,
            } => CompletionRequest::new(
                prompts::model_example_system(dimension, *current_score, rationale),
                "Write the before/after example now.",
                self.budgets.example,
            ),
            CoachingRequest::ReflectionFollowup {
                question,
                guidance,
                answer,
                session_summary,
                final_turn,
            } => CompletionRequest::new(
                prompts::reflection_system(question, guidance, session_summary, *final_turn),
                format!("Student said: {answer}"),
                self.budgets.question,
            ),
        }
    }
}

#[async_trait]
impl CoachingTextGenerator for LlmCoach {
    #[instrument(skip_all, fields(kind = request.kind()))]
    async fn generate(&self, request: &CoachingRequest) -> Result<String, CompletionError> {
        let text = self.completion.complete(self.build_request(request)).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}
