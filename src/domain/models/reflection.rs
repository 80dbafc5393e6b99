//! Reflection prompts asked once the coaching loop ends.

use serde::{Deserialize, Serialize};

/// Number of reflection prompts in the default sequence.
pub const DEFAULT_REFLECTION_PROMPTS: usize = 3;

/// One reflection question and the instruction for answering the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionPrompt {
    /// Question shown to the student
    pub question: String,

    /// Guidance for the follow-up written after the student answers
    pub followup: String,
}

impl ReflectionPrompt {
    pub fn new(question: impl Into<String>, followup: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            followup: followup.into(),
        }
    }

    /// The default three-turn debrief.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(
                "What was the hardest part of this session for you?",
                "Respond to the specific difficulty the student named and tie it to \
                 something that happened in the session. Two or three sentences.",
            ),
            Self::new(
                "What is one thing you noticed about your writing that you didn't see before?",
                "Acknowledge the student's observation, sharpen it if it is vague, and \
                 link it to a score change from the session. Two or three sentences.",
            ),
            Self::new(
                "If you were starting a new essay right now, what would you do differently?",
                "This is the final turn. Connect the plan to a concrete revision the \
                 student made, encourage them, and note that the session is complete.",
            ),
        ]
    }
}
