//! Ordered closing-reflection prompts for the end of a session.

use crate::domain::models::{ReflectionConfig, ReflectionPrompt};

/// Fixed, ordered list of reflection prompts.
///
/// The sequencer holds no cursor of its own; the session stores the index
/// so a session can be exported and resumed without the sequencer.
#[derive(Debug, Clone)]
pub struct ReflectionSequencer {
    prompts: Vec<ReflectionPrompt>,
    closing_message: String,
}

impl Default for ReflectionSequencer {
    fn default() -> Self {
        Self::from_config(&ReflectionConfig::default())
    }
}

impl ReflectionSequencer {
    pub fn new(prompts: Vec<ReflectionPrompt>, closing_message: impl Into<String>) -> Self {
        Self {
            prompts,
            closing_message: closing_message.into(),
        }
    }

    pub fn from_config(config: &ReflectionConfig) -> Self {
        Self::new(config.prompts.clone(), config.closing_message.clone())
    }

    /// Prompt at `index`, `None` once exhausted.
    pub fn current_prompt(&self, index: usize) -> Option<&ReflectionPrompt> {
        self.prompts.get(index)
    }

    /// Whether answering the prompt at `index` ends the reflection.
    pub fn is_final(&self, index: usize) -> bool {
        index.saturating_add(1) >= self.prompts.len()
    }

    pub fn closing_message(&self) -> &str {
        &self.closing_message
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}
