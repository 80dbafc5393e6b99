use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single-turn request to a text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Instructions framing the task
    pub system: String,

    /// User message
    pub user: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens,
        }
    }
}

/// Failures reported by a text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Service returned no text")]
    EmptyResponse,
}

/// Port for a text-completion backend.
///
/// Implementations send `(system, user)` to a hosted model and return the
/// plain text of the reply. The tutor core never talks to the network
/// directly; everything goes through this trait.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
