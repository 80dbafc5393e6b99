use async_trait::async_trait;

use crate::domain::errors::ScoringUnavailable;
use crate::domain::models::{Passage, Rubric, ScoreSet};

/// Everything the scorer needs to assess one essay version.
#[derive(Debug, Clone, Copy)]
pub struct ScoringRequest<'a> {
    pub essay: &'a str,
    pub passage: &'a Passage,
    pub rubric: &'a Rubric,
}

/// Port for the scoring collaborator.
///
/// A successful call always yields a complete score set for the rubric.
/// Transport failures surface as [`ScoringUnavailable`] so the caller can
/// keep the session in its pre-call state and let the student retry.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, request: ScoringRequest<'_>) -> Result<ScoreSet, ScoringUnavailable>;
}
