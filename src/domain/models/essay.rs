//! Essay versions and submission rules.

use serde::{Deserialize, Serialize};

use super::score::ScoreSet;
use crate::domain::errors::TutorError;

/// Minimum words for a submission to be scored.
pub const DEFAULT_MIN_WORDS: usize = 30;

/// One submitted version of the essay with its scores.
///
/// Version 0 is the original submission; every revision appends the next
/// index. Versions are never edited once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssayVersion {
    pub index: usize,
    pub text: String,
    pub scores: ScoreSet,
    /// Ordinal of the submission within the session
    pub created_at: u64,
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Caller-side validation applied before any collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionRules {
    pub min_words: usize,
}

impl Default for SubmissionRules {
    fn default() -> Self {
        Self {
            min_words: DEFAULT_MIN_WORDS,
        }
    }
}

impl SubmissionRules {
    pub const fn new(min_words: usize) -> Self {
        Self { min_words }
    }

    /// Validate a first submission and return its trimmed text.
    pub fn check_essay<'a>(&self, text: &'a str) -> Result<&'a str, TutorError> {
        let trimmed = text.trim();
        let words = word_count(trimmed);
        if trimmed.is_empty() || words < self.min_words {
            return Err(TutorError::EmptySubmission {
                words,
                minimum: self.min_words,
            });
        }
        Ok(trimmed)
    }

    /// Validate a revision against the current essay text.
    pub fn check_revision<'a>(&self, text: &'a str, current: &str) -> Result<&'a str, TutorError> {
        let trimmed = self.check_essay(text)?;
        if trimmed == current.trim() {
            return Err(TutorError::UnchangedRevision);
        }
        Ok(trimmed)
    }
}
