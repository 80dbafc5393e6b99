//! Domain errors for the tutoring session core.

use thiserror::Error;

use super::models::SessionPhase;

/// Errors raised by the session state machine and its models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TutorError {
    #[error("Submission too short: {words} word(s), at least {minimum} required")]
    EmptySubmission { words: usize, minimum: usize },

    #[error("Revision is identical to the current essay")]
    UnchangedRevision,

    #[error(transparent)]
    ScoringUnavailable(#[from] ScoringUnavailable),

    #[error("No essay has been scored yet")]
    NotYetScored,

    #[error("Operation requires phase {expected} but session is in {actual}")]
    InvalidPhase {
        expected: SessionPhase,
        actual: SessionPhase,
    },

    #[error("Invalid phase transition from {from} to {to}")]
    InvalidTransition { from: SessionPhase, to: SessionPhase },

    #[error("Score set is missing dimensions: {}", .missing.join(", "))]
    IncompleteScoreSet { missing: Vec<String> },

    #[error("Unknown rubric dimension: {0}")]
    UnknownDimension(String),

    #[error("Score set repeats dimension: {0}")]
    DuplicateDimension(String),

    #[error("Score set has no entries")]
    EmptyScoreSet,

    #[error("Coaching can end after {minimum} turns, only {turns} so far")]
    CoachingTooShort { turns: u32, minimum: u32 },
}

impl TutorError {
    /// Returns true if the student can fix the problem by resubmitting.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::EmptySubmission { .. } | Self::UnchangedRevision | Self::ScoringUnavailable(_)
        )
    }
}

/// The scoring collaborator could not produce a score set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Scoring unavailable: {0}")]
pub struct ScoringUnavailable(pub String);

pub type TutorResult<T> = Result<T, TutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TutorError::EmptySubmission {
            words: 4,
            minimum: 30,
        };
        assert_eq!(
            err.to_string(),
            "Submission too short: 4 word(s), at least 30 required"
        );

        let err = TutorError::IncompleteScoreSet {
            missing: vec!["organization".to_string(), "evidence_use".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Score set is missing dimensions: organization, evidence_use"
        );

        let err: TutorError = ScoringUnavailable("timeout".to_string()).into();
        assert_eq!(err.to_string(), "Scoring unavailable: timeout");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(TutorError::UnchangedRevision.is_retryable());
        assert!(TutorError::ScoringUnavailable(ScoringUnavailable("x".into())).is_retryable());
        assert!(!TutorError::NotYetScored.is_retryable());
        assert!(!TutorError::InvalidPhase {
            expected: SessionPhase::Coaching,
            actual: SessionPhase::Done,
        }
        .is_retryable());
    }
}
