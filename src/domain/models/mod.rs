//! Domain models
//!
//! Rubric, scores, essay versions, dialogue history, session state and
//! configuration.

pub mod config;
pub mod dialogue;
pub mod essay;
pub mod export;
pub mod memory;
pub mod passage;
pub mod reflection;
pub mod rubric;
pub mod score;
pub mod session;

pub use config::{
    Config, ExportConfig, LlmConfig, LogFormat, LoggingConfig, RateLimitConfig, ReflectionConfig,
    RetryConfig, RotationPolicy, TutorConfig, MAX_COACHING_TURNS, MIN_TURNS_BEFORE_FINISH,
};
pub use dialogue::{CoachingKind, DialogueTurn, ReflectionExchange};
pub use essay::{word_count, EssayVersion, SubmissionRules, DEFAULT_MIN_WORDS};
pub use export::{ExportSummary, SessionExport};
pub use memory::{ScoreChange, SessionMemory};
pub use passage::Passage;
pub use reflection::{ReflectionPrompt, DEFAULT_REFLECTION_PROMPTS};
pub use rubric::{Rubric, RubricDimension, RubricError, DEFAULT_TARGET_SCORE};
pub use score::{clamp_score, ScoreEntry, ScoreSet, MAX_SCORE, MIN_SCORE};
pub use session::{PolicyState, Session, SessionOutcome, SessionPhase};
