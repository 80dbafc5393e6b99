//! Socratic Tutor - rubric-driven writing coach
//!
//! A student writes a short argumentative response to a reading passage. The
//! tutor scores it against a rubric, coaches one weak dimension at a time with
//! questions (or a worked example when the student is stuck), re-scores each
//! revision, and closes with a short reflection conversation.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Rubric, scores, session memory and state, ports
//! - **Service Layer** (`services`): Advancement policy, reflection sequencing,
//!   prompt building and the LLM-backed scorer and coach
//! - **Application Layer** (`application`): The `TutorEngine` state machine
//! - **Infrastructure Layer** (`infrastructure`): Claude client, configuration,
//!   logging, phrase selection and session export
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use socratic_tutor::cli::commands::session::build_engine;
//! use socratic_tutor::{ConfigLoader, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let engine = build_engine(&config, None)?;
//!     let mut session = Session::new();
//!     let reply = engine.submit_essay(&mut session, "My essay ...").await?;
//!     println!("{}", reply.message);
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{ReplyKind, TutorEngine, TutorReply};
pub use domain::errors::{ScoringUnavailable, TutorError, TutorResult};
pub use domain::models::{
    Config, Passage, Rubric, RubricDimension, ScoreSet, Session, SessionOutcome, SessionPhase,
};
pub use domain::ports::{CoachingTextGenerator, PhraseCategory, PhraseChooser, Scorer, TextCompletion};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AdvancementPolicy, LlmCoach, LlmScorer, ReflectionSequencer};
