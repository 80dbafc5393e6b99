//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces the tutor core depends on:
//! - TextCompletion: hosted text-generation service
//! - Scorer: rubric scoring collaborator
//! - CoachingTextGenerator: coaching and reflection text
//! - PhraseChooser: canned phrasing variants
//!
//! Infrastructure adapters and LLM-backed services implement these traits,
//! keeping the session state machine independent of the network.

pub mod coaching;
pub mod phrase_chooser;
pub mod scorer;
pub mod text_completion;

pub use coaching::{CoachingRequest, CoachingTextGenerator};
pub use phrase_chooser::{PhraseCategory, PhraseChooser};
pub use scorer::{Scorer, ScoringRequest};
pub use text_completion::{CompletionError, CompletionRequest, TextCompletion};
