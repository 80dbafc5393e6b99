//! Domain layer for the Socratic tutor
//!
//! This module contains the rubric, score and session models, the ports
//! that external collaborators implement, and the domain errors.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ScoringUnavailable, TutorError, TutorResult};
