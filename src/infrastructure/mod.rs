//! Infrastructure layer module
//!
//! Adapters and external integrations:
//! - Claude API client (implements `TextCompletion`)
//! - Configuration management
//! - Logging infrastructure
//! - Phrase chooser
//! - Session export writer
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod claude;
pub mod config;
pub mod export;
pub mod logging;
pub mod phrases;

pub use export::SessionExporter;
pub use phrases::{FirstPhraseChooser, RandomPhraseChooser};
