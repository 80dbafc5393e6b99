//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Pretty or JSON console output on stderr
//! - Optional rolling JSON log files
//! - Secret scrubbing on every sink
pub mod logger;
pub mod secret_scrubbing;

pub use logger::{parse_log_level, LoggerImpl};
pub use secret_scrubbing::{ScrubbingMakeWriter, SecretScrubber};
