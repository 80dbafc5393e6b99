use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::essay::DEFAULT_MIN_WORDS;
use super::passage::Passage;
use super::reflection::ReflectionPrompt;
use super::rubric::Rubric;

/// Default ceiling on coaching turns before the session is wrapped up.
pub const MAX_COACHING_TURNS: u32 = 15;

/// Coaching turns the student must see before ending the loop early.
pub const MIN_TURNS_BEFORE_FINISH: u32 = 2;

/// Main configuration structure for the tutor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Coaching loop settings
    #[serde(default)]
    pub tutor: TutorConfig,

    /// Scoring rubric
    #[serde(default)]
    pub rubric: Rubric,

    /// Reading passage and writing prompt
    #[serde(default)]
    pub passage: Passage,

    /// Reflection dialogue settings
    #[serde(default)]
    pub reflection: ReflectionConfig,

    /// Text-generation service settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Session export configuration
    #[serde(default)]
    pub export: ExportConfig,
}

/// Coaching loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TutorConfig {
    /// Coaching turns allowed before the session is force-ended
    #[serde(default = "default_max_coaching_turns")]
    pub max_coaching_turns: u32,

    /// Coaching turns required before `/finish` is accepted
    #[serde(default = "default_min_turns_before_finish")]
    pub min_turns_before_finish: u32,

    /// Minimum words for an essay or revision to be scored
    #[serde(default = "default_min_words")]
    pub min_words: usize,
}

const fn default_max_coaching_turns() -> u32 {
    MAX_COACHING_TURNS
}

const fn default_min_turns_before_finish() -> u32 {
    MIN_TURNS_BEFORE_FINISH
}

const fn default_min_words() -> usize {
    DEFAULT_MIN_WORDS
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            max_coaching_turns: default_max_coaching_turns(),
            min_turns_before_finish: default_min_turns_before_finish(),
            min_words: default_min_words(),
        }
    }
}

/// Reflection dialogue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReflectionConfig {
    /// Ordered reflection prompts
    #[serde(default = "ReflectionPrompt::defaults")]
    pub prompts: Vec<ReflectionPrompt>,

    /// Message returned once the reflection is exhausted
    #[serde(default = "default_closing_message")]
    pub closing_message: String,
}

fn default_closing_message() -> String {
    "Session complete. Great work today!".to_string()
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            prompts: ReflectionPrompt::defaults(),
            closing_message: default_closing_message(),
        }
    }
}

/// Text-generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    /// API key (falls back to the ANTHROPIC_API_KEY env var)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for the API (for testing/proxies)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Token budget for scoring calls
    #[serde(default = "default_scoring_max_tokens")]
    pub scoring_max_tokens: u32,

    /// Token budget for coaching questions and reflection replies
    #[serde(default = "default_coaching_max_tokens")]
    pub coaching_max_tokens: u32,

    /// Token budget for worked examples
    #[serde(default = "default_example_max_tokens")]
    pub example_max_tokens: u32,
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_scoring_max_tokens() -> u32 {
    800
}

const fn default_coaching_max_tokens() -> u32 {
    300
}

const fn default_example_max_tokens() -> u32 {
    400
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            scoring_max_tokens: default_scoring_max_tokens(),
            coaching_max_tokens: default_coaching_max_tokens(),
            example_max_tokens: default_example_max_tokens(),
        }
    }
}

impl LlmConfig {
    /// Configured key, or the ANTHROPIC_API_KEY environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Requests per second allowed
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,
}

const fn default_requests_per_second() -> f64 {
    2.0
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1_000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console log format: json or pretty
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for JSON log files (console only when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Mirror logs to stderr
    #[serde(default = "default_true")]
    pub enable_console: bool,

    /// Log file rotation
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "warn".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            enable_console: true,
            rotation: RotationPolicy::default(),
        }
    }
}

/// Session export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExportConfig {
    /// Write a JSON export when a session finishes
    #[serde(default)]
    pub enabled: bool,

    /// Directory receiving `session-<id>.json` files
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".tutor/sessions")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_export_dir(),
        }
    }
}
