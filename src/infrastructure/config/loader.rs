use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::{Config, RubricError};

/// Project-level configuration file
pub const PROJECT_CONFIG: &str = ".tutor/config.yaml";

/// Optional local overrides, not meant to be committed
pub const LOCAL_CONFIG: &str = ".tutor/local.yaml";

/// Prefix for environment overrides (`__` separates nested keys)
pub const ENV_PREFIX: &str = "TUTOR_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid rubric: {0}")]
    InvalidRubric(#[from] RubricError),

    #[error("Invalid min_words: {0}. Must be at least 1")]
    InvalidMinWords(usize),

    #[error("Invalid max_coaching_turns: {0}. Must be at least 1")]
    InvalidMaxCoachingTurns(u32),

    #[error("At least one reflection prompt is required")]
    NoReflectionPrompts,

    #[error("Reflection prompt {0} has an empty question")]
    EmptyReflectionQuestion(usize),

    #[error("Passage text cannot be empty")]
    EmptyPassage,

    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid token budget for {0}: must be at least 1")]
    InvalidTokenBudget(&'static str),

    #[error("Invalid timeout_secs: must be at least 1")]
    InvalidTimeout,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .tutor/config.yaml (project config)
    /// 3. .tutor/local.yaml (local overrides, optional)
    /// 4. Environment variables (TUTOR_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file on top of the defaults
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(PROJECT_CONFIG))
            .merge(Yaml::file(LOCAL_CONFIG))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        config.rubric.validate()?;

        if config.tutor.min_words == 0 {
            return Err(ConfigError::InvalidMinWords(config.tutor.min_words));
        }

        if config.tutor.max_coaching_turns == 0 {
            return Err(ConfigError::InvalidMaxCoachingTurns(
                config.tutor.max_coaching_turns,
            ));
        }

        if config.reflection.prompts.is_empty() {
            return Err(ConfigError::NoReflectionPrompts);
        }

        if let Some(index) = config
            .reflection
            .prompts
            .iter()
            .position(|prompt| prompt.question.trim().is_empty())
        {
            return Err(ConfigError::EmptyReflectionQuestion(index));
        }

        if config.passage.text.trim().is_empty() {
            return Err(ConfigError::EmptyPassage);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if config.rate_limit.requests_per_second <= 0.0
            || !config.rate_limit.requests_per_second.is_finite()
        {
            return Err(ConfigError::InvalidRateLimit(
                config.rate_limit.requests_per_second,
            ));
        }

        if config.retry.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(config.retry.max_retries));
        }

        if config.retry.initial_backoff_ms >= config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        if config.llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        for (name, budget) in [
            ("scoring", config.llm.scoring_max_tokens),
            ("coaching", config.llm.coaching_max_tokens),
            ("examples", config.llm.example_max_tokens),
        ] {
            if budget == 0 {
                return Err(ConfigError::InvalidTokenBudget(name));
            }
        }

        Ok(())
    }
}
