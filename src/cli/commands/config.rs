//! `tutor config`: print the effective configuration.

use anyhow::{Context, Result};

use crate::domain::models::Config;

/// Copy of the configuration that is safe to print.
fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.llm.api_key.is_some() {
        shown.llm.api_key = Some("[REDACTED]".to_string());
    }
    shown
}

pub fn render(config: &Config, json: bool) -> Result<String> {
    let shown = redacted(config);
    if json {
        serde_json::to_string_pretty(&shown).context("Failed to serialize configuration")
    } else {
        serde_yaml::to_string(&shown).context("Failed to serialize configuration")
    }
}

pub fn execute(config: &Config, json: bool) -> Result<()> {
    println!("{}", render(config, json)?);
    Ok(())
}
