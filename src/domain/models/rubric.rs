//! Rubric domain model.
//!
//! A rubric is a fixed, ordered list of scoring dimensions. Each dimension
//! has four proficiency levels; a dimension "meets the standard" once its
//! score reaches the rubric-wide target.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::score::{MAX_SCORE, MIN_SCORE};

/// Default target score (level 3 of 4).
pub const DEFAULT_TARGET_SCORE: u8 = 3;

/// Errors detected while validating a rubric at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RubricError {
    #[error("Rubric must declare at least one dimension")]
    NoDimensions,

    #[error("Duplicate dimension key: {0}")]
    DuplicateKey(String),

    #[error("Dimension at position {0} has an empty key")]
    EmptyKey(usize),

    #[error("Dimension '{0}' has an empty display name")]
    EmptyName(String),

    #[error("Invalid target score {0}: must be between 1 and 4")]
    InvalidTarget(u8),
}

/// One scored axis of writing quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricDimension {
    /// Stable identifier used in score payloads (e.g. `evidence_use`)
    pub key: String,

    /// Display name (e.g. "Evidence Use")
    pub name: String,

    /// One-line question the dimension answers
    #[serde(default)]
    pub description: String,

    /// Level descriptions, index 0 is level 1
    pub levels: [String; 4],
}

impl RubricDimension {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        levels: [&str; 4],
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            levels: levels.map(str::to_string),
        }
    }

    /// Description of the given level, if it is within 1..=4.
    pub fn level(&self, score: u8) -> Option<&str> {
        if (MIN_SCORE..=MAX_SCORE).contains(&score) {
            self.levels.get(usize::from(score - 1)).map(String::as_str)
        } else {
            None
        }
    }
}

/// Ordered collection of dimensions plus the target score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rubric {
    dimensions: Vec<RubricDimension>,

    #[serde(default = "default_target")]
    target: u8,
}

const fn default_target() -> u8 {
    DEFAULT_TARGET_SCORE
}

impl Default for Rubric {
    fn default() -> Self {
        Self::value_rubric()
    }
}

impl Rubric {
    pub fn new(dimensions: Vec<RubricDimension>, target: u8) -> Self {
        Self { dimensions, target }
    }

    /// Dimensions in declaration order.
    pub fn dimensions(&self) -> &[RubricDimension] {
        &self.dimensions
    }

    /// Minimum score considered meeting the standard.
    pub const fn target(&self) -> u8 {
        self.target
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.key.as_str())
    }

    pub fn dimension(&self, key: &str) -> Option<&RubricDimension> {
        self.dimensions.iter().find(|d| d.key == key)
    }

    /// Declaration index of a dimension, used as the tie-breaker.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d.key == key)
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Display name for a key, falling back to the key itself.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.dimension(key).map_or(key, |d| d.name.as_str())
    }

    /// Check structural soundness. Called once while loading configuration.
    pub fn validate(&self) -> Result<(), RubricError> {
        if self.dimensions.is_empty() {
            return Err(RubricError::NoDimensions);
        }

        if !(MIN_SCORE..=MAX_SCORE).contains(&self.target) {
            return Err(RubricError::InvalidTarget(self.target));
        }

        let mut seen = HashSet::new();
        for (index, dimension) in self.dimensions.iter().enumerate() {
            if dimension.key.trim().is_empty() {
                return Err(RubricError::EmptyKey(index));
            }
            if dimension.name.trim().is_empty() {
                return Err(RubricError::EmptyName(dimension.key.clone()));
            }
            if !seen.insert(dimension.key.as_str()) {
                return Err(RubricError::DuplicateKey(dimension.key.clone()));
            }
        }

        Ok(())
    }

    /// Rubric text block embedded in the scoring instructions.
    pub fn render_anchors(&self) -> String {
        let mut lines = Vec::new();
        for dimension in &self.dimensions {
            lines.push(format!(
                "\n{} ({}):",
                dimension.name.to_uppercase(),
                dimension.key
            ));
            if !dimension.description.is_empty() {
                lines.push(format!("  {}", dimension.description));
            }
            for (index, anchor) in dimension.levels.iter().enumerate() {
                lines.push(format!("  {}/{MAX_SCORE}: {anchor}", index + 1));
            }
        }
        lines.join("\n")
    }

    /// The five-dimension argumentative writing rubric.
    pub fn value_rubric() -> Self {
        Self::new(
            vec![
                RubricDimension::new(
                    "claim_clarity",
                    "Claim Clarity",
                    "How clear and specific is the main argument?",
                    [
                        "No clear position; the response never commits to an argument.",
                        "A position is implied but vague.",
                        "A clear position is stated and easy to follow.",
                        "A precise position frames the whole response.",
                    ],
                ),
                RubricDimension::new(
                    "evidence_use",
                    "Evidence Use",
                    "How well does the response use details from the passage?",
                    [
                        "No reference to the passage.",
                        "A general reference without specific details.",
                        "At least one specific detail is connected to the argument.",
                        "Several specific details each support the position.",
                    ],
                ),
                RubricDimension::new(
                    "reasoning_depth",
                    "Reasoning Depth",
                    "How well does the writer explain why the evidence matters?",
                    [
                        "Evidence is dropped in without explanation.",
                        "The evidence is restated rather than explained.",
                        "The link between evidence and position is analysed.",
                        "The analysis covers significance and implications.",
                    ],
                ),
                RubricDimension::new(
                    "organization",
                    "Organization",
                    "How logically structured is the response?",
                    [
                        "Ideas are scattered.",
                        "Some structure, but ideas jump around.",
                        "Ideas build on each other with transitions.",
                        "Clear progression from start to finish.",
                    ],
                ),
                RubricDimension::new(
                    "voice_engagement",
                    "Voice & Engagement",
                    "Does the writing sound like a real person with something to say?",
                    [
                        "Flat and impersonal.",
                        "Generic; could be about anything.",
                        "Some personality and investment come through.",
                        "A distinctive voice throughout.",
                    ],
                ),
            ],
            DEFAULT_TARGET_SCORE,
        )
    }
}
