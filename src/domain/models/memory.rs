//! Session memory.
//!
//! Append-only history of essay versions, their score sets, the coaching
//! dialogue and the reflection exchanges, with derived views over it.

use serde::{Deserialize, Serialize};

use super::dialogue::{DialogueTurn, ReflectionExchange};
use super::essay::EssayVersion;
use super::rubric::Rubric;
use super::score::{ScoreSet, MIN_SCORE};

/// Score movement of one dimension between two versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub dimension: String,
    pub old_score: u8,
    pub new_score: u8,
}

impl ScoreChange {
    pub const fn improved(&self) -> bool {
        self.new_score > self.old_score
    }
}

/// Ordered history owned by a single session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMemory {
    versions: Vec<EssayVersion>,
    dialogue: Vec<DialogueTurn>,
    reflections: Vec<ReflectionExchange>,
    revision_count: usize,
}

impl SessionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new essay version with its complete score set.
    ///
    /// The first call records the original (version 0); every later call
    /// counts as a revision.
    pub fn record_version(&mut self, text: impl Into<String>, scores: ScoreSet) -> &EssayVersion {
        let index = self.versions.len();
        if index > 0 {
            self.revision_count += 1;
        }
        self.versions.push(EssayVersion {
            index,
            text: text.into(),
            scores,
            created_at: index as u64,
        });
        &self.versions[index]
    }

    pub fn versions(&self) -> &[EssayVersion] {
        &self.versions
    }

    pub const fn revision_count(&self) -> usize {
        self.revision_count
    }

    pub fn latest_essay(&self) -> Option<&str> {
        self.versions.last().map(|v| v.text.as_str())
    }

    pub fn initial_essay(&self) -> Option<&str> {
        self.versions.first().map(|v| v.text.as_str())
    }

    /// Scores of the most recent version, `None` until the first scoring.
    pub fn latest_scores(&self) -> Option<&ScoreSet> {
        self.versions.last().map(|v| &v.scores)
    }

    /// Scores of version 0.
    pub fn initial_scores(&self) -> Option<&ScoreSet> {
        self.versions.first().map(|v| &v.scores)
    }

    /// Scores of the version before the latest one.
    pub fn previous_scores(&self) -> Option<&ScoreSet> {
        self.versions
            .len()
            .checked_sub(2)
            .map(|index| &self.versions[index].scores)
    }

    /// Dimensions whose score rose between the prior and latest versions,
    /// in rubric order. Empty with fewer than two versions.
    pub fn improved_dimensions(&self) -> Vec<ScoreChange> {
        match (self.previous_scores(), self.latest_scores()) {
            (Some(old), Some(new)) => changes_between(old, new)
                .into_iter()
                .filter(ScoreChange::improved)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Per-dimension movement from the original to the latest version.
    pub fn score_changes(&self) -> Vec<ScoreChange> {
        match (self.initial_scores(), self.latest_scores()) {
            (Some(old), Some(new)) => changes_between(old, new),
            _ => Vec::new(),
        }
    }

    /// True iff every dimension's latest score is at or above target.
    pub fn all_at_target(&self, rubric: &Rubric) -> bool {
        self.latest_scores().is_some_and(|scores| {
            rubric
                .keys()
                .all(|key| scores.score(key).is_some_and(|s| s >= rubric.target()))
        })
    }

    /// Dimensions below target, weakest first; ties keep rubric order.
    ///
    /// A dimension missing from the latest set counts as the lowest score.
    pub fn weakest_dimensions_below_target(&self, rubric: &Rubric) -> Vec<String> {
        let Some(scores) = self.latest_scores() else {
            return Vec::new();
        };

        let mut below: Vec<(&str, u8)> = rubric
            .keys()
            .map(|key| (key, scores.score(key).unwrap_or(MIN_SCORE)))
            .filter(|(_, score)| *score < rubric.target())
            .collect();

        // Stable sort keeps declaration order among equal scores.
        below.sort_by_key(|(_, score)| *score);
        below.into_iter().map(|(key, _)| key.to_string()).collect()
    }

    pub fn push_turn(&mut self, turn: DialogueTurn) {
        self.dialogue.push(turn);
    }

    pub fn dialogue(&self) -> &[DialogueTurn] {
        &self.dialogue
    }

    pub fn push_reflection(&mut self, exchange: ReflectionExchange) {
        self.reflections.push(exchange);
    }

    pub fn reflections(&self) -> &[ReflectionExchange] {
        &self.reflections
    }
}

fn changes_between(old: &ScoreSet, new: &ScoreSet) -> Vec<ScoreChange> {
    new.iter()
        .filter_map(|entry| {
            old.score(&entry.dimension).map(|old_score| ScoreChange {
                dimension: entry.dimension.clone(),
                old_score,
                new_score: entry.score,
            })
        })
        .collect()
}
