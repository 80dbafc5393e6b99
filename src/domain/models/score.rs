//! Score domain model.
//!
//! A `ScoreSet` built against a rubric carries exactly one entry per rubric
//! dimension, in rubric declaration order. Sets read back from a saved
//! session have no rubric to check against; they are clamped and must not
//! repeat a dimension, and session memory treats a missing dimension as
//! the lowest score.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::rubric::Rubric;
use crate::domain::errors::TutorError;

/// Lowest level on the rubric scale.
pub const MIN_SCORE: u8 = 1;

/// Highest level on the rubric scale.
pub const MAX_SCORE: u8 = 4;

/// Clamp an arbitrary integer into the rubric scale.
pub fn clamp_score(raw: i64) -> u8 {
    // Bounded by the clamp, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = raw.clamp(i64::from(MIN_SCORE), i64::from(MAX_SCORE)) as u8;
    score
}

/// Score for a single dimension with the scorer's rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub dimension: String,
    pub score: u8,
    pub rationale: String,
}

impl ScoreEntry {
    /// Create an entry, clamping the score to 1..=4.
    pub fn new(dimension: impl Into<String>, score: i64, rationale: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            score: clamp_score(score),
            rationale: rationale.into(),
        }
    }
}

/// Complete set of scores for one essay version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScoreEntry>", into = "Vec<ScoreEntry>")]
pub struct ScoreSet {
    entries: Vec<ScoreEntry>,
}

impl ScoreSet {
    /// Build a score set for `rubric`, ordering entries by declaration.
    ///
    /// Entries for unknown dimensions are ignored and the first entry wins
    /// when a key repeats. Fails if any rubric dimension is missing.
    pub fn from_entries(
        rubric: &Rubric,
        entries: impl IntoIterator<Item = ScoreEntry>,
    ) -> Result<Self, TutorError> {
        let mut slots: Vec<Option<ScoreEntry>> = vec![None; rubric.len()];

        for mut entry in entries {
            if let Some(position) = rubric.position(&entry.dimension) {
                if slots[position].is_none() {
                    entry.score = entry.score.clamp(MIN_SCORE, MAX_SCORE);
                    slots[position] = Some(entry);
                }
            }
        }

        let missing: Vec<String> = rubric
            .keys()
            .zip(&slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(key, _)| key.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(TutorError::IncompleteScoreSet { missing });
        }

        Ok(Self {
            entries: slots.into_iter().flatten().collect(),
        })
    }

    /// Same score and rationale for every dimension.
    pub fn uniform(rubric: &Rubric, score: u8, rationale: &str) -> Self {
        Self {
            entries: rubric
                .keys()
                .map(|key| ScoreEntry::new(key, i64::from(score), rationale))
                .collect(),
        }
    }

    /// Build from `(key, score)` pairs with empty rationales.
    pub fn from_scores<'a>(
        rubric: &Rubric,
        scores: impl IntoIterator<Item = (&'a str, u8)>,
    ) -> Result<Self, TutorError> {
        Self::from_entries(
            rubric,
            scores
                .into_iter()
                .map(|(key, score)| ScoreEntry::new(key, i64::from(score), "")),
        )
    }

    pub fn get(&self, dimension: &str) -> Option<&ScoreEntry> {
        self.entries.iter().find(|e| e.dimension == dimension)
    }

    pub fn score(&self, dimension: &str) -> Option<u8> {
        self.get(dimension).map(|e| e.score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean score across the dimensions present.
    pub fn average(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: u32 = self.entries.iter().map(|e| u32::from(e.score)).sum();
        f64::from(total) / self.entries.len() as f64
    }
}

impl TryFrom<Vec<ScoreEntry>> for ScoreSet {
    type Error = TutorError;

    fn try_from(mut entries: Vec<ScoreEntry>) -> Result<Self, Self::Error> {
        if entries.is_empty() {
            return Err(TutorError::EmptyScoreSet);
        }
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &mut entries {
            if !seen.insert(entry.dimension.clone()) {
                return Err(TutorError::DuplicateDimension(entry.dimension.clone()));
            }
            entry.score = entry.score.clamp(MIN_SCORE, MAX_SCORE);
        }
        Ok(Self { entries })
    }
}

impl From<ScoreSet> for Vec<ScoreEntry> {
    fn from(set: ScoreSet) -> Self {
        set.entries
    }
}

impl<'a> IntoIterator for &'a ScoreSet {
    type Item = &'a ScoreEntry;
    type IntoIter = std::slice::Iter<'a, ScoreEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-3), 1);
        assert_eq!(clamp_score(0), 1);
        assert_eq!(clamp_score(2), 2);
        assert_eq!(clamp_score(9), 4);
        assert_eq!(ScoreEntry::new("x", 7, "").score, 4);
    }

    #[test]
    fn test_from_entries_orders_by_rubric() {
        let rubric = Rubric::value_rubric();
        let entries = vec![
            ScoreEntry::new("voice_engagement", 2, "flat"),
            ScoreEntry::new("organization", 3, ""),
            ScoreEntry::new("claim_clarity", 1, ""),
            ScoreEntry::new("reasoning_depth", 4, ""),
            ScoreEntry::new("evidence_use", 2, ""),
            ScoreEntry::new("not_a_dimension", 4, ""),
        ];

        let set = ScoreSet::from_entries(&rubric, entries).unwrap();
        let keys: Vec<&str> = set.iter().map(|e| e.dimension.as_str()).collect();
        assert_eq!(keys, rubric.keys().collect::<Vec<_>>());
        assert_eq!(set.score("voice_engagement"), Some(2));
        assert_eq!(set.get("voice_engagement").unwrap().rationale, "flat");
        assert!(set.get("not_a_dimension").is_none());
    }

    #[test]
    fn test_from_entries_rejects_partial() {
        let rubric = Rubric::value_rubric();
        let result = ScoreSet::from_scores(&rubric, [("claim_clarity", 3), ("evidence_use", 3)]);
        match result {
            Err(TutorError::IncompleteScoreSet { missing }) => {
                assert_eq!(
                    missing,
                    vec!["reasoning_depth", "organization", "voice_engagement"]
                );
            }
            other => panic!("Expected IncompleteScoreSet, got {other:?}"),
        }
    }

    #[test]
    fn test_first_duplicate_wins() {
        let rubric = Rubric::value_rubric();
        let mut entries: Vec<ScoreEntry> = rubric.keys().map(|k| ScoreEntry::new(k, 2, "")).collect();
        entries.push(ScoreEntry::new("claim_clarity", 4, ""));
        let set = ScoreSet::from_entries(&rubric, entries).unwrap();
        assert_eq!(set.score("claim_clarity"), Some(2));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_uniform_and_average() {
        let rubric = Rubric::value_rubric();
        let set = ScoreSet::uniform(&rubric, 1, "Scoring error.");
        assert_eq!(set.len(), rubric.len());
        assert!(set.iter().all(|e| e.score == 1 && e.rationale == "Scoring error."));
        assert!((set.average() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_as_list() {
        let rubric = Rubric::value_rubric();
        let set = ScoreSet::uniform(&rubric, 3, "ok");
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["dimension"], "claim_clarity");
        assert_eq!(json[0]["score"], 3);
    }

    #[test]
    fn test_deserialize_clamps_out_of_range_scores() {
        let json = r#"[{"dimension":"claim_clarity","score":9,"rationale":""},
                      {"dimension":"organization","score":0,"rationale":""}]"#;
        let set: ScoreSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.score("claim_clarity"), Some(MAX_SCORE));
        assert_eq!(set.score("organization"), Some(MIN_SCORE));
    }

    #[test]
    fn test_deserialize_rejects_duplicates_and_empty() {
        let json = r#"[{"dimension":"claim_clarity","score":2,"rationale":""},
                      {"dimension":"claim_clarity","score":3,"rationale":""}]"#;
        let err = serde_json::from_str::<ScoreSet>(json).unwrap_err();
        assert!(err.to_string().contains("claim_clarity"));

        assert!(serde_json::from_str::<ScoreSet>("[]").is_err());
    }

    #[test]
    fn test_deserialize_keeps_list_shape() {
        let rubric = Rubric::value_rubric();
        let set = ScoreSet::uniform(&rubric, 2, "ok");
        let json = serde_json::to_string(&set).unwrap();
        let back: ScoreSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
