use serde::{Deserialize, Serialize};

/// Categories of canned phrasing used around the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseCategory {
    /// Praise when every dimension meets target on the first submission
    FirstTry,
    /// Heading of the end-of-loop celebration
    Celebration,
    /// Opener after a revision raised at least one score
    RevisionImproved,
    /// Opener after a revision left scores flat or lower
    RevisionFlat,
    /// Question used when coaching text cannot be generated
    FallbackQuestion,
    /// Reply used when a reflection follow-up cannot be generated
    FallbackReflection,
    /// Apology shown when scoring is unavailable
    Apology,
    /// Wrap-up when the turn ceiling ends the loop
    TurnLimit,
    /// Wrap-up when the student ends the loop before reaching every target
    EarlyFinish,
}

impl PhraseCategory {
    pub const ALL: [Self; 9] = [
        Self::FirstTry,
        Self::Celebration,
        Self::RevisionImproved,
        Self::RevisionFlat,
        Self::FallbackQuestion,
        Self::FallbackReflection,
        Self::Apology,
        Self::TurnLimit,
        Self::EarlyFinish,
    ];
}

/// Port for picking phrasing variants.
///
/// Production uses a random choice for variety; tests substitute a
/// deterministic implementation.
pub trait PhraseChooser: Send + Sync {
    fn choose(&self, category: PhraseCategory) -> String;
}
