//! Random phrase chooser.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Mutex, PoisonError};

use crate::domain::ports::{PhraseCategory, PhraseChooser};

/// Built-in phrasing variants for each category.
pub fn catalog(category: PhraseCategory) -> &'static [&'static str] {
    match category {
        PhraseCategory::FirstTry => &[
            "Impressive! Your response meets the standard across the board on the first try. \
             Let's reflect on your process.",
            "Strong work right out of the gate: every dimension is already at the goal. \
             Let's talk about how you got there.",
        ],
        PhraseCategory::Celebration => &[
            "Look at how far you've come!",
            "You put in real work, and it shows.",
            "Every dimension is now at the goal. Well done!",
        ],
        PhraseCategory::RevisionImproved => &[
            "That revision moved the needle.",
            "Nice, your changes paid off.",
            "Progress! Here's what changed:",
        ],
        PhraseCategory::RevisionFlat => &[
            "The scores didn't move this time, and that's part of the process.",
            "Not much changed yet. Let's look at it from another angle.",
        ],
        PhraseCategory::FallbackQuestion => &[
            "Reread your focus paragraph. Which sentence would a skeptical reader question first, \
             and what could you add to answer them?",
            "Pick one sentence you're least sure about. What would make it more convincing?",
        ],
        PhraseCategory::FallbackReflection => &[
            "Thanks for sharing that. Noticing this about your own writing is a real skill.",
            "That's a thoughtful answer. Hold on to it for your next essay.",
        ],
        PhraseCategory::Apology => &[
            "Sorry, I couldn't score that just now. Please try submitting again.",
            "Something went wrong while scoring your essay. Your work is saved; give it another try.",
        ],
        PhraseCategory::TurnLimit => &[
            "We've covered a lot of ground today, so let's pause the revisions here.",
            "That's plenty of revising for one session. Let's step back and look at your progress.",
        ],
        PhraseCategory::EarlyFinish => &[
            "Good call to stop and take stock. Here's where your essay stands.",
            "Let's wrap up the revising for today and look back at what changed.",
        ],
    }
}

/// Picks a random variant per call; seedable for reproducible runs.
pub struct RandomPhraseChooser {
    rng: Mutex<StdRng>,
}

impl Default for RandomPhraseChooser {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RandomPhraseChooser {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl PhraseChooser for RandomPhraseChooser {
    fn choose(&self, category: PhraseCategory) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        catalog(category)
            .choose(&mut *rng)
            .map_or_else(String::new, |phrase| (*phrase).to_string())
    }
}

/// Always returns the first variant of each category.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPhraseChooser;

impl PhraseChooser for FirstPhraseChooser {
    fn choose(&self, category: PhraseCategory) -> String {
        catalog(category)
            .first()
            .map_or_else(String::new, |phrase| (*phrase).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_variants() {
        for category in PhraseCategory::ALL {
            assert!(!catalog(category).is_empty(), "{category:?} has no phrases");
        }
    }

    #[test]
    fn test_seeded_chooser_is_reproducible() {
        let a = RandomPhraseChooser::new(Some(7));
        let b = RandomPhraseChooser::new(Some(7));
        let picks_a: Vec<String> = (0..10).map(|_| a.choose(PhraseCategory::Celebration)).collect();
        let picks_b: Vec<String> = (0..10).map(|_| b.choose(PhraseCategory::Celebration)).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_choice_comes_from_catalog() {
        let chooser = RandomPhraseChooser::default();
        for category in PhraseCategory::ALL {
            let phrase = chooser.choose(category);
            assert!(catalog(category).contains(&phrase.as_str()));
        }
    }

    #[test]
    fn test_first_phrase_chooser() {
        assert_eq!(
            FirstPhraseChooser.choose(PhraseCategory::Apology),
            catalog(PhraseCategory::Apology)[0]
        );
    }
}
