//! Property tests for session memory and the advancement policy.

use proptest::prelude::*;
use socratic_tutor::domain::models::{
    CoachingKind, PolicyState, Rubric, ScoreSet, SessionMemory, MAX_SCORE, MIN_SCORE,
};
use socratic_tutor::services::{Advancement, AdvancementPolicy};

fn score_row() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(MIN_SCORE..=MAX_SCORE, 5)
}

fn score_set(rubric: &Rubric, row: &[u8]) -> ScoreSet {
    ScoreSet::from_scores(rubric, rubric.keys().zip(row.iter().copied())).unwrap()
}

proptest! {
    /// Property: one version per submission, revisions are the rest.
    #[test]
    fn prop_version_count_tracks_submissions(rows in prop::collection::vec(score_row(), 1..20)) {
        let rubric = Rubric::value_rubric();
        let mut memory = SessionMemory::new();
        for (n, row) in rows.iter().enumerate() {
            memory.record_version(format!("draft {n}"), score_set(&rubric, row));
        }
        prop_assert_eq!(memory.versions().len(), rows.len());
        prop_assert_eq!(memory.revision_count() + 1, rows.len());
    }

    /// Property: all_at_target holds exactly when every latest score meets target.
    #[test]
    fn prop_all_at_target_matches_scores(rows in prop::collection::vec(score_row(), 1..6)) {
        let rubric = Rubric::value_rubric();
        let mut memory = SessionMemory::new();
        for row in &rows {
            memory.record_version("draft", score_set(&rubric, row));
            let expected = row.iter().all(|score| *score >= rubric.target());
            prop_assert_eq!(memory.all_at_target(&rubric), expected);
        }
    }

    /// Property: weakest dimensions are sorted by score, ties in rubric order.
    #[test]
    fn prop_weakest_sorted_and_stable(row in score_row()) {
        let rubric = Rubric::value_rubric();
        let mut memory = SessionMemory::new();
        memory.record_version("draft", score_set(&rubric, &row));

        let weakest = memory.weakest_dimensions_below_target(&rubric);
        prop_assert_eq!(&weakest, &memory.weakest_dimensions_below_target(&rubric));
        prop_assert_eq!(weakest.len(), row.iter().filter(|s| **s < rubric.target()).count());

        for pair in weakest.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (score_a, score_b) = (row[rubric.position(a).unwrap()], row[rubric.position(b).unwrap()]);
            prop_assert!(score_a <= score_b);
            if score_a == score_b {
                prop_assert!(rubric.position(a) < rubric.position(b));
            }
        }
    }

    /// Property: a dimension gets at most one worked example per visit, and
    /// the turn counter never passes the ceiling.
    #[test]
    fn prop_intervention_once_per_visit(
        rows in prop::collection::vec(score_row(), 1..30),
        max_turns in 1u32..20,
    ) {
        let rubric = Rubric::value_rubric();
        let policy = AdvancementPolicy::new(max_turns);
        let mut memory = SessionMemory::new();
        let mut state = PolicyState::default();
        let mut examples_this_visit = 0;
        let mut visiting: Option<String> = None;

        for (n, row) in rows.iter().enumerate() {
            memory.record_version(format!("draft {n}"), score_set(&rubric, row));
            let turns_before = state.coaching_turns;

            match policy.advance(&mut state, &memory, &rubric).unwrap() {
                Advancement::Reflect(_) => {
                    prop_assert_eq!(state.coaching_turns, turns_before);
                    break;
                }
                Advancement::Coach { dimension, kind, switched } => {
                    prop_assert_eq!(state.coaching_turns, turns_before + 1);
                    prop_assert!(state.coaching_turns <= max_turns);
                    prop_assert!(row[rubric.position(&dimension).unwrap()] < rubric.target());

                    if switched || visiting.as_deref() != Some(dimension.as_str()) {
                        visiting = Some(dimension.clone());
                        examples_this_visit = 0;
                    }
                    if kind == CoachingKind::ModelExample {
                        examples_this_visit += 1;
                    }
                    prop_assert!(examples_this_visit <= 1);
                }
            }
        }
    }
}
