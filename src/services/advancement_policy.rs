//! Dimension advancement policy.
//!
//! Runs once per scoring event and decides whether the coaching loop ends,
//! which dimension to focus on next and whether a stuck dimension gets a
//! worked example instead of another question. The policy only reasons
//! over score sets already recorded in memory.

use tracing::debug;

use crate::domain::errors::TutorError;
use crate::domain::models::{
    CoachingKind, PolicyState, Rubric, SessionMemory, SessionOutcome, MAX_COACHING_TURNS,
    MIN_SCORE, MIN_TURNS_BEFORE_FINISH,
};

/// Verdict of the policy for one scoring event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advancement {
    /// Leave the coaching loop
    Reflect(SessionOutcome),
    /// Emit another coaching turn
    Coach {
        dimension: String,
        kind: CoachingKind,
        /// Focus moved to a different dimension on this event
        switched: bool,
    },
}

/// Stateless decision service; per-session state lives in [`PolicyState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvancementPolicy {
    max_coaching_turns: u32,
    min_turns_before_finish: u32,
}

impl Default for AdvancementPolicy {
    fn default() -> Self {
        Self::new(MAX_COACHING_TURNS)
    }
}

impl AdvancementPolicy {
    pub const fn new(max_coaching_turns: u32) -> Self {
        Self {
            max_coaching_turns,
            min_turns_before_finish: MIN_TURNS_BEFORE_FINISH,
        }
    }

    pub fn with_min_turns_before_finish(mut self, turns: u32) -> Self {
        self.min_turns_before_finish = turns;
        self
    }

    pub const fn max_coaching_turns(&self) -> u32 {
        self.max_coaching_turns
    }

    pub const fn min_turns_before_finish(&self) -> u32 {
        self.min_turns_before_finish
    }

    /// Decide the next step after the latest version was recorded.
    ///
    /// A `Coach` verdict increments the coaching-turn counter; a `Reflect`
    /// verdict leaves the state untouched.
    pub fn advance(
        &self,
        state: &mut PolicyState,
        memory: &SessionMemory,
        rubric: &Rubric,
    ) -> Result<Advancement, TutorError> {
        let latest = memory.latest_scores().ok_or(TutorError::NotYetScored)?;

        if memory.all_at_target(rubric) {
            let outcome = if memory.versions().len() == 1 {
                SessionOutcome::FirstTry
            } else {
                SessionOutcome::TargetsMet
            };
            return Ok(Advancement::Reflect(outcome));
        }

        if state.coaching_turns >= self.max_coaching_turns {
            debug!(
                coaching_turns = state.coaching_turns,
                max = self.max_coaching_turns,
                "Coaching turn ceiling reached"
            );
            return Ok(Advancement::Reflect(SessionOutcome::TurnLimit));
        }

        // Not all at target, so at least one dimension is below it.
        let weakest = memory
            .weakest_dimensions_below_target(rubric)
            .into_iter()
            .next()
            .ok_or(TutorError::NotYetScored)?;

        let Some(focus) = state.focus.clone() else {
            state.focus_on(&weakest);
            return Ok(self.emit(state, weakest, CoachingKind::Ask, true));
        };

        let current = latest.score(&focus).unwrap_or(MIN_SCORE);

        if current >= rubric.target() {
            debug!(from = %focus, to = %weakest, "Focus dimension met target");
            state.focus_on(&weakest);
            return Ok(self.emit(state, weakest, CoachingKind::Ask, true));
        }

        let previous = memory.previous_scores().and_then(|s| s.score(&focus));
        let kind = match previous {
            Some(old) if current <= old => {
                state.stalled_revisions += 1;
                if state.interventions_shown.insert(focus.clone()) {
                    debug!(dimension = %focus, old, new = current, "Focus dimension stuck");
                    CoachingKind::ModelExample
                } else {
                    CoachingKind::Ask
                }
            }
            _ => {
                state.stalled_revisions = 0;
                CoachingKind::Ask
            }
        };

        Ok(self.emit(state, focus, kind, false))
    }

    /// Another question on the current focus without re-scoring.
    pub fn skip_question(&self, state: &mut PolicyState) -> Result<Advancement, TutorError> {
        if state.coaching_turns >= self.max_coaching_turns {
            return Ok(Advancement::Reflect(SessionOutcome::TurnLimit));
        }
        let focus = state.focus.clone().ok_or(TutorError::NotYetScored)?;
        Ok(self.emit(state, focus, CoachingKind::Ask, false))
    }

    /// Leave the coaching loop at the student's request.
    ///
    /// Refused until the student has seen `min_turns_before_finish`
    /// coaching turns.
    pub fn finish_early(&self, state: &PolicyState) -> Result<Advancement, TutorError> {
        if state.coaching_turns < self.min_turns_before_finish {
            return Err(TutorError::CoachingTooShort {
                turns: state.coaching_turns,
                minimum: self.min_turns_before_finish,
            });
        }
        Ok(Advancement::Reflect(SessionOutcome::FinishedEarly))
    }

    fn emit(
        &self,
        state: &mut PolicyState,
        dimension: String,
        kind: CoachingKind,
        switched: bool,
    ) -> Advancement {
        state.coaching_turns += 1;
        Advancement::Coach {
            dimension,
            kind,
            switched,
        }
    }
}
