//! Tutoring session domain model.
//!
//! A session walks through `Intake -> Coaching -> Reflect -> Done`. It owns
//! the session memory and the advancement policy's per-session state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use super::memory::SessionMemory;
use crate::domain::errors::TutorError;

/// Phase of the tutoring session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Waiting for the first essay
    #[default]
    Intake,
    /// Coach / revise loop on the focus dimension
    Coaching,
    /// Closing reflection dialogue
    Reflect,
    /// Terminal
    Done,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Coaching => "coaching",
            Self::Reflect => "reflect",
            Self::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Valid transitions from this phase.
    pub fn valid_transitions(&self) -> &'static [SessionPhase] {
        match self {
            Self::Intake => &[Self::Coaching, Self::Reflect],
            Self::Coaching => &[Self::Coaching, Self::Reflect],
            Self::Reflect => &[Self::Reflect, Self::Done],
            Self::Done => &[],
        }
    }

    pub fn can_transition_to(&self, next: Self) -> bool {
        self.valid_transitions().contains(&next)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the coaching loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Every dimension met target on the first submission
    FirstTry,
    /// Every dimension met target after revising
    TargetsMet,
    /// Coaching-turn ceiling reached with dimensions still below target
    TurnLimit,
    /// Student ended coaching with dimensions still below target
    FinishedEarly,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstTry => "first_try",
            Self::TargetsMet => "targets_met",
            Self::TurnLimit => "turn_limit",
            Self::FinishedEarly => "finished_early",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::FirstTry | Self::TargetsMet)
    }
}

/// Per-session state carried by the advancement policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyState {
    /// Dimension currently being coached
    pub focus: Option<String>,

    /// Dimensions that already received a worked example during their
    /// current visit as focus
    pub interventions_shown: BTreeSet<String>,

    /// Ask and model-example turns issued so far
    pub coaching_turns: u32,

    /// Consecutive revisions that did not raise the focus score
    pub stalled_revisions: u32,
}

impl PolicyState {
    /// Make `dimension` the focus with a clean intervention flag.
    pub fn focus_on(&mut self, dimension: &str) {
        self.interventions_shown.remove(dimension);
        self.stalled_revisions = 0;
        self.focus = Some(dimension.to_string());
    }
}

/// A single student's tutoring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_update_time: DateTime<Utc>,
    phase: SessionPhase,
    pub memory: SessionMemory,
    pub policy: PolicyState,
    reflection_index: usize,
    outcome: Option<SessionOutcome>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_update_time: now,
            phase: SessionPhase::Intake,
            memory: SessionMemory::new(),
            policy: PolicyState::default(),
            reflection_index: 0,
            outcome: None,
        }
    }

    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub const fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub const fn reflection_index(&self) -> usize {
        self.reflection_index
    }

    pub fn focus(&self) -> Option<&str> {
        self.policy.focus.as_deref()
    }

    pub const fn coaching_turns(&self) -> u32 {
        self.policy.coaching_turns
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Fail unless the session is in `expected`.
    pub fn expect_phase(&self, expected: SessionPhase) -> Result<(), TutorError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(TutorError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Move to `next`, rejecting transitions the phase graph does not allow.
    pub fn transition_to(&mut self, next: SessionPhase) -> Result<(), TutorError> {
        if !self.phase.can_transition_to(next) {
            return Err(TutorError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        self.touch();
        Ok(())
    }

    /// Enter the reflection phase with the given outcome.
    pub fn begin_reflection(&mut self, outcome: SessionOutcome) -> Result<(), TutorError> {
        self.transition_to(SessionPhase::Reflect)?;
        self.outcome = Some(outcome);
        self.reflection_index = 0;
        Ok(())
    }

    /// Record that one more reflection prompt has been answered.
    pub fn advance_reflection(&mut self) -> usize {
        self.reflection_index += 1;
        self.touch();
        self.reflection_index
    }

    /// Stamp the session as updated now.
    pub fn touch(&mut self) {
        self.last_update_time = Utc::now();
    }
}
