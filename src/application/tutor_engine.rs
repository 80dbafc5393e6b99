//! Tutoring session engine.
//!
//! Turns student actions into session transitions: scoring essays, asking
//! coaching questions, taking answers, and running the closing reflection.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::errors::{TutorError, TutorResult};
use crate::domain::models::{
    CoachingKind, Config, DialogueTurn, Passage, ReflectionExchange, Rubric, ScoreSet, Session,
    SessionOutcome, SessionPhase, SubmissionRules, MIN_SCORE,
};
use crate::domain::ports::{
    CoachingRequest, CoachingTextGenerator, PhraseCategory, PhraseChooser, Scorer, ScoringRequest,
};
use crate::services::advancement_policy::{Advancement, AdvancementPolicy};
use crate::services::feedback;
use crate::services::reflection_sequencer::ReflectionSequencer;

/// What kind of message a reply carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Question,
    ModelExample,
    Celebration,
    ReflectionFollowup,
    Closing,
}

/// Result of one student action, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorReply {
    /// Phase after the action
    pub phase: SessionPhase,
    pub kind: ReplyKind,
    /// Main text shown to the student
    pub message: String,
    /// Scores of the version just recorded, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreSet>,
    /// Score movement since the previous version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    /// Focus dimension key while coaching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    /// Reflection question to answer next
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_prompt: Option<String>,
}

impl TutorReply {
    fn new(phase: SessionPhase, kind: ReplyKind, message: String) -> Self {
        Self {
            phase,
            kind,
            message,
            scores: None,
            feedback: None,
            focus: None,
            next_prompt: None,
        }
    }
}

/// Drives a [`Session`] through intake, coaching, reflection and done.
///
/// The engine owns no session state; every operation takes the session by
/// `&mut` reference. Operations that call the scorer work on a draft copy
/// and only commit it once the whole step succeeded, so a failed scoring
/// call leaves the session exactly as it was and the student can resubmit.
///
/// # Examples
///
/// ```no_run
/// use socratic_tutor::application::TutorEngine;
/// use socratic_tutor::domain::models::Session;
/// use socratic_tutor::domain::ports::{CoachingTextGenerator, PhraseChooser, Scorer};
/// use std::sync::Arc;
///
/// async fn run(
///     scorer: Arc<dyn Scorer>,
///     coach: Arc<dyn CoachingTextGenerator>,
///     phrases: Arc<dyn PhraseChooser>,
///     essay: &str,
/// ) -> anyhow::Result<()> {
///     let engine = TutorEngine::new(scorer, coach, phrases);
///     let mut session = Session::new();
///     let reply = engine.submit_essay(&mut session, essay).await?;
///     println!("{}", reply.message);
///     Ok(())
/// }
/// ```
pub struct TutorEngine {
    scorer: Arc<dyn Scorer>,
    coach: Arc<dyn CoachingTextGenerator>,
    phrases: Arc<dyn PhraseChooser>,
    rubric: Rubric,
    passage: Passage,
    policy: AdvancementPolicy,
    reflection: ReflectionSequencer,
    rules: SubmissionRules,
}

impl TutorEngine {
    /// Create an engine with the default rubric, passage and limits.
    pub fn new(
        scorer: Arc<dyn Scorer>,
        coach: Arc<dyn CoachingTextGenerator>,
        phrases: Arc<dyn PhraseChooser>,
    ) -> Self {
        Self {
            scorer,
            coach,
            phrases,
            rubric: Rubric::default(),
            passage: Passage::default(),
            policy: AdvancementPolicy::default(),
            reflection: ReflectionSequencer::default(),
            rules: SubmissionRules::default(),
        }
    }

    /// Create an engine from loaded configuration.
    pub fn from_config(
        scorer: Arc<dyn Scorer>,
        coach: Arc<dyn CoachingTextGenerator>,
        phrases: Arc<dyn PhraseChooser>,
        config: &Config,
    ) -> Self {
        Self::new(scorer, coach, phrases)
            .with_rubric(config.rubric.clone())
            .with_passage(config.passage.clone())
            .with_policy(
                AdvancementPolicy::new(config.tutor.max_coaching_turns)
                    .with_min_turns_before_finish(config.tutor.min_turns_before_finish),
            )
            .with_reflection(ReflectionSequencer::from_config(&config.reflection))
            .with_rules(SubmissionRules::new(config.tutor.min_words))
    }

    pub fn with_rubric(mut self, rubric: Rubric) -> Self {
        self.rubric = rubric;
        self
    }

    pub fn with_passage(mut self, passage: Passage) -> Self {
        self.passage = passage;
        self
    }

    pub fn with_policy(mut self, policy: AdvancementPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_reflection(mut self, reflection: ReflectionSequencer) -> Self {
        self.reflection = reflection;
        self
    }

    pub fn with_rules(mut self, rules: SubmissionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    pub fn rules(&self) -> SubmissionRules {
        self.rules
    }

    pub fn max_coaching_turns(&self) -> u32 {
        self.policy.max_coaching_turns()
    }

    pub fn min_turns_before_finish(&self) -> u32 {
        self.policy.min_turns_before_finish()
    }

    pub fn closing_message(&self) -> &str {
        self.reflection.closing_message()
    }

    /// Apologetic text to show after a failed scoring call.
    pub fn apology(&self) -> String {
        self.phrases.choose(PhraseCategory::Apology)
    }

    /// Score the first essay and open the coaching loop.
    #[instrument(skip(self, session, text), fields(session_id = %session.id))]
    pub async fn submit_essay(&self, session: &mut Session, text: &str) -> TutorResult<TutorReply> {
        session.expect_phase(SessionPhase::Intake)?;
        let essay = self.rules.check_essay(text)?;
        let scores = self.score(essay).await?;

        let mut draft = session.clone();
        draft.memory.record_version(essay, scores);
        let advancement = self
            .policy
            .advance(&mut draft.policy, &draft.memory, &self.rubric)?;

        let reply = self.apply(&mut draft, advancement).await?;
        *session = draft;
        Ok(reply)
    }

    /// Re-score a revision and pick the next coaching turn.
    #[instrument(skip(self, session, text), fields(session_id = %session.id))]
    pub async fn submit_revision(
        &self,
        session: &mut Session,
        text: &str,
    ) -> TutorResult<TutorReply> {
        session.expect_phase(SessionPhase::Coaching)?;
        let current = session.memory.latest_essay().ok_or(TutorError::NotYetScored)?;
        let revision = self.rules.check_revision(text, current)?;
        let scores = self.score(revision).await?;

        let mut draft = session.clone();
        let old_scores = draft
            .memory
            .latest_scores()
            .cloned()
            .ok_or(TutorError::NotYetScored)?;
        draft.memory.record_version(revision, scores.clone());

        let opener = if draft.memory.improved_dimensions().is_empty() {
            self.phrases.choose(PhraseCategory::RevisionFlat)
        } else {
            self.phrases.choose(PhraseCategory::RevisionImproved)
        };
        let feedback = feedback::revision_feedback(&self.rubric, &old_scores, &scores, &opener);
        draft.memory.push_turn(DialogueTurn::ReviseResult {
            old_scores,
            new_scores: scores,
            feedback: feedback.clone(),
        });

        let advancement = self
            .policy
            .advance(&mut draft.policy, &draft.memory, &self.rubric)?;
        let mut reply = self.apply(&mut draft, advancement).await?;
        reply.feedback = Some(feedback);

        *session = draft;
        Ok(reply)
    }

    /// Ask another question on the current focus without re-scoring.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn skip_revision(&self, session: &mut Session) -> TutorResult<TutorReply> {
        session.expect_phase(SessionPhase::Coaching)?;

        let mut draft = session.clone();
        let advancement = self.policy.skip_question(&mut draft.policy)?;
        let reply = self.apply(&mut draft, advancement).await?;

        *session = draft;
        Ok(reply)
    }

    /// Record the student's answer to the last coaching question and ask a
    /// follow-up on the same focus.
    ///
    /// The follow-up counts as a coaching turn, so the turn ceiling can end
    /// the loop here just like after a revision.
    #[instrument(skip(self, session, answer), fields(session_id = %session.id))]
    pub async fn respond_to_question(
        &self,
        session: &mut Session,
        answer: &str,
    ) -> TutorResult<TutorReply> {
        session.expect_phase(SessionPhase::Coaching)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(TutorError::EmptySubmission {
                words: 0,
                minimum: 1,
            });
        }

        let mut draft = session.clone();
        let dimension = draft
            .focus()
            .map(str::to_string)
            .ok_or(TutorError::NotYetScored)?;
        draft.memory.push_turn(DialogueTurn::StudentResponse {
            dimension,
            response: answer.to_string(),
        });

        let advancement = self.policy.skip_question(&mut draft.policy)?;
        let reply = self.apply(&mut draft, advancement).await?;

        *session = draft;
        Ok(reply)
    }

    /// End the coaching loop at the student's request and start reflecting.
    ///
    /// Refused with [`TutorError::CoachingTooShort`] until the student has
    /// seen the configured minimum of coaching turns.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn finish_coaching(&self, session: &mut Session) -> TutorResult<TutorReply> {
        session.expect_phase(SessionPhase::Coaching)?;

        let mut draft = session.clone();
        let advancement = self.policy.finish_early(&draft.policy)?;
        let reply = self.apply(&mut draft, advancement).await?;

        *session = draft;
        Ok(reply)
    }

    /// Reply to a reflection answer and move to the next prompt.
    ///
    /// Once the session is done this returns the closing message again
    /// without touching the session.
    #[instrument(skip(self, session, answer), fields(session_id = %session.id))]
    pub async fn answer_reflection(
        &self,
        session: &mut Session,
        answer: &str,
    ) -> TutorResult<TutorReply> {
        if session.is_terminal() {
            return Ok(self.closing_reply());
        }
        session.expect_phase(SessionPhase::Reflect)?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(TutorError::EmptySubmission {
                words: 0,
                minimum: 1,
            });
        }

        let index = session.reflection_index();
        let Some(prompt) = self.reflection.current_prompt(index) else {
            self.transition(session, SessionPhase::Done)?;
            return Ok(self.closing_reply());
        };
        let final_turn = self.reflection.is_final(index);

        let request = CoachingRequest::ReflectionFollowup {
            question: prompt.question.clone(),
            guidance: prompt.followup.clone(),
            answer: answer.to_string(),
            session_summary: feedback::session_summary(&self.rubric, &session.memory),
            final_turn,
        };
        let response = self
            .generate_or(&request, PhraseCategory::FallbackReflection)
            .await;

        session.memory.push_reflection(ReflectionExchange {
            question: prompt.question.clone(),
            answer: answer.to_string(),
            response: response.clone(),
        });
        session.advance_reflection();

        if final_turn {
            self.transition(session, SessionPhase::Done)?;
            let message = format!("{response}\n\n{}", self.reflection.closing_message());
            return Ok(TutorReply::new(SessionPhase::Done, ReplyKind::Closing, message));
        }

        self.transition(session, SessionPhase::Reflect)?;
        let mut reply = TutorReply::new(
            SessionPhase::Reflect,
            ReplyKind::ReflectionFollowup,
            response,
        );
        reply.next_prompt = self.current_reflection_prompt(session).map(str::to_string);
        Ok(reply)
    }

    /// Discard the session and start again from intake.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub fn start_over(&self, session: &mut Session) {
        let previous = session.phase();
        *session = Session::new();
        info!(from = %previous, new_session_id = %session.id, "Session restarted");
    }

    /// Reflection question awaiting an answer, if the session is reflecting.
    pub fn current_reflection_prompt(&self, session: &Session) -> Option<&str> {
        if session.phase() != SessionPhase::Reflect {
            return None;
        }
        self.reflection
            .current_prompt(session.reflection_index())
            .map(|prompt| prompt.question.as_str())
    }

    async fn score(&self, essay: &str) -> TutorResult<ScoreSet> {
        let request = ScoringRequest {
            essay,
            passage: &self.passage,
            rubric: &self.rubric,
        };
        self.scorer.score(request).await.map_err(|e| {
            warn!(error = %e, "Scoring failed, session left unchanged");
            TutorError::from(e)
        })
    }

    async fn apply(&self, session: &mut Session, advancement: Advancement) -> TutorResult<TutorReply> {
        let scores = session.memory.latest_scores().cloned();
        let mut reply = match advancement {
            Advancement::Reflect(outcome) => self.enter_reflection(session, outcome)?,
            Advancement::Coach {
                dimension, kind, ..
            } => self.coach_turn(session, dimension, kind).await?,
        };
        reply.scores = scores;
        Ok(reply)
    }

    fn enter_reflection(
        &self,
        session: &mut Session,
        outcome: SessionOutcome,
    ) -> TutorResult<TutorReply> {
        let from = session.phase();
        session.begin_reflection(outcome)?;
        info!(
            session_id = %session.id,
            from = %from,
            to = %SessionPhase::Reflect,
            outcome = outcome.as_str(),
            revisions = session.memory.revision_count(),
            coaching_turns = session.coaching_turns(),
            "Phase transition"
        );

        let message = match outcome {
            SessionOutcome::FirstTry => self.phrases.choose(PhraseCategory::FirstTry),
            SessionOutcome::TargetsMet => feedback::celebration_message(
                &self.rubric,
                &session.memory,
                &self.phrases.choose(PhraseCategory::Celebration),
            ),
            SessionOutcome::TurnLimit => feedback::celebration_message(
                &self.rubric,
                &session.memory,
                &self.phrases.choose(PhraseCategory::TurnLimit),
            ),
            SessionOutcome::FinishedEarly => feedback::celebration_message(
                &self.rubric,
                &session.memory,
                &self.phrases.choose(PhraseCategory::EarlyFinish),
            ),
        };

        if self.reflection.is_empty() {
            self.transition(session, SessionPhase::Done)?;
            let message = format!("{message}\n\n{}", self.reflection.closing_message());
            return Ok(TutorReply::new(SessionPhase::Done, ReplyKind::Closing, message));
        }

        let mut reply = TutorReply::new(SessionPhase::Reflect, ReplyKind::Celebration, message);
        reply.next_prompt = self.current_reflection_prompt(session).map(str::to_string);
        Ok(reply)
    }

    async fn coach_turn(
        &self,
        session: &mut Session,
        dimension: String,
        kind: CoachingKind,
    ) -> TutorResult<TutorReply> {
        self.transition(session, SessionPhase::Coaching)?;

        let rubric_dimension = self
            .rubric
            .dimension(&dimension)
            .ok_or_else(|| TutorError::UnknownDimension(dimension.clone()))?;
        let scores = session
            .memory
            .latest_scores()
            .ok_or(TutorError::NotYetScored)?;
        let (current_score, rationale) = scores
            .get(&dimension)
            .map_or((MIN_SCORE, String::new()), |entry| {
                (entry.score, entry.rationale.clone())
            });
        let student_response = match session.memory.dialogue().last() {
            Some(DialogueTurn::StudentResponse { response, .. }) => Some(response.clone()),
            _ => None,
        };

        let request = match kind {
            CoachingKind::Ask => CoachingRequest::Question {
                dimension: rubric_dimension.clone(),
                current_score,
                target: self.rubric.target(),
                rationale,
                essay: session.memory.latest_essay().unwrap_or_default().to_string(),
                passage: self.passage.text.clone(),
                writing_prompt: self.passage.writing_prompt.clone(),
                student_response,
            },
            CoachingKind::ModelExample => CoachingRequest::ModelExample {
                dimension: rubric_dimension.clone(),
                current_score,
                rationale,
            },
        };
        let text = self
            .generate_or(&request, PhraseCategory::FallbackQuestion)
            .await;

        let (turn, reply_kind) = match kind {
            CoachingKind::Ask => (
                DialogueTurn::Ask {
                    dimension: dimension.clone(),
                    question: text.clone(),
                },
                ReplyKind::Question,
            ),
            CoachingKind::ModelExample => (
                DialogueTurn::ModelExample {
                    dimension: dimension.clone(),
                    example: text.clone(),
                },
                ReplyKind::ModelExample,
            ),
        };
        session.memory.push_turn(turn);

        let mut reply = TutorReply::new(SessionPhase::Coaching, reply_kind, text);
        reply.focus = Some(dimension);
        Ok(reply)
    }

    async fn generate_or(&self, request: &CoachingRequest, fallback: PhraseCategory) -> String {
        match self.coach.generate(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, kind = request.kind(), "Coaching text unavailable, using fallback");
                self.phrases.choose(fallback)
            }
        }
    }

    fn transition(&self, session: &mut Session, next: SessionPhase) -> TutorResult<()> {
        let from = session.phase();
        session.transition_to(next)?;
        if from != next {
            info!(session_id = %session.id, from = %from, to = %next, "Phase transition");
        }
        Ok(())
    }

    fn closing_reply(&self) -> TutorReply {
        TutorReply::new(
            SessionPhase::Done,
            ReplyKind::Closing,
            self.reflection.closing_message().to_string(),
        )
    }
}
