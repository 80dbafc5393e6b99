//! End-to-end coaching loop scenarios driven through the engine.

mod common;

use common::{draft, engine, rows, ScriptedScorer};
use socratic_tutor::domain::errors::ScoringUnavailable;
use socratic_tutor::domain::models::{DialogueTurn, Session, SessionOutcome, SessionPhase};
use socratic_tutor::domain::ports::CoachingRequest;
use socratic_tutor::{ReplyKind, TutorError};

#[tokio::test]
async fn test_all_at_target_on_first_try_goes_straight_to_reflect() {
    let (engine, coach) = engine(ScriptedScorer::new(rows(&[[3, 3, 3, 3, 3]])));
    let mut session = Session::new();

    let reply = engine.submit_essay(&mut session, &draft(1)).await.unwrap();

    assert_eq!(reply.phase, SessionPhase::Reflect);
    assert_eq!(reply.kind, ReplyKind::Celebration);
    assert_eq!(reply.message, "[FirstTry]");
    assert!(reply.next_prompt.is_some());
    assert_eq!(session.outcome(), Some(SessionOutcome::FirstTry));
    assert_eq!(session.coaching_turns(), 0);
    assert!(session.memory.dialogue().is_empty());
    assert!(coach.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_focus_starts_on_lowest_dimension() {
    let (engine, _) = engine(ScriptedScorer::new(rows(&[[1, 2, 3, 3, 3]])));
    let mut session = Session::new();

    let reply = engine.submit_essay(&mut session, &draft(1)).await.unwrap();

    assert_eq!(reply.kind, ReplyKind::Question);
    assert_eq!(reply.focus.as_deref(), Some("claim_clarity"));
    assert_eq!(session.focus(), Some("claim_clarity"));
    assert_eq!(session.coaching_turns(), 1);
}

#[tokio::test]
async fn test_improvement_below_target_asks_again() {
    let (engine, _) = engine(ScriptedScorer::new(rows(&[
        [1, 2, 3, 3, 3],
        [2, 2, 3, 3, 3],
    ])));
    let mut session = Session::new();
    engine.submit_essay(&mut session, &draft(1)).await.unwrap();

    let reply = engine.submit_revision(&mut session, &draft(2)).await.unwrap();

    assert_eq!(reply.kind, ReplyKind::Question);
    assert_eq!(reply.focus.as_deref(), Some("claim_clarity"));
    assert!(session.policy.interventions_shown.is_empty());
    assert_eq!(session.policy.stalled_revisions, 0);
}

#[tokio::test]
async fn test_flat_revision_triggers_one_model_example() {
    let (engine, coach) = engine(ScriptedScorer::new(rows(&[
        [1, 2, 3, 3, 3],
        [2, 2, 3, 3, 3],
        [2, 2, 3, 3, 3],
    ])));
    let mut session = Session::new();
    engine.submit_essay(&mut session, &draft(1)).await.unwrap();
    engine.submit_revision(&mut session, &draft(2)).await.unwrap();

    let reply = engine.submit_revision(&mut session, &draft(3)).await.unwrap();

    assert_eq!(reply.kind, ReplyKind::ModelExample);
    assert_eq!(reply.message, "coach model_example");
    assert!(session.policy.interventions_shown.contains("claim_clarity"));
    assert_eq!(session.coaching_turns(), 3);
    assert!(matches!(
        session.memory.dialogue().last(),
        Some(DialogueTurn::ModelExample { dimension, .. }) if dimension == "claim_clarity"
    ));
    assert_eq!(coach.requests.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_model_example_is_not_repeated_while_still_stuck() {
    let (engine, _) = engine(ScriptedScorer::new(rows(&[
        [1, 2, 3, 3, 3],
        [1, 2, 3, 3, 3],
        [1, 2, 3, 3, 3],
    ])));
    let mut session = Session::new();
    engine.submit_essay(&mut session, &draft(1)).await.unwrap();

    let stuck = engine.submit_revision(&mut session, &draft(2)).await.unwrap();
    assert_eq!(stuck.kind, ReplyKind::ModelExample);

    let still_stuck = engine.submit_revision(&mut session, &draft(3)).await.unwrap();
    assert_eq!(still_stuck.kind, ReplyKind::Question);
    assert_eq!(still_stuck.focus.as_deref(), Some("claim_clarity"));
    assert_eq!(session.policy.stalled_revisions, 2);
    assert_eq!(session.coaching_turns(), 3);
}

#[tokio::test]
async fn test_reaching_target_switches_focus_with_fresh_flag() {
    let (engine, _) = engine(ScriptedScorer::new(rows(&[
        [1, 2, 3, 3, 3],
        [1, 2, 3, 3, 3],
        [3, 2, 3, 3, 3],
        [3, 2, 3, 3, 3],
    ])));
    let mut session = Session::new();
    engine.submit_essay(&mut session, &draft(1)).await.unwrap();
    engine.submit_revision(&mut session, &draft(2)).await.unwrap();

    let switched = engine.submit_revision(&mut session, &draft(3)).await.unwrap();
    assert_eq!(switched.kind, ReplyKind::Question);
    assert_eq!(switched.focus.as_deref(), Some("evidence_use"));
    assert!(!session.policy.interventions_shown.contains("evidence_use"));
    assert_eq!(session.policy.stalled_revisions, 0);

    // The new focus gets its own one-time example.
    let stuck = engine.submit_revision(&mut session, &draft(4)).await.unwrap();
    assert_eq!(stuck.kind, ReplyKind::ModelExample);
    assert_eq!(stuck.focus.as_deref(), Some("evidence_use"));
}

#[tokio::test]
async fn test_dimension_dropping_back_below_target_is_revisited() {
    let (engine, _) = engine(ScriptedScorer::new(rows(&[
        [1, 3, 2, 3, 3],
        [3, 3, 2, 3, 3],
        [2, 3, 3, 3, 3],
    ])));
    let mut session = Session::new();
    engine.submit_essay(&mut session, &draft(1)).await.unwrap();

    let second = engine.submit_revision(&mut session, &draft(2)).await.unwrap();
    assert_eq!(second.focus.as_deref(), Some("reasoning_depth"));

    let third = engine.submit_revision(&mut session, &draft(3)).await.unwrap();
    assert_eq!(third.focus.as_deref(), Some("claim_clarity"));
    assert_eq!(third.kind, ReplyKind::Question);
}

#[tokio::test]
async fn test_turn_limit_forces_reflection() {
    let mut script = vec![[1, 1, 1, 1, 1]; 15];
    script.push([1, 1, 1, 1, 1]);
    let (engine, _) = engine(ScriptedScorer::new(rows(&script)));
    let mut session = Session::new();

    engine.submit_essay(&mut session, &draft(0)).await.unwrap();
    for n in 1..15 {
        let reply = engine.submit_revision(&mut session, &draft(n)).await.unwrap();
        assert_eq!(reply.phase, SessionPhase::Coaching, "revision {n}");
    }
    assert_eq!(session.coaching_turns(), 15);

    let reply = engine.submit_revision(&mut session, &draft(15)).await.unwrap();
    assert_eq!(reply.phase, SessionPhase::Reflect);
    assert_eq!(reply.kind, ReplyKind::Celebration);
    assert!(reply.message.starts_with("[TurnLimit]"));
    assert_eq!(session.outcome(), Some(SessionOutcome::TurnLimit));
    assert!(!session.outcome().unwrap().is_success());
    assert_eq!(session.coaching_turns(), 15);
}

#[tokio::test]
async fn test_targets_met_after_revisions_celebrates_growth() {
    let (engine, _) = engine(ScriptedScorer::new(rows(&[
        [2, 3, 3, 3, 3],
        [3, 3, 3, 3, 3],
    ])));
    let mut session = Session::new();
    engine.submit_essay(&mut session, &draft(1)).await.unwrap();

    let reply = engine.submit_revision(&mut session, &draft(2)).await.unwrap();

    assert_eq!(reply.kind, ReplyKind::Celebration);
    assert_eq!(session.outcome(), Some(SessionOutcome::TargetsMet));
    assert!(reply.message.contains("Claim Clarity went from 2 to 3"));
    assert!(reply.feedback.unwrap().contains("Claim Clarity: 2 -> 3"));
}

#[tokio::test]
async fn test_full_session_through_reflection_to_done() {
    let (engine, coach) = engine(ScriptedScorer::new(rows(&[
        [2, 3, 3, 3, 3],
        [3, 3, 3, 3, 3],
    ])));
    let mut session = Session::new();
    engine.submit_essay(&mut session, &draft(1)).await.unwrap();
    engine.submit_revision(&mut session, &draft(2)).await.unwrap();

    let first = engine.answer_reflection(&mut session, "Finding evidence").await.unwrap();
    assert_eq!(first.kind, ReplyKind::ReflectionFollowup);
    assert!(first.next_prompt.is_some());

    engine.answer_reflection(&mut session, "Asking why").await.unwrap();
    let last = engine.answer_reflection(&mut session, "Use more quotes").await.unwrap();
    assert_eq!(last.kind, ReplyKind::Closing);
    assert_eq!(last.phase, SessionPhase::Done);
    assert!(last.message.ends_with(engine.closing_message()));
    assert_eq!(session.memory.reflections().len(), 3);

    let again = engine.answer_reflection(&mut session, "anything").await.unwrap();
    assert_eq!(again.phase, SessionPhase::Done);
    assert_eq!(session.memory.reflections().len(), 3);

    let followups = coach
        .requests
        .lock()
        .unwrap()
        .iter()
        .filter(|request| request.kind() == "reflection_followup")
        .count();
    assert_eq!(followups, 3);

    engine.start_over(&mut session);
    assert_eq!(session.phase(), SessionPhase::Intake);
    assert!(session.memory.versions().is_empty());
}

#[tokio::test]
async fn test_scoring_outage_mid_loop_allows_retry() {
    let scorer = ScriptedScorer::new(vec![
        Ok(vec![1, 2, 3, 3, 3]),
        Err(ScoringUnavailable("503".into())),
        Ok(vec![2, 2, 3, 3, 3]),
    ]);
    let (engine, _) = engine(scorer.clone());
    let mut session = Session::new();
    engine.submit_essay(&mut session, &draft(1)).await.unwrap();
    let before = session.clone();

    let err = engine.submit_revision(&mut session, &draft(2)).await.unwrap_err();
    assert!(matches!(err, TutorError::ScoringUnavailable(_)));
    assert_eq!(session, before);

    engine.submit_revision(&mut session, &draft(2)).await.unwrap();
    assert_eq!(session.memory.versions().len(), 2);
    assert_eq!(scorer.remaining(), 0);
}

#[tokio::test]
async fn test_unchanged_revision_is_rejected() {
    let (engine, _) = engine(ScriptedScorer::new(rows(&[[1, 2, 3, 3, 3]])));
    let mut session = Session::new();
    engine.submit_essay(&mut session, &draft(1)).await.unwrap();

    let err = engine
        .submit_revision(&mut session, &format!("  {}  ", draft(1)))
        .await
        .unwrap_err();
    assert_eq!(err, TutorError::UnchangedRevision);
    assert_eq!(session.memory.versions().len(), 1);
}

#[tokio::test]
async fn test_answering_questions_then_finishing_early() {
    let (engine, coach) = engine(ScriptedScorer::new(rows(&[[1, 2, 3, 3, 3]])));
    let mut session = Session::new();
    engine.submit_essay(&mut session, &draft(1)).await.unwrap();

    let err = engine.finish_coaching(&mut session).await.unwrap_err();
    assert!(matches!(err, TutorError::CoachingTooShort { turns: 1, .. }));

    let reply = engine
        .respond_to_question(&mut session, "My claim is that towns should keep libraries.")
        .await
        .unwrap();
    assert_eq!(reply.kind, ReplyKind::Question);
    assert_eq!(reply.focus.as_deref(), Some("claim_clarity"));
    {
        let requests = coach.requests.lock().unwrap();
        assert!(matches!(
            requests.last(),
            Some(CoachingRequest::Question { student_response: Some(answer), .. })
                if answer == "My claim is that towns should keep libraries."
        ));
    }

    let reply = engine.finish_coaching(&mut session).await.unwrap();
    assert_eq!(reply.phase, SessionPhase::Reflect);
    assert_eq!(reply.kind, ReplyKind::Celebration);
    assert!(reply.message.starts_with("[EarlyFinish]"));
    assert_eq!(session.outcome(), Some(SessionOutcome::FinishedEarly));
    assert_eq!(session.memory.versions().len(), 1);
    assert_eq!(
        session
            .memory
            .dialogue()
            .iter()
            .filter(|turn| turn.is_student())
            .count(),
        1
    );
}
