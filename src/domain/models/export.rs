//! Portable JSON snapshot of a finished (or in-progress) session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dialogue::{DialogueTurn, ReflectionExchange};
use super::score::ScoreSet;
use super::session::{Session, SessionOutcome, SessionPhase};

/// Summary counters included with every export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub revision_count: usize,
    pub coaching_turns: u32,
    pub essay_versions: usize,
    pub reflection_turns: usize,
    pub student_responses: usize,
    pub interventions_shown: Vec<String>,
    /// Mean score of the first version
    pub initial_average: Option<f64>,
    /// Mean score of the latest version
    pub final_average: Option<f64>,
    /// Whether every dimension reached target; `None` while still coaching
    pub succeeded: Option<bool>,
}

/// Session export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub exported_at: DateTime<Utc>,
    pub phase: SessionPhase,
    pub outcome: Option<SessionOutcome>,
    pub final_focus: Option<String>,
    pub essays: Vec<String>,
    pub scores: Vec<ScoreSet>,
    pub dialogue: Vec<DialogueTurn>,
    pub reflections: Vec<ReflectionExchange>,
    pub summary: ExportSummary,
}

impl SessionExport {
    pub fn from_session(session: &Session) -> Self {
        let memory = &session.memory;
        Self {
            session_id: session.id,
            created_at: session.created_at,
            exported_at: Utc::now(),
            phase: session.phase(),
            outcome: session.outcome(),
            final_focus: session.focus().map(str::to_string),
            essays: memory.versions().iter().map(|v| v.text.clone()).collect(),
            scores: memory.versions().iter().map(|v| v.scores.clone()).collect(),
            dialogue: memory.dialogue().to_vec(),
            reflections: memory.reflections().to_vec(),
            summary: ExportSummary {
                revision_count: memory.revision_count(),
                coaching_turns: session.coaching_turns(),
                essay_versions: memory.versions().len(),
                reflection_turns: memory.reflections().len(),
                student_responses: memory.dialogue().iter().filter(|t| t.is_student()).count(),
                initial_average: memory.initial_scores().map(ScoreSet::average),
                final_average: memory.latest_scores().map(ScoreSet::average),
                succeeded: session.outcome().map(|outcome| outcome.is_success()),
                interventions_shown: session
                    .policy
                    .interventions_shown
                    .iter()
                    .cloned()
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Rubric;

    #[test]
    fn test_export_mirrors_session() {
        let rubric = Rubric::value_rubric();
        let mut session = Session::new();
        session
            .memory
            .record_version("original", ScoreSet::uniform(&rubric, 2, ""));
        session
            .memory
            .record_version("revised", ScoreSet::uniform(&rubric, 3, ""));
        session.policy.coaching_turns = 1;
        session.policy.focus_on("claim_clarity");

        let export = SessionExport::from_session(&session);
        assert_eq!(export.session_id, session.id);
        assert_eq!(export.essays, vec!["original", "revised"]);
        assert_eq!(export.scores.len(), 2);
        assert_eq!(export.summary.revision_count, 1);
        assert_eq!(export.summary.coaching_turns, 1);
        assert_eq!(export.summary.essay_versions, 2);
        assert_eq!(export.final_focus.as_deref(), Some("claim_clarity"));
        assert_eq!(export.summary.initial_average, Some(2.0));
        assert_eq!(export.summary.final_average, Some(3.0));
        assert_eq!(export.summary.succeeded, None);
        assert_eq!(export.summary.student_responses, 0);

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["phase"], "intake");
        assert_eq!(json["summary"]["revision_count"], 1);
    }

    #[test]
    fn test_summary_reports_outcome() {
        let rubric = Rubric::value_rubric();
        let mut session = Session::new();
        session
            .memory
            .record_version("original", ScoreSet::uniform(&rubric, 2, ""));
        session.memory.push_turn(DialogueTurn::StudentResponse {
            dimension: "claim_clarity".to_string(),
            response: "My claim is in the last line.".to_string(),
        });
        session
            .begin_reflection(SessionOutcome::FinishedEarly)
            .unwrap();

        let summary = SessionExport::from_session(&session).summary;
        assert_eq!(summary.succeeded, Some(false));
        assert_eq!(summary.student_responses, 1);
        assert_eq!(summary.essay_versions, 1);
    }
}
