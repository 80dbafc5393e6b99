//! Rubric scorer backed by a text-completion service.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{instrument, warn};

use super::prompts;
use crate::domain::errors::ScoringUnavailable;
use crate::domain::models::{word_count, Rubric, ScoreEntry, ScoreSet, MIN_SCORE};
use crate::domain::ports::{CompletionRequest, Scorer, ScoringRequest, TextCompletion};

/// Rationale stored when the reply could not be parsed at all.
pub const SCORING_ERROR_RATIONALE: &str = "Scoring error.";

/// Rationale stored for a dimension the reply left out.
pub const MISSING_DIMENSION_RATIONALE: &str = "Unable to assess.";

pub struct LlmScorer {
    completion: Arc<dyn TextCompletion>,
    max_tokens: u32,
}

impl LlmScorer {
    pub fn new(completion: Arc<dyn TextCompletion>, max_tokens: u32) -> Self {
        Self {
            completion,
            max_tokens,
        }
    }
}

#[async_trait]
impl Scorer for LlmScorer {
    #[instrument(skip_all, fields(words = word_count(request.essay)))]
    async fn score(&self, request: ScoringRequest<'_>) -> Result<ScoreSet, ScoringUnavailable> {
        let completion = CompletionRequest::new(
            prompts::scoring_system(request.rubric),
            prompts::scoring_user(request.passage, request.essay),
            self.max_tokens,
        );

        let raw = self
            .completion
            .complete(completion)
            .await
            .map_err(|e| ScoringUnavailable(e.to_string()))?;

        Ok(parse_score_response(request.rubric, &raw))
    }
}

/// Turn a model reply into a complete score set.
///
/// Missing dimensions score the minimum; a reply that is not a JSON object
/// or carries a score that cannot be read as a number yields the uniform
/// fallback set instead.
pub fn parse_score_response(rubric: &Rubric, raw: &str) -> ScoreSet {
    match parse_entries(rubric, strip_code_fence(raw)) {
        Some(entries) => ScoreSet::from_entries(rubric, entries)
            .unwrap_or_else(|_| ScoreSet::uniform(rubric, MIN_SCORE, SCORING_ERROR_RATIONALE)),
        None => {
            warn!(reply_len = raw.len(), "Unparsable scoring reply, using fallback scores");
            ScoreSet::uniform(rubric, MIN_SCORE, SCORING_ERROR_RATIONALE)
        }
    }
}

fn parse_entries(rubric: &Rubric, json: &str) -> Option<Vec<ScoreEntry>> {
    let value: Value = serde_json::from_str(json).ok()?;
    let object = value.as_object()?;

    rubric
        .keys()
        .map(|key| match object.get(key) {
            None | Some(Value::Null) => Some(ScoreEntry::new(
                key,
                i64::from(MIN_SCORE),
                MISSING_DIMENSION_RATIONALE,
            )),
            Some(entry) => {
                let score = match entry.get("score") {
                    None => i64::from(MIN_SCORE),
                    Some(raw) => coerce_score(raw)?,
                };
                let rationale = entry
                    .get("rationale")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Some(ScoreEntry::new(key, score, rationale))
            }
        })
        .collect()
}

/// Accept integers, floats and numeric strings.
fn coerce_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(truncate))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

/// Remove a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Passage;
    use crate::domain::ports::CompletionError;
    use std::sync::Mutex;

    struct CannedCompletion {
        reply: Result<String, CompletionError>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl TextCompletion for CannedCompletion {
        async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
            self.seen.lock().unwrap().push(request);
            self.reply.clone()
        }
    }

    fn canned(reply: Result<String, CompletionError>) -> Arc<CannedCompletion> {
        Arc::new(CannedCompletion {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    const FULL_REPLY: &str = r#"{
        "claim_clarity": {"score": 2, "rationale": "Vague."},
        "evidence_use": {"score": "3", "rationale": "Cites costs."},
        "reasoning_depth": {"score": 1.0, "rationale": "Restates."},
        "organization": {"score": 9, "rationale": "Clear."},
        "voice_engagement": {"score": 0, "rationale": "Flat."}
    }"#;

    #[test]
    fn test_parse_full_reply_with_coercion() {
        let rubric = Rubric::value_rubric();
        let set = parse_score_response(&rubric, FULL_REPLY);
        assert_eq!(set.score("claim_clarity"), Some(2));
        assert_eq!(set.score("evidence_use"), Some(3));
        assert_eq!(set.score("reasoning_depth"), Some(1));
        assert_eq!(set.score("organization"), Some(4));
        assert_eq!(set.score("voice_engagement"), Some(1));
        assert_eq!(set.get("evidence_use").unwrap().rationale, "Cites costs.");
    }

    #[test]
    fn test_parse_strips_code_fence() {
        let rubric = Rubric::value_rubric();
        let fenced = format!("```json\n{FULL_REPLY}\n```");
        assert_eq!(
            parse_score_response(&rubric, &fenced),
            parse_score_response(&rubric, FULL_REPLY)
        );
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_missing_dimensions_score_minimum() {
        let rubric = Rubric::value_rubric();
        let set = parse_score_response(&rubric, r#"{"claim_clarity": {"score": 3, "rationale": "ok"}}"#);
        assert_eq!(set.len(), rubric.len());
        assert_eq!(set.score("claim_clarity"), Some(3));
        let organization = set.get("organization").unwrap();
        assert_eq!(organization.score, 1);
        assert_eq!(organization.rationale, MISSING_DIMENSION_RATIONALE);
    }

    #[test]
    fn test_malformed_reply_falls_back() {
        let rubric = Rubric::value_rubric();
        for raw in ["not json", "[1, 2]", r#"{"claim_clarity": {"score": "high"}}"#] {
            let set = parse_score_response(&rubric, raw);
            assert_eq!(set, ScoreSet::uniform(&rubric, 1, SCORING_ERROR_RATIONALE));
        }
    }

    #[tokio::test]
    async fn test_scorer_sends_rubric_and_essay() {
        let completion = canned(Ok(FULL_REPLY.to_string()));
        let scorer = LlmScorer::new(completion.clone(), 800);
        let rubric = Rubric::value_rubric();
        let passage = Passage::default();

        let set = scorer
            .score(ScoringRequest {
                essay: "Schools should keep five days.",
                passage: &passage,
                rubric: &rubric,
            })
            .await
            .unwrap();
        assert_eq!(set.score("claim_clarity"), Some(2));

        let seen = completion.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].max_tokens, 800);
        assert!(seen[0].system.contains("voice_engagement"));
        assert!(seen[0].user.contains("Schools should keep five days."));
    }

    #[tokio::test]
    async fn test_transport_failure_is_unavailable() {
        let completion = canned(Err(CompletionError::Transport("connection reset".into())));
        let scorer = LlmScorer::new(completion, 800);
        let rubric = Rubric::value_rubric();
        let passage = Passage::default();

        let err = scorer
            .score(ScoringRequest {
                essay: "text",
                passage: &passage,
                rubric: &rubric,
            })
            .await
            .unwrap_err();
        assert!(err.0.contains("connection reset"));
    }
}
