//! Shared stubs for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use socratic_tutor::domain::errors::ScoringUnavailable;
use socratic_tutor::domain::models::{ScoreSet, SubmissionRules};
use socratic_tutor::domain::ports::{
    CoachingRequest, CoachingTextGenerator, CompletionError, PhraseCategory, PhraseChooser, Scorer,
    ScoringRequest,
};
use socratic_tutor::TutorEngine;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays scripted score rows in rubric order.
pub struct ScriptedScorer {
    rows: Mutex<VecDeque<Result<Vec<u8>, ScoringUnavailable>>>,
}

impl ScriptedScorer {
    pub fn new(rows: Vec<Result<Vec<u8>, ScoringUnavailable>>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows.into()),
        })
    }

    pub fn remaining(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl Scorer for ScriptedScorer {
    async fn score(&self, request: ScoringRequest<'_>) -> Result<ScoreSet, ScoringUnavailable> {
        let row = self
            .rows
            .lock()
            .unwrap()
            .pop_front()
            .expect("scorer called more often than scripted")?;
        Ok(ScoreSet::from_scores(request.rubric, request.rubric.keys().zip(row)).unwrap())
    }
}

/// Echoes the request kind and records every request it saw.
#[derive(Default)]
pub struct RecordingCoach {
    pub requests: Mutex<Vec<CoachingRequest>>,
}

#[async_trait]
impl CoachingTextGenerator for RecordingCoach {
    async fn generate(&self, request: &CoachingRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(format!("coach {}", request.kind()))
    }
}

/// Returns the category name in brackets.
pub struct LabelPhrases;

impl PhraseChooser for LabelPhrases {
    fn choose(&self, category: PhraseCategory) -> String {
        format!("[{category:?}]")
    }
}

pub fn rows(rows: &[[u8; 5]]) -> Vec<Result<Vec<u8>, ScoringUnavailable>> {
    rows.iter().map(|row| Ok(row.to_vec())).collect()
}

pub fn engine(scorer: Arc<ScriptedScorer>) -> (TutorEngine, Arc<RecordingCoach>) {
    let coach = Arc::new(RecordingCoach::default());
    let engine = TutorEngine::new(scorer, coach.clone(), Arc::new(LabelPhrases))
        .with_rules(SubmissionRules::new(2));
    (engine, coach)
}

/// Distinct essay text for the n-th submission.
pub fn draft(n: usize) -> String {
    format!("Draft number {n} of my argument.")
}
