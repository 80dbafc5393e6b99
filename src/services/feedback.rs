//! Deterministic feedback text built from recorded scores.
//!
//! Everything here is plain formatting over session memory; openers and
//! headings come from the phrase chooser so callers control the variety.

use crate::domain::models::{Rubric, ScoreSet, SessionMemory};

/// Characters of each essay quoted in the celebration message.
pub const EXCERPT_CHARS: usize = 300;

/// Feedback attached to a `ReviseResult` turn.
///
/// Lists every dimension whose score moved, in rubric order.
pub fn revision_feedback(rubric: &Rubric, old: &ScoreSet, new: &ScoreSet, opener: &str) -> String {
    let moved: Vec<String> = new
        .iter()
        .filter_map(|entry| {
            let before = old.score(&entry.dimension)?;
            (before != entry.score).then(|| {
                format!(
                    "- {}: {} -> {}",
                    rubric.display_name(&entry.dimension),
                    before,
                    entry.score
                )
            })
        })
        .collect();

    if moved.is_empty() {
        format!("{opener}\nNo scores changed with this revision.")
    } else {
        format!("{opener}\n{}", moved.join("\n"))
    }
}

/// End-of-loop message comparing the first and latest versions.
pub fn celebration_message(rubric: &Rubric, memory: &SessionMemory, heading: &str) -> String {
    let growth: Vec<String> = memory
        .score_changes()
        .into_iter()
        .filter(|change| change.improved())
        .map(|change| {
            format!(
                "- {} went from {} to {}",
                rubric.display_name(&change.dimension),
                change.old_score,
                change.new_score
            )
        })
        .collect();

    let mut message = format!("{heading}\n\n");
    if growth.is_empty() {
        message.push_str("Your scores held steady across the rubric.\n\n");
    } else {
        message.push_str("Your growth:\n");
        message.push_str(&growth.join("\n"));
        message.push_str("\n\n");
    }

    message.push_str("Where you started:\n> ");
    message.push_str(&excerpt(memory.initial_essay().unwrap_or_default(), EXCERPT_CHARS));
    message.push_str("\n\nWhere you are now:\n> ");
    message.push_str(&excerpt(memory.latest_essay().unwrap_or_default(), EXCERPT_CHARS));
    message.push_str("\n\nLet's take a moment to reflect on what you discovered.");
    message
}

/// One-line summary handed to the reflection follow-up.
pub fn session_summary(rubric: &Rubric, memory: &SessionMemory) -> String {
    let scores: Vec<String> = rubric
        .dimensions()
        .iter()
        .map(|dimension| {
            let initial = score_label(memory.initial_scores(), &dimension.key);
            let latest = score_label(memory.latest_scores(), &dimension.key);
            format!("{}: {initial} -> {latest}", dimension.name)
        })
        .collect();

    format!(
        "Session: {} revision(s). Scores: {}",
        memory.revision_count(),
        scores.join("; ")
    )
}

fn score_label(scores: Option<&ScoreSet>, key: &str) -> String {
    scores
        .and_then(|s| s.score(key))
        .map_or_else(|| "?".to_string(), |score| score.to_string())
}

/// First `limit` characters of `text`, with an ellipsis when cut.
pub fn excerpt(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
