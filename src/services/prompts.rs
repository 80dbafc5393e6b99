//! Instruction templates sent to the text-completion service.

use crate::domain::models::{Passage, Rubric, RubricDimension, MAX_SCORE};

/// System instructions for scoring an essay against `rubric`.
pub fn scoring_system(rubric: &Rubric) -> String {
    let format_lines: Vec<String> = rubric
        .keys()
        .map(|key| format!("  \"{key}\": {{\"score\": <int>, \"rationale\": \"<string>\"}}"))
        .collect();

    format!(
        "You assess short argumentative essays written in response to a reading passage.\n\
         Score every dimension below on a 1-{MAX_SCORE} scale using its anchors.\n\
         \n\
         RUBRIC:{anchors}\n\
         \n\
         Guidelines:\n\
         - Score honestly. A {target} means the standard is met; {MAX_SCORE} is uncommon.\n\
         - Give a one or two sentence rationale per dimension.\n\
         - Off-topic, copied or nonsensical responses score 1 everywhere.\n\
         \n\
         Reply with a single JSON object and nothing else:\n\
         {{\n{fields}\n}}",
        anchors = rubric.render_anchors(),
        target = rubric.target(),
        fields = format_lines.join(",\n"),
    )
}

/// User message carrying the passage and the essay to score.
pub fn scoring_user(passage: &Passage, essay: &str) -> String {
    format!(
        "PASSAGE ({title}):\n{text}\n\nWRITING PROMPT:\n{prompt}\n\nSTUDENT RESPONSE:\n{essay}\n\n\
         Score this response. Return only JSON.",
        title = passage.title,
        text = passage.text,
        prompt = passage.writing_prompt,
    )
}

/// System instructions for one Socratic question on a dimension.
pub fn coaching_system(
    dimension: &RubricDimension,
    current_score: u8,
    target: u8,
    rationale: &str,
    essay: &str,
    passage: &str,
    writing_prompt: &str,
) -> String {
    format!(
        "You coach a student on one aspect of their writing by asking questions, never by \
         rewriting their text.\n\
         \n\
         Focus: {name} ({description})\n\
         Current score: {current_score}/{MAX_SCORE}, goal: {target}/{MAX_SCORE}\n\
         Assessor's note: {rationale}\n\
         \n\
         Writing prompt: {writing_prompt}\n\
         Passage:\n{passage}\n\
         \n\
         Student essay:\n{essay}\n\
         \n\
         Quote or point to a specific part of the essay and ask one open question that would \
         help the student see how to move toward the next level. Keep it under 80 words.",
        name = dimension.name,
        description = dimension.description,
    )
}

/// User message for a coaching question, building on the student's answer
/// to the previous one when there is one.
pub fn coaching_user(student_response: Option<&str>) -> String {
    match student_response {
        Some(answer) => format!(
            "The student answered your last question:\n{answer}\n\n\
             Ask one follow-up question that builds on their answer."
        ),
        None => "Ask your coaching question now.".to_string(),
    }
}

/// System instructions for a before/after worked example.
pub fn model_example_system(dimension: &RubricDimension, current_score: u8, rationale: &str) -> String {
    let next_level = current_score.saturating_add(1).min(MAX_SCORE);
    format!(
        "A student is stuck on {name} ({description}) at {current_score}/{MAX_SCORE}.\n\
         Assessor's note: {rationale}\n\
         \n\
         Write a short before/after example on an unrelated topic. The BEFORE sentence should \
         read like level {current_score} (\"{before}\") and the AFTER like level {next_level} \
         (\"{after}\"). Follow it with one sentence naming what changed, then ask the student \
         to try the same move in their essay. Do not mention the student's topic.",
        name = dimension.name,
        description = dimension.description,
        before = dimension.level(current_score).unwrap_or_default(),
        after = dimension.level(next_level).unwrap_or_default(),
    )
}

/// System instructions for replying to a reflection answer.
pub fn reflection_system(question: &str, guidance: &str, summary: &str, final_turn: bool) -> String {
    let closing = if final_turn {
        "\nThis is the last reflection turn; close the session warmly."
    } else {
        ""
    };
    format!(
        "You are wrapping up a writing session with a student.\n\
         Question asked: {question}\n\
         {guidance}{closing}\n\
         \n\
         CONTEXT: {summary}"
    )
}
