//! `tutor session`: the interactive tutoring loop.
//!
//! Text is entered as a block of lines ended by an empty line. While
//! coaching, a plain block is a revised essay and a block starting with
//! `/answer` replies to the tutor's question. `/skip` asks for another
//! question without re-scoring and `/finish` moves on to reflection once
//! enough turns have passed. `/history` reprints the dialogue at any time,
//! `/restart` throws the session away and `/quit` leaves.

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::{ReplyKind, TutorEngine, TutorReply};
use crate::cli::output::{create_spinner, truncate};
use crate::cli::types::SessionArgs;
use crate::domain::errors::TutorError;
use crate::domain::models::{
    Config, DialogueTurn, Rubric, ScoreSet, Session, SessionMemory, SessionPhase,
};
use crate::domain::ports::TextCompletion;
use crate::infrastructure::claude::{ClaudeClient, ClaudeClientConfig};
use crate::infrastructure::{RandomPhraseChooser, SessionExporter};
use crate::services::{CoachBudgets, LlmCoach, LlmScorer};

/// Rationales longer than this are cut in the score table.
const RATIONALE_CHARS: usize = 160;

/// Student input recognised between essays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentInput {
    Text(String),
    Answer(String),
    Skip,
    Finish,
    History,
    Restart,
    Quit,
}

impl StudentInput {
    pub fn parse(block: &str) -> Self {
        let trimmed = block.trim();
        if let Some(rest) = trimmed.strip_prefix("/answer") {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return Self::Answer(rest.trim().to_string());
            }
        }
        match trimmed {
            "/skip" => Self::Skip,
            "/finish" => Self::Finish,
            "/history" => Self::History,
            "/restart" => Self::Restart,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Text(block.trim_end().to_string()),
        }
    }
}

/// Read lines until an empty line. `None` once input is exhausted.
pub fn read_block<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        let read = input.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            return Ok((!lines.is_empty()).then(|| lines.join("\n")));
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            if lines.is_empty() {
                continue;
            }
            return Ok(Some(lines.join("\n")));
        }
        lines.push(line.to_string());
    }
}

/// Score table for a reply, coloured against the target.
pub fn score_table(rubric: &Rubric, scores: &ScoreSet) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["DIMENSION", "SCORE", "RATIONALE"]);

    for entry in scores.iter() {
        let color = if entry.score >= rubric.target() {
            Color::Green
        } else {
            Color::Yellow
        };
        table.add_row([
            Cell::new(rubric.display_name(&entry.dimension)),
            Cell::new(format!("{}/4", entry.score)).fg(color),
            Cell::new(truncate(&entry.rationale, RATIONALE_CHARS)),
        ]);
    }
    table
}

/// Human rendering of one engine reply.
pub fn render_reply(rubric: &Rubric, reply: &TutorReply) -> String {
    let mut sections = Vec::new();
    if let Some(scores) = &reply.scores {
        sections.push(score_table(rubric, scores).to_string());
    }
    if let Some(feedback) = &reply.feedback {
        sections.push(feedback.clone());
    }

    let heading = match reply.kind {
        ReplyKind::Question => reply
            .focus
            .as_deref()
            .map(|key| format!("Tutor ({}):", rubric.display_name(key))),
        ReplyKind::ModelExample => Some("Tutor (example):".to_string()),
        ReplyKind::Celebration | ReplyKind::ReflectionFollowup | ReplyKind::Closing => None,
    };
    match heading {
        Some(heading) => sections.push(format!("{}\n{}", style(heading).cyan().bold(), reply.message)),
        None => sections.push(reply.message.clone()),
    }

    if let Some(prompt) = &reply.next_prompt {
        sections.push(format!("{} {prompt}", style("Reflect:").magenta().bold()));
    }
    sections.join("\n\n")
}

/// Coaching dialogue so far, one labelled paragraph per turn.
pub fn render_history(rubric: &Rubric, memory: &SessionMemory) -> String {
    if memory.dialogue().is_empty() {
        return "No coaching dialogue yet.".to_string();
    }
    memory
        .dialogue()
        .iter()
        .map(|turn| {
            let label = match turn {
                DialogueTurn::Ask { dimension, .. } | DialogueTurn::ModelExample { dimension, .. } => {
                    format!("Tutor ({}):", rubric.display_name(dimension))
                }
                DialogueTurn::StudentResponse { .. } => "You:".to_string(),
                DialogueTurn::ReviseResult { .. } => "Revision:".to_string(),
            };
            let label = if turn.is_coaching() {
                style(label).cyan().bold()
            } else if turn.is_student() {
                style(label).green().bold()
            } else {
                style(label).dim()
            };
            format!("{label}\n{}", turn.text())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Drives one session from the terminal.
pub struct SessionRunner<'a, R, W> {
    engine: &'a TutorEngine,
    input: R,
    out: W,
    json: bool,
}

impl<'a, R: BufRead, W: Write> SessionRunner<'a, R, W> {
    pub fn new(engine: &'a TutorEngine, input: R, out: W, json: bool) -> Self {
        Self {
            engine,
            input,
            out,
            json,
        }
    }

    /// Run until the session is done, the student quits, or input ends.
    pub async fn run(&mut self, mut first_essay: Option<String>) -> Result<Session> {
        let mut session = Session::new();
        self.print_intro()?;

        loop {
            let phase = session.phase();
            if phase == SessionPhase::Done {
                break;
            }

            let block = match first_essay.take() {
                Some(essay) => essay,
                None => {
                    self.print_hint(&session)?;
                    match read_block(&mut self.input)? {
                        Some(block) => block,
                        None => break,
                    }
                }
            };

            let result = match (phase, StudentInput::parse(&block)) {
                (_, StudentInput::Quit) => break,
                (_, StudentInput::Restart) => {
                    self.engine.start_over(&mut session);
                    self.print_intro()?;
                    continue;
                }
                (_, StudentInput::History) => {
                    self.print_history(&session)?;
                    continue;
                }
                (SessionPhase::Coaching, StudentInput::Skip) => {
                    self.engine.skip_revision(&mut session).await
                }
                (SessionPhase::Coaching, StudentInput::Finish) => {
                    self.engine.finish_coaching(&mut session).await
                }
                (SessionPhase::Coaching, StudentInput::Answer(text)) => {
                    self.engine.respond_to_question(&mut session, &text).await
                }
                (SessionPhase::Intake, StudentInput::Text(text)) => {
                    let spinner = create_spinner("Scoring your essay...");
                    let result = self.engine.submit_essay(&mut session, &text).await;
                    spinner.finish_and_clear();
                    result
                }
                (SessionPhase::Coaching, StudentInput::Text(text)) => {
                    let spinner = create_spinner("Scoring your revision...");
                    let result = self.engine.submit_revision(&mut session, &text).await;
                    spinner.finish_and_clear();
                    result
                }
                (
                    SessionPhase::Reflect | SessionPhase::Done,
                    StudentInput::Text(text) | StudentInput::Answer(text),
                ) => self.engine.answer_reflection(&mut session, &text).await,
                (_, StudentInput::Skip) => {
                    self.note("Nothing to skip right now.")?;
                    continue;
                }
                (_, StudentInput::Finish) => {
                    self.note("Nothing to finish right now.")?;
                    continue;
                }
                (SessionPhase::Intake, StudentInput::Answer(_)) => {
                    self.note("Write your essay first; there is no question to answer yet.")?;
                    continue;
                }
            };

            match result {
                Ok(reply) => self.print_reply(&reply)?,
                Err(err) => self.print_error(&err)?,
            }
        }

        Ok(session)
    }

    fn print_intro(&mut self) -> Result<()> {
        if self.json {
            return Ok(());
        }
        let passage = self.engine.passage();
        writeln!(
            self.out,
            "{}\n\n{}\n\n{} {}\n",
            style(&passage.title).bold().underlined(),
            passage.text,
            style("Prompt:").bold(),
            passage.writing_prompt
        )?;
        Ok(())
    }

    fn print_hint(&mut self, session: &Session) -> Result<()> {
        if self.json {
            return Ok(());
        }
        let hint = match session.phase() {
            SessionPhase::Intake => format!(
                "Write your response (at least {} words). End with an empty line.",
                self.engine.rules().min_words
            ),
            SessionPhase::Coaching => format!(
                "Turn {}/{}. Paste your revised essay, or /answer <reply>, /skip, /finish \
                 (after {} turns), /history, /restart, /quit. End with an empty line.",
                session.coaching_turns(),
                self.engine.max_coaching_turns(),
                self.engine.min_turns_before_finish()
            ),
            SessionPhase::Reflect | SessionPhase::Done => "Your answer:".to_string(),
        };
        writeln!(self.out, "{}", style(hint).dim())?;
        Ok(())
    }

    fn print_history(&mut self, session: &Session) -> Result<()> {
        if self.json {
            writeln!(self.out, "{}", serde_json::to_string(session.memory.dialogue())?)?;
        } else {
            writeln!(
                self.out,
                "\n{}\n",
                render_history(self.engine.rubric(), &session.memory)
            )?;
        }
        Ok(())
    }

    fn print_reply(&mut self, reply: &TutorReply) -> Result<()> {
        if self.json {
            writeln!(self.out, "{}", serde_json::to_string(reply)?)?;
        } else {
            writeln!(self.out, "\n{}\n", render_reply(self.engine.rubric(), reply))?;
        }
        Ok(())
    }

    fn print_error(&mut self, err: &TutorError) -> Result<()> {
        let message = match err {
            TutorError::ScoringUnavailable(_) => self.engine.apology(),
            other => other.to_string(),
        };
        if self.json {
            let body = serde_json::json!({ "error": message, "retryable": err.is_retryable() });
            writeln!(self.out, "{body}")?;
        } else {
            writeln!(self.out, "{} {message}\n", style("!").yellow().bold())?;
        }
        Ok(())
    }

    fn note(&mut self, message: &str) -> Result<()> {
        if !self.json {
            writeln!(self.out, "{}", style(message).dim())?;
        }
        Ok(())
    }
}

/// Wire the engine to the Claude client from configuration.
pub fn build_engine(config: &Config, seed: Option<u64>) -> Result<TutorEngine> {
    let api_key = config
        .llm
        .resolve_api_key()
        .context("No API key configured: set ANTHROPIC_API_KEY or llm.api_key")?;
    let client = ClaudeClient::new(ClaudeClientConfig::from_config(config, api_key))
        .context("Failed to create Claude client")?;
    let completion: Arc<dyn TextCompletion> = Arc::new(client);

    let scorer = Arc::new(LlmScorer::new(
        Arc::clone(&completion),
        config.llm.scoring_max_tokens,
    ));
    let coach = Arc::new(LlmCoach::new(completion, CoachBudgets::from(&config.llm)));
    let phrases = Arc::new(RandomPhraseChooser::new(seed));

    Ok(TutorEngine::from_config(scorer, coach, phrases, config))
}

pub async fn execute(args: SessionArgs, config: &Config, json: bool) -> Result<()> {
    let first_essay = match &args.essay {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read essay from {}", path.display()))?,
        ),
        None => None,
    };

    let engine = build_engine(config, args.seed)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut runner = SessionRunner::new(&engine, stdin.lock(), stdout.lock(), json);
    let session = runner.run(first_essay).await?;

    info!(
        session_id = %session.id,
        phase = %session.phase(),
        revisions = session.memory.revision_count(),
        "Session ended"
    );

    if (args.export || config.export.enabled) && !session.memory.versions().is_empty() {
        let exporter = SessionExporter::new(&config.export.dir);
        match exporter.export(&session).await {
            Ok(path) if !json => println!("Session saved to {}", path.display()),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "Session export failed"),
        }
    }

    Ok(())
}
