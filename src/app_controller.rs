use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info, warn};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::player::{MediaHost, PlayerSession, SimulatedMedia};
use crate::quiz::{QuizController, QuizEvent, QuizMode, QuizResult, QuizSession, StartOutcome};
use crate::review::{due_items, DailyProgress, ReviewItem};
use crate::subtitle_processor::{ContentInfo, Subtitle, Transcript};
use crate::timeline::SentenceTarget;
use crate::tokenizer::{AnnotatedSpan, Dictionary};

// @module: Application controller wiring the playback core to the CLI

/// Progress bar resolution (permille of the media duration)
const PROGRESS_STEPS: u64 = 1000;

/// What a simulated playback run displayed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSummary {
    /// Sentences highlighted, in order
    pub shown: Vec<u32>,
    /// Position at which playback stopped, in seconds
    pub stopped_at: f64,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Draw progress bars (off in tests and when piping output)
    show_progress: bool,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        let mut controller = Self::with_config(Config::default())?;
        controller.show_progress = false;
        Ok(controller)
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            show_progress: true,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_show_progress(&mut self, show: bool) {
        self.show_progress = show;
    }

    /// Load a transcript and dictionary into a player session
    pub fn open_content<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        transcript_path: P1,
        dictionary_path: P2,
    ) -> Result<PlayerSession<SimulatedMedia>> {
        let transcript = Transcript::load(transcript_path)?;
        let dictionary = Arc::new(Dictionary::load(dictionary_path)?);
        Ok(self.open_transcript(transcript, dictionary))
    }

    /// Wrap an already loaded transcript in a player session
    pub fn open_transcript(&self, transcript: Transcript, dictionary: Arc<Dictionary>) -> PlayerSession<SimulatedMedia> {
        if !crate::language_utils::language_codes_match(&transcript.content.source_language, &self.config.source_language) {
            warn!("Transcript '{}' is in '{}', expected '{}'",
                  transcript.content.title, transcript.content.source_language, self.config.source_language);
        }
        let host = SimulatedMedia::new(transcript.duration());
        PlayerSession::new(transcript, dictionary, host, &self.config.player)
    }

    /// List the lessons found under a directory
    pub fn catalog<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<(PathBuf, ContentInfo)>> {
        let mut catalog = Vec::new();
        for path in Transcript::discover(&dir)? {
            match Transcript::load(&path) {
                Ok(transcript) => catalog.push((path, transcript.content)),
                Err(e) => warn!("Skipping {:?}: {:#}", path, e),
            }
        }
        info!("Found {} lessons in {:?}", catalog.len(), dir.as_ref());
        Ok(catalog)
    }

    /// Play the session from the start (or from a navigation target) to the end,
    /// writing each newly highlighted sentence to `out`
    pub async fn run_playback<W: Write>(
        &self,
        session: &mut PlayerSession<SimulatedMedia>,
        start: Option<SentenceTarget>,
        out: &mut W,
    ) -> Result<PlaybackSummary> {
        if let Some(target) = start {
            session.navigate(target)?;
        }

        let progress_bar = if self.show_progress {
            let pb = ProgressBar::new(PROGRESS_STEPS);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
                .or_else(|_| ProgressStyle::default_bar().template("[{bar:40}] {msg}"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style.progress_chars("=>-"));
            pb
        } else {
            ProgressBar::with_draw_target(Some(PROGRESS_STEPS), ProgressDrawTarget::hidden())
        };

        let tick = self.config.player.tick();
        let mut interval = tokio::time::interval(tick);
        let mut summary = PlaybackSummary::default();

        session.toggle_play();
        if let Some(change) = session.handle_time_update() {
            self.print_active(session, out)?;
            summary.shown.push(change.current);
        }

        while session.host().is_playing() {
            interval.tick().await;
            session.host_mut().tick(tick);

            if let Some(change) = session.handle_time_update() {
                progress_bar.suspend(|| self.print_active(session, out))?;
                summary.shown.push(change.current);
            }

            progress_bar.set_position((session.progress() * PROGRESS_STEPS as f64) as u64);
            progress_bar.set_message(session.clock());
        }

        progress_bar.finish_and_clear();
        summary.stopped_at = session.host().position();
        debug!("Playback stopped at {:.3}s after {} sentences", summary.stopped_at, summary.shown.len());
        Ok(summary)
    }

    fn print_active<W: Write>(&self, session: &PlayerSession<SimulatedMedia>, out: &mut W) -> Result<()> {
        let Some(segment) = session.active_segment() else {
            return Ok(());
        };
        let spans = session.dictionary().tokenize(&segment.source_text);
        let marker = if session.jump_target() == Some(segment.id) { "*" } else { " " };

        writeln!(out, "{}[{}] {}", marker, Subtitle::format_clock(segment.start_time), render_spans(&spans))?;
        writeln!(out, "   {}", segment.gloss_text)?;
        if !segment.romanization.is_empty() {
            writeln!(out, "   {}", segment.romanization)?;
        }
        for span in spans.iter().filter(|s| s.is_word) {
            if let Some(entry) = &span.entry {
                writeln!(out, "     {} ({}, {}): {}", entry.surface_form, entry.romanization, entry.level, entry.gloss_text)?;
            }
        }
        Ok(())
    }

    /// A quiz controller configured from the quiz settings
    pub fn new_quiz(&self) -> QuizController {
        QuizController::new(
            QuizSession::new(self.config.quiz.distractor_count),
            self.config.quiz.auto_advance_delay(),
        )
    }

    /// Run a quiz interactively: options are chosen by number from `input`.
    ///
    /// Returns `None` when the quiz could not start or the input ended early.
    pub async fn run_quiz<R: BufRead, W: Write>(
        &self,
        quiz: &mut QuizController,
        bookmarked: &[Subtitle],
        mode: QuizMode,
        input: &mut R,
        out: &mut W,
    ) -> Result<Option<QuizResult>> {
        let mut events = quiz.subscribe();

        let total = match quiz.start(bookmarked, mode, &mut rand::rng()) {
            StartOutcome::Started { items } => items,
            StartOutcome::Advisory(advisory) => {
                writeln!(out, "{}", advisory.message())?;
                return Ok(None);
            }
        };

        loop {
            let (item, index, score) = {
                let session = quiz.session();
                let Some(item) = session.current_item().cloned() else {
                    break;
                };
                let index = match session.phase() {
                    crate::quiz::QuizPhase::InProgress { index } => *index,
                    _ => 0,
                };
                (item, index, session.score())
            };

            writeln!(out, "\n({}/{})  score: {}", index + 1, total, score)?;
            writeln!(out, "{}", item.prompt)?;
            for (i, option) in item.options.iter().enumerate() {
                writeln!(out, "  {}) {}", i + 1, option)?;
            }
            out.flush()?;

            let Some(choice) = read_choice(input, item.options.len())? else {
                quiz.teardown();
                writeln!(out, "Quiz abandoned.")?;
                return Ok(None);
            };

            let Some(outcome) = quiz.answer(&item.options[choice]) else {
                continue;
            };
            if outcome.correct {
                writeln!(out, "Correct!")?;
            } else {
                writeln!(out, "Wrong. Answer: {}", outcome.correct_answer)?;
            }

            loop {
                match events.recv().await {
                    Some(QuizEvent::Advanced { .. }) => break,
                    Some(QuizEvent::Finished(result)) => {
                        writeln!(out, "\nQuiz complete! Score: {}", result)?;
                        let missed = quiz.session().wrong_answers().len();
                        if mode == QuizMode::Full && missed > 0 {
                            writeln!(out, "{} sentence(s) to retake.", missed)?;
                        }
                        return Ok(Some(result));
                    }
                    Some(QuizEvent::Answered(_)) => continue,
                    None => return Err(anyhow!("Quiz event channel closed")),
                }
            }
        }

        Ok(quiz.session().last_result())
    }

    /// Write today's review list and progress
    pub fn print_review_plan<W: Write>(&self, items: &[ReviewItem], progress: &DailyProgress, now: DateTime<Utc>, out: &mut W) -> Result<()> {
        let due = due_items(items, now);
        writeln!(out, "Today's review goal: {}/{} ({:.0}%)", progress.completed, progress.goal, progress.percent())?;
        writeln!(out, "Due now: {}", due.len())?;
        for item in due {
            writeln!(out, "  [{}] {:?} {} - {} (reviews: {}, {:?})",
                     item.level, item.kind, item.content, item.gloss_text, item.review_count, item.difficulty())?;
        }
        let intervals: Vec<String> = self.config.review.intervals_days.iter().map(|d| format!("{}d", d)).collect();
        writeln!(out, "Schedule: {}", intervals.join(" -> "))?;
        Ok(())
    }
}

/// Render spans with dictionary words in brackets
pub fn render_spans(spans: &[AnnotatedSpan]) -> String {
    spans
        .iter()
        .map(|span| {
            if span.is_word {
                format!("[{}]", span.text)
            } else {
                span.text.clone()
            }
        })
        .collect()
}

/// Read a 1-based option number; `None` on end of input
fn read_choice<R: BufRead>(input: &mut R, options: usize) -> Result<Option<usize>> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line).context("Failed to read answer")? == 0 {
            return Ok(None);
        }
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=options).contains(&n) => return Ok(Some(n - 1)),
            _ => debug!("Ignoring invalid choice {:?}", line.trim()),
        }
    }
}
