/*!
 * Quiz flow state machine.
 *
 * `Idle -> InProgress(0) -> [Answered(i) -> InProgress(i + 1)]* -> Idle`
 *
 * `Answered` only leaves through [`QuizSession::advance`]; answers given
 * while in it are ignored. Every start or cancel bumps the session
 * generation so deferred work armed for an older quiz can tell it is stale.
 */

use std::collections::HashSet;
use std::fmt;

use log::{debug, info};
use rand::Rng;

use super::generator::{build_quiz_with, QuizItem, DEFAULT_DISTRACTOR_COUNT};
use crate::subtitle_processor::Subtitle;

/// Which sentences a quiz asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    /// Every bookmarked sentence; misses are recorded for a retake
    Full,
    /// Only previously missed sentences; nothing is recorded
    Retake,
}

/// Current step of the quiz flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    InProgress { index: usize },
    Answered { index: usize, selected: String, correct: bool },
}

/// Final score of a completed quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
}

impl fmt::Display for QuizResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score, self.total)
    }
}

/// User-visible reason a quiz did not start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAdvisory {
    NoBookmarks,
    NoWrongAnswers,
}

impl QuizAdvisory {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoBookmarks => "No bookmarked sentences yet. Bookmark sentences while watching to build a quiz.",
            Self::NoWrongAnswers => "No missed sentences to retake.",
        }
    }
}

/// Result of asking the session to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { items: usize },
    Advisory(QuizAdvisory),
}

/// Feedback for one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub index: usize,
    pub sentence_id: u32,
    pub selected: String,
    pub correct_answer: String,
    pub correct: bool,
}

/// Owns the items, score and missed sentences of the running quiz
#[derive(Debug, Clone)]
pub struct QuizSession {
    items: Vec<QuizItem>,
    phase: QuizPhase,
    mode: QuizMode,
    score: usize,
    wrong_answers: HashSet<u32>,
    last_result: Option<QuizResult>,
    generation: u64,
    distractor_count: usize,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(DEFAULT_DISTRACTOR_COUNT)
    }
}

impl QuizSession {
    pub fn new(distractor_count: usize) -> Self {
        Self {
            items: Vec::new(),
            phase: QuizPhase::Idle,
            mode: QuizMode::Full,
            score: 0,
            wrong_answers: HashSet::new(),
            last_result: None,
            generation: 0,
            distractor_count,
        }
    }

    /// Start a quiz over the bookmarked sentences.
    ///
    /// A full quiz forgets the previous misses; a retake asks only those.
    pub fn start<R: Rng + ?Sized>(&mut self, bookmarked: &[Subtitle], mode: QuizMode, rng: &mut R) -> StartOutcome {
        if bookmarked.is_empty() {
            info!("{}", QuizAdvisory::NoBookmarks.message());
            return StartOutcome::Advisory(QuizAdvisory::NoBookmarks);
        }

        let items = match mode {
            QuizMode::Full => build_quiz_with(bookmarked, None, self.distractor_count, rng),
            QuizMode::Retake => {
                if self.wrong_answers.is_empty() {
                    info!("{}", QuizAdvisory::NoWrongAnswers.message());
                    return StartOutcome::Advisory(QuizAdvisory::NoWrongAnswers);
                }
                build_quiz_with(bookmarked, Some(&self.wrong_answers), self.distractor_count, rng)
            }
        };

        if items.is_empty() {
            let advisory = match mode {
                QuizMode::Full => QuizAdvisory::NoBookmarks,
                QuizMode::Retake => QuizAdvisory::NoWrongAnswers,
            };
            info!("{}", advisory.message());
            return StartOutcome::Advisory(advisory);
        }

        if mode == QuizMode::Full {
            self.wrong_answers.clear();
        }

        let count = items.len();
        self.items = items;
        self.mode = mode;
        self.score = 0;
        self.last_result = None;
        self.phase = QuizPhase::InProgress { index: 0 };
        self.generation += 1;

        debug!("Quiz {} started ({:?}, {} items)", self.generation, mode, count);
        StartOutcome::Started { items: count }
    }

    /// Record an answer for the current question. Ignored outside `InProgress`.
    pub fn answer(&mut self, selected: &str) -> Option<AnswerOutcome> {
        let QuizPhase::InProgress { index } = self.phase else {
            debug!("Ignoring answer in phase {:?}", self.phase);
            return None;
        };
        let item = self.items.get(index)?;
        let correct = item.is_correct(selected);

        if correct {
            self.score += 1;
        } else if self.mode == QuizMode::Full {
            self.wrong_answers.insert(item.sentence_id);
        }

        let outcome = AnswerOutcome {
            index,
            sentence_id: item.sentence_id,
            selected: selected.to_string(),
            correct_answer: item.correct_answer.clone(),
            correct,
        };

        self.phase = QuizPhase::Answered {
            index,
            selected: selected.to_string(),
            correct,
        };
        Some(outcome)
    }

    /// Leave `Answered`: go to the next question, or finish and return the score
    pub fn advance(&mut self) -> Option<QuizResult> {
        let QuizPhase::Answered { index, .. } = self.phase else {
            return None;
        };

        if index + 1 < self.items.len() {
            self.phase = QuizPhase::InProgress { index: index + 1 };
            return None;
        }

        let result = QuizResult {
            score: self.score,
            total: self.items.len(),
        };
        info!("Quiz complete! Score: {}", result);
        self.phase = QuizPhase::Idle;
        self.last_result = Some(result);
        Some(result)
    }

    /// Abandon the running quiz without a result
    pub fn cancel(&mut self) {
        if self.phase != QuizPhase::Idle {
            debug!("Quiz {} cancelled", self.generation);
        }
        self.phase = QuizPhase::Idle;
        self.generation += 1;
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.phase != QuizPhase::Idle
    }

    /// Question currently shown, including while its feedback is displayed
    pub fn current_item(&self) -> Option<&QuizItem> {
        match self.phase {
            QuizPhase::Idle => None,
            QuizPhase::InProgress { index } | QuizPhase::Answered { index, .. } => self.items.get(index),
        }
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Sentences missed in the last full quiz
    pub fn wrong_answers(&self) -> &HashSet<u32> {
        &self.wrong_answers
    }

    pub fn last_result(&self) -> Option<QuizResult> {
        self.last_result
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
