/*!
 * Timed auto-advance between quiz questions.
 *
 * After an answer the session stays in `Answered` for a fixed delay so the
 * UI can show the correct/incorrect highlight, then moves on by itself.
 * The delay runs as a tokio task that is aborted when a new quiz starts,
 * when the controller is torn down, or when it is dropped. The task also
 * re-checks the session generation before acting, so a timer that fires
 * late never touches a newer quiz.
 *
 * `answer` spawns onto the current tokio runtime and must be called from
 * inside one.
 */

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use parking_lot::{Mutex, MutexGuard};
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::session::{AnswerOutcome, QuizMode, QuizPhase, QuizResult, QuizSession, StartOutcome};
use crate::subtitle_processor::Subtitle;

/// Progress notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    Answered(AnswerOutcome),
    Advanced { index: usize },
    Finished(QuizResult),
}

/// Drives a [`QuizSession`] and owns its pending auto-advance
pub struct QuizController {
    session: Arc<Mutex<QuizSession>>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    events: Option<mpsc::UnboundedSender<QuizEvent>>,
}

impl QuizController {
    pub fn new(session: QuizSession, delay: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            delay,
            pending: None,
            events: None,
        }
    }

    /// Receive quiz events; replaces any earlier subscriber
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<QuizEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Start a new quiz, dropping any advance armed for the previous one
    pub fn start<R: Rng + ?Sized>(&mut self, bookmarked: &[Subtitle], mode: QuizMode, rng: &mut R) -> StartOutcome {
        self.cancel_pending();
        self.session.lock().start(bookmarked, mode, rng)
    }

    /// Answer the current question and arm the auto-advance
    pub fn answer(&mut self, selected: &str) -> Option<AnswerOutcome> {
        let (outcome, generation) = {
            let mut session = self.session.lock();
            let outcome = session.answer(selected)?;
            (outcome, session.generation())
        };

        self.emit(QuizEvent::Answered(outcome.clone()));
        self.arm(generation, outcome.index);
        Some(outcome)
    }

    /// Whether an auto-advance is waiting to fire
    pub fn has_pending_advance(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Abort the armed auto-advance, if any
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!("Cancelling pending quiz advance");
            handle.abort();
        }
    }

    /// The view showing the quiz is going away
    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.session.lock().cancel();
    }

    /// Lock the session for inspection
    pub fn session(&self) -> MutexGuard<'_, QuizSession> {
        self.session.lock()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn emit(&self, event: QuizEvent) {
        if let Some(tx) = &self.events {
            // A closed receiver just means nobody is listening anymore
            let _ = tx.send(event);
        }
    }

    fn arm(&mut self, generation: u64, index: usize) {
        self.cancel_pending();

        let session = Arc::clone(&self.session);
        let events = self.events.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let event = {
                let mut session = session.lock();
                let still_current = session.generation() == generation
                    && matches!(session.phase(), QuizPhase::Answered { index: i, .. } if *i == index);
                if !still_current {
                    debug!("Dropping stale quiz advance (generation {}, question {})", generation, index);
                    return;
                }
                match session.advance() {
                    Some(result) => QuizEvent::Finished(result),
                    None => QuizEvent::Advanced { index: index + 1 },
                }
            };

            if let Some(tx) = events {
                let _ = tx.send(event);
            }
        }));
    }
}

impl Drop for QuizController {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
