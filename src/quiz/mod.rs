/*!
 * Multiple-choice quizzes over bookmarked sentences.
 *
 * This module is split into:
 *
 * - `generator`: builds quiz items (prompt, correct gloss, distractors)
 * - `session`: the quiz flow state machine and scoring
 * - `auto_advance`: the cancellable delayed move to the next question
 */

// Re-export main types for easier usage
pub use self::auto_advance::{QuizController, QuizEvent};
pub use self::generator::{build_quiz, build_quiz_with, QuizItem, DEFAULT_DISTRACTOR_COUNT};
pub use self::session::{
    AnswerOutcome, QuizAdvisory, QuizMode, QuizPhase, QuizResult, QuizSession, StartOutcome,
};

// Submodules
pub mod auto_advance;
pub mod generator;
pub mod session;
