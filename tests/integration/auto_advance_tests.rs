/*!
 * Integration tests for the timed quiz auto-advance
 */

use std::time::Duration;

use tokio::time::Instant;
use mediacademy::quiz::{QuizController, QuizEvent, QuizMode, QuizPhase, QuizResult, QuizSession, StartOutcome};
use mediacademy::subtitle_processor::Subtitle;
use crate::common;

const DELAY: Duration = Duration::from_millis(2000);

fn pool() -> Vec<Subtitle> {
    common::sample_subtitles().into_iter().take(3).collect()
}

fn started_controller() -> QuizController {
    let mut quiz = QuizController::new(QuizSession::default(), DELAY);
    let outcome = quiz.start(&pool(), QuizMode::Full, &mut common::seeded_rng());
    assert_eq!(outcome, StartOutcome::Started { items: 3 });
    quiz
}

fn correct_answer(quiz: &QuizController) -> String {
    quiz.session().current_item().map(|item| item.correct_answer.clone()).unwrap_or_default()
}

#[tokio::test(start_paused = true)]
async fn test_answer_shouldAdvanceOnlyAfterDelay() {
    common::init_test_logging();
    let mut quiz = started_controller();
    let mut events = quiz.subscribe();
    let started = Instant::now();

    let answer = correct_answer(&quiz);
    let outcome = quiz.answer(&answer).expect("answer accepted");
    assert!(outcome.correct);
    assert!(quiz.has_pending_advance());
    assert!(matches!(events.recv().await, Some(QuizEvent::Answered(_))));

    tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
    assert!(matches!(quiz.session().phase(), QuizPhase::Answered { index: 0, .. }));

    assert_eq!(events.recv().await, Some(QuizEvent::Advanced { index: 1 }));
    assert!(started.elapsed() >= DELAY);
    assert_eq!(quiz.session().phase(), &QuizPhase::InProgress { index: 1 });
}

#[tokio::test(start_paused = true)]
async fn test_cancel_pending_shouldKeepAnsweredState() {
    let mut quiz = started_controller();
    let mut events = quiz.subscribe();

    let answer = correct_answer(&quiz);
    quiz.answer(&answer);
    quiz.cancel_pending();
    assert!(!quiz.has_pending_advance());

    tokio::time::sleep(DELAY * 3).await;

    assert!(matches!(quiz.session().phase(), QuizPhase::Answered { index: 0, .. }));
    assert!(matches!(events.try_recv(), Ok(QuizEvent::Answered(_))));
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_teardown_shouldPreventAdvanceAndEndQuiz() {
    let mut quiz = started_controller();
    let mut events = quiz.subscribe();

    let answer = correct_answer(&quiz);
    quiz.answer(&answer);
    quiz.teardown();

    tokio::time::sleep(DELAY * 3).await;

    assert_eq!(quiz.session().phase(), &QuizPhase::Idle);
    assert_eq!(quiz.session().last_result(), None);
    assert!(matches!(events.try_recv(), Ok(QuizEvent::Answered(_))));
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_new_start_shouldIgnoreTimerFromPreviousQuiz() {
    let mut quiz = started_controller();

    let answer = correct_answer(&quiz);
    quiz.answer(&answer);
    quiz.start(&pool(), QuizMode::Full, &mut common::seeded_rng());

    tokio::time::sleep(DELAY * 3).await;

    let session = quiz.session();
    assert_eq!(session.phase(), &QuizPhase::InProgress { index: 0 });
    assert_eq!(session.score(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_drop_shouldAbortPendingAdvance() {
    let mut quiz = started_controller();
    let mut events = quiz.subscribe();

    let answer = correct_answer(&quiz);
    quiz.answer(&answer);
    drop(quiz);

    tokio::time::sleep(DELAY * 3).await;

    assert!(matches!(events.recv().await, Some(QuizEvent::Answered(_))));
    assert_eq!(events.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_full_quiz_shouldFinishWithScore() {
    let mut quiz = started_controller();
    let mut events = quiz.subscribe();

    for index in 0..3 {
        let answer = if index == 1 {
            quiz.session()
                .current_item()
                .and_then(|item| item.distractors.first().cloned())
                .unwrap_or_default()
        } else {
            correct_answer(&quiz)
        };
        quiz.answer(&answer);
        assert!(matches!(events.recv().await, Some(QuizEvent::Answered(_))));

        let next = events.recv().await;
        if index < 2 {
            assert_eq!(next, Some(QuizEvent::Advanced { index: index + 1 }));
        } else {
            assert_eq!(next, Some(QuizEvent::Finished(QuizResult { score: 2, total: 3 })));
        }
    }

    assert_eq!(quiz.session().wrong_answers().len(), 1);
    assert!(quiz.session().wrong_answers().contains(&1));
}
