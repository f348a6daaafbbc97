/*!
 * Quiz item generation.
 *
 * Items follow pool order; only the options of each item are shuffled.
 * Distractors are drawn from the whole bookmarked pool, not only the items
 * being asked, so a retake over a single missed sentence still gets
 * alternatives to choose from.
 */

use std::collections::HashSet;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::subtitle_processor::Subtitle;

/// Number of wrong options per question when enough glosses exist
pub const DEFAULT_DISTRACTOR_COUNT: usize = 3;

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq)]
pub struct QuizItem {
    /// Sentence this question was built from
    pub sentence_id: u32,
    /// Source text shown to the learner
    pub prompt: String,
    pub correct_answer: String,
    /// Wrong glosses, at most the configured count
    pub distractors: Vec<String>,
    /// Correct answer and distractors in presentation order
    pub options: Vec<String>,
}

impl QuizItem {
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

/// Build a quiz with the default distractor count and the thread-local RNG
pub fn build_quiz(pool: &[Subtitle], wrong_only: Option<&HashSet<u32>>) -> Vec<QuizItem> {
    build_quiz_with(pool, wrong_only, DEFAULT_DISTRACTOR_COUNT, &mut rand::rng())
}

/// Build a quiz from the bookmarked `pool`.
///
/// When `wrong_only` is given and non-empty only those sentences are asked
/// (retake mode). Small pools produce fewer options instead of failing.
pub fn build_quiz_with<R: Rng + ?Sized>(
    pool: &[Subtitle],
    wrong_only: Option<&HashSet<u32>>,
    distractor_count: usize,
    rng: &mut R,
) -> Vec<QuizItem> {
    let restriction = wrong_only.filter(|ids| !ids.is_empty());

    let items: Vec<QuizItem> = pool
        .iter()
        .filter(|sentence| restriction.is_none_or(|ids| ids.contains(&sentence.id)))
        .map(|sentence| build_item(sentence, pool, distractor_count, &mut *rng))
        .collect();

    debug!(
        "Built {} quiz items from a pool of {} ({})",
        items.len(),
        pool.len(),
        if restriction.is_some() { "retake" } else { "full" }
    );

    items
}

fn build_item<R: Rng + ?Sized>(
    sentence: &Subtitle,
    pool: &[Subtitle],
    distractor_count: usize,
    rng: &mut R,
) -> QuizItem {
    let mut seen = HashSet::new();
    let mut candidates: Vec<String> = pool
        .iter()
        .filter(|other| other.id != sentence.id && other.gloss_text != sentence.gloss_text)
        .filter(|other| seen.insert(other.gloss_text.as_str()))
        .map(|other| other.gloss_text.clone())
        .collect();

    candidates.shuffle(&mut *rng);
    candidates.truncate(distractor_count);

    let mut options = Vec::with_capacity(candidates.len() + 1);
    options.push(sentence.gloss_text.clone());
    options.extend(candidates.iter().cloned());
    options.shuffle(&mut *rng);

    QuizItem {
        sentence_id: sentence.id,
        prompt: sentence.source_text.clone(),
        correct_answer: sentence.gloss_text.clone(),
        distractors: candidates,
        options,
    }
}
