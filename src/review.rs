/*!
 * Spaced-repetition review scheduling.
 *
 * Items move through a fixed interval table (1, 3, 7, 14, 30 days by
 * default). Recalling an item moves it one stage up the table; a miss sends
 * it back to the first interval. Items past the last stage keep the last
 * interval.
 */

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::language_utils::JlptLevel;

/// Default review intervals in days
pub const DEFAULT_REVIEW_INTERVALS: [u32; 5] = [1, 3, 7, 14, 30];

/// What is being reviewed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewKind {
    Sentence,
    Word,
}

/// How hard an item currently is, derived from its stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A sentence or word scheduled for review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub id: u32,
    pub kind: ReviewKind,
    pub content: String,
    pub gloss_text: String,
    pub level: JlptLevel,
    /// Index into the interval table of the next interval to apply
    pub stage: usize,
    pub review_count: u32,
    pub last_studied: Option<DateTime<Utc>>,
    pub due: DateTime<Utc>,
}

impl ReviewItem {
    /// New item, due immediately
    pub fn new(
        id: u32,
        kind: ReviewKind,
        content: impl Into<String>,
        gloss_text: impl Into<String>,
        level: JlptLevel,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            content: content.into(),
            gloss_text: gloss_text.into(),
            level,
            stage: 0,
            review_count: 0,
            last_studied: None,
            due: now,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }

    pub fn difficulty(&self) -> Difficulty {
        match self.stage {
            0 => Difficulty::Hard,
            1 | 2 => Difficulty::Medium,
            _ => Difficulty::Easy,
        }
    }
}

/// Interval table applied after each review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSchedule {
    intervals: Vec<u32>,
}

impl Default for ReviewSchedule {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_REVIEW_INTERVALS.to_vec(),
        }
    }
}

impl ReviewSchedule {
    /// An empty table falls back to the default intervals
    pub fn new(intervals: Vec<u32>) -> Self {
        if intervals.is_empty() {
            return Self::default();
        }
        Self { intervals }
    }

    pub fn intervals(&self) -> &[u32] {
        &self.intervals
    }

    /// Interval for a stage, clamped to the last entry
    pub fn interval_for(&self, stage: usize) -> Duration {
        let last = self.intervals.len() - 1;
        Duration::days(i64::from(self.intervals[stage.min(last)]))
    }

    /// Apply a review result and return the new due date
    pub fn record(&self, item: &mut ReviewItem, recalled: bool, now: DateTime<Utc>) -> DateTime<Utc> {
        if recalled {
            item.due = now + self.interval_for(item.stage);
            item.stage = (item.stage + 1).min(self.intervals.len());
        } else {
            item.stage = 0;
            item.due = now + self.interval_for(0);
        }
        item.review_count += 1;
        item.last_studied = Some(now);

        debug!("Review item {} ({:?}) recalled={} -> stage {}, due {}",
               item.id, item.kind, recalled, item.stage, item.due);
        item.due
    }
}

/// Items due for review at `now`, earliest first
pub fn due_items(items: &[ReviewItem], now: DateTime<Utc>) -> Vec<&ReviewItem> {
    let mut due: Vec<&ReviewItem> = items.iter().filter(|item| item.is_due(now)).collect();
    due.sort_by_key(|item| (item.due, item.id));
    due
}

/// Reviews completed today against the daily goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyProgress {
    pub goal: u32,
    pub completed: u32,
}

impl DailyProgress {
    pub fn new(goal: u32) -> Self {
        Self { goal, completed: 0 }
    }

    pub fn record(&mut self) {
        self.completed += 1;
    }

    /// Completion percentage, capped at 100
    pub fn percent(&self) -> f64 {
        if self.goal == 0 {
            return 100.0;
        }
        (f64::from(self.completed) / f64::from(self.goal) * 100.0).min(100.0)
    }

    pub fn is_met(&self) -> bool {
        self.completed >= self.goal
    }
}
