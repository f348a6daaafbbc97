/*!
 * Playback position to active subtitle resolution.
 *
 * The resolver is a pure function: hosts call it on every position update
 * (at whatever cadence the media element reports) and may call it
 * redundantly. `PlaybackTracker` layers the "no flicker" rule on top: when
 * the position falls into a gap between segments, the previously resolved
 * sentence stays highlighted.
 */

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::player::MediaHost;
use crate::subtitle_processor::{Subtitle, Transcript};

/// First segment with `start_time <= position < end_time`
pub fn resolve_active_segment(position: f64, segments: &[Subtitle]) -> Option<&Subtitle> {
    segments.iter().find(|segment| segment.covers(position))
}

/// Binary-search variant of [`resolve_active_segment`] for validated (sorted,
/// non-overlapping) segments
pub fn resolve_sorted(position: f64, segments: &[Subtitle]) -> Option<&Subtitle> {
    if position.is_nan() {
        return None;
    }
    // Index of the first segment starting after `position`
    let idx = segments.partition_point(|segment| segment.start_time <= position);
    if idx == 0 {
        return None;
    }
    let candidate = &segments[idx - 1];
    candidate.covers(position).then_some(candidate)
}

/// Move the host to the start of a segment. The next position update resolves it.
pub fn seek_to_segment<H: MediaHost + ?Sized>(host: &mut H, segment: &Subtitle) {
    debug!("Seeking to sentence {} at {:.3}s", segment.id, segment.start_time);
    host.set_position(segment.start_time);
}

/// Reported when the highlighted sentence changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSegmentChange {
    pub previous: Option<u32>,
    pub current: u32,
}

/// Tracks the highlighted sentence across position updates
#[derive(Debug, Default, Clone)]
pub struct PlaybackTracker {
    active_id: Option<u32>,
    last_position: Option<f64>,
}

impl PlaybackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently highlighted sentence, if any has been resolved yet
    pub fn active_id(&self) -> Option<u32> {
        self.active_id
    }

    pub fn last_position(&self) -> Option<f64> {
        self.last_position
    }

    /// Re-evaluate the resolver for a new position.
    ///
    /// Returns a change only when a *different* segment becomes active; gaps
    /// keep the previous highlight and report nothing.
    pub fn on_position_update(&mut self, position: f64, segments: &[Subtitle]) -> Option<ActiveSegmentChange> {
        self.last_position = Some(position);

        let resolved = resolve_sorted(position, segments)?;
        if self.active_id == Some(resolved.id) {
            trace!("Position {:.3}s still inside sentence {}", position, resolved.id);
            return None;
        }

        let change = ActiveSegmentChange {
            previous: self.active_id,
            current: resolved.id,
        };
        debug!("Active sentence {:?} -> {} at {:.3}s", change.previous, change.current, position);
        self.active_id = Some(resolved.id);
        Some(change)
    }

    /// Forget the highlight, e.g. when new content is loaded
    pub fn reset(&mut self) {
        self.active_id = None;
        self.last_position = None;
    }
}

/// "Jump to sentence N within content M", produced by navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SentenceTarget {
    pub content_id: u32,
    pub sentence_id: u32,
}

impl SentenceTarget {
    pub fn new(content_id: u32, sentence_id: u32) -> Self {
        Self { content_id, sentence_id }
    }

    /// Find the targeted sentence in a loaded transcript
    pub fn resolve<'a>(&self, transcript: &'a Transcript) -> Result<&'a Subtitle, AppError> {
        let not_found = AppError::SentenceNotFound {
            content_id: self.content_id,
            sentence_id: self.sentence_id,
        };
        if transcript.content.id != self.content_id {
            return Err(not_found);
        }
        transcript.get(self.sentence_id).ok_or(not_found)
    }
}
