/*!
 * Tests for active segment resolution
 */

use mediacademy::player::{MediaHost, SimulatedMedia};
use mediacademy::subtitle_processor::Subtitle;
use mediacademy::timeline::{resolve_active_segment, resolve_sorted, seek_to_segment, PlaybackTracker, SentenceTarget};
use mediacademy::errors::AppError;
use crate::common;

fn three_segments() -> Vec<Subtitle> {
    vec![
        Subtitle::new(0, 0.0, 3.0, "a", "A", ""),
        Subtitle::new(1, 3.0, 7.0, "b", "B", ""),
        Subtitle::new(2, 7.0, 12.0, "c", "C", ""),
    ]
}

#[test]
fn test_resolve_active_segment_withPositionInsideSegment_shouldReturnIt() {
    let segments = three_segments();
    assert_eq!(resolve_active_segment(5.0, &segments).map(|s| s.id), Some(1));
}

#[test]
fn test_resolve_active_segment_atEndOfLastSegment_shouldReturnNone() {
    let segments = three_segments();
    assert!(resolve_active_segment(12.0, &segments).is_none());
}

#[test]
fn test_resolve_active_segment_withNegativePosition_shouldReturnNone() {
    let segments = three_segments();
    assert!(resolve_active_segment(-1.0, &segments).is_none());
}

#[test]
fn test_resolve_active_segment_atBoundary_shouldPreferLaterSegment() {
    let segments = three_segments();
    assert_eq!(resolve_active_segment(3.0, &segments).map(|s| s.id), Some(1));
    assert_eq!(resolve_active_segment(0.0, &segments).map(|s| s.id), Some(0));
}

#[test]
fn test_resolve_active_segment_withEmptyList_shouldReturnNone() {
    assert!(resolve_active_segment(1.0, &[]).is_none());
    assert!(resolve_sorted(1.0, &[]).is_none());
}

#[test]
fn test_resolve_active_segment_withNaN_shouldReturnNone() {
    let segments = three_segments();
    assert!(resolve_active_segment(f64::NAN, &segments).is_none());
    assert!(resolve_sorted(f64::NAN, &segments).is_none());
}

#[test]
fn test_resolve_active_segment_withOverlap_shouldReturnFirstInListOrder() {
    let segments = vec![
        Subtitle::new(0, 0.0, 5.0, "a", "A", ""),
        Subtitle::new(1, 4.0, 8.0, "b", "B", ""),
    ];
    assert_eq!(resolve_active_segment(4.5, &segments).map(|s| s.id), Some(0));
}

#[test]
fn test_resolve_sorted_withGap_shouldReturnNone() {
    let segments = vec![
        Subtitle::new(0, 0.0, 2.0, "a", "A", ""),
        Subtitle::new(1, 3.0, 5.0, "b", "B", ""),
    ];
    assert!(resolve_sorted(2.5, &segments).is_none());
    assert_eq!(resolve_sorted(3.0, &segments).map(|s| s.id), Some(1));
}

#[test]
fn test_tracker_withRepeatedUpdates_shouldReportOnlyChanges() {
    let segments = common::sample_subtitles();
    let mut tracker = PlaybackTracker::new();

    let first = tracker.on_position_update(0.25, &segments);
    assert_eq!(first.map(|c| (c.previous, c.current)), Some((None, 0)));
    assert!(tracker.on_position_update(0.5, &segments).is_none());
    assert!(tracker.on_position_update(2.9, &segments).is_none());

    let second = tracker.on_position_update(3.0, &segments);
    assert_eq!(second.map(|c| (c.previous, c.current)), Some((Some(0), 1)));
    assert_eq!(tracker.active_id(), Some(1));
    assert_eq!(tracker.last_position(), Some(3.0));
}

#[test]
fn test_tracker_afterLastSegment_shouldKeepLastHighlight() {
    let segments = common::sample_subtitles();
    let mut tracker = PlaybackTracker::new();
    tracker.on_position_update(21.0, &segments);

    assert!(tracker.on_position_update(22.0, &segments).is_none());
    assert_eq!(tracker.active_id(), Some(4));

    tracker.reset();
    assert_eq!(tracker.active_id(), None);
}

#[test]
fn test_seek_to_segment_shouldMoveHostToSegmentStart() {
    let segments = common::sample_subtitles();
    let mut host = SimulatedMedia::new(22.0);
    seek_to_segment(&mut host, &segments[3]);
    assert_eq!(host.position(), 12.0);
}

#[test]
fn test_sentence_target_withUnknownSentence_shouldFail() {
    let transcript = common::sample_transcript();

    let found = SentenceTarget::new(1, 2).resolve(&transcript).map(|s| s.id);
    assert_eq!(found.ok(), Some(2));

    let missing = SentenceTarget::new(1, 99).resolve(&transcript);
    assert!(matches!(missing, Err(AppError::SentenceNotFound { content_id: 1, sentence_id: 99 })));

    let other_content = SentenceTarget::new(7, 2).resolve(&transcript);
    assert!(other_content.is_err());
}
