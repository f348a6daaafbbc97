/*!
 * Tests for the bookmark stores
 */

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use mediacademy::bookmarks::{toggled, Acknowledgment, BookmarkChange, SentenceBookmarks, WordBookmarks};
use crate::common;

#[test]
fn test_toggle_twice_shouldRestoreOriginalSet() {
    let mut bookmarks = SentenceBookmarks::new();
    bookmarks.toggle(4);
    let before = bookmarks.all().clone();

    assert!(bookmarks.toggle(2));
    assert!(!bookmarks.toggle(2));

    assert_eq!(bookmarks.all(), &before);
}

#[test]
fn test_toggle_shouldFlipOnlyTheGivenKey() {
    let mut bookmarks = SentenceBookmarks::new();
    bookmarks.toggle(1);
    bookmarks.toggle(3);
    bookmarks.toggle(1);

    assert!(!bookmarks.contains(&1));
    assert!(bookmarks.contains(&3));
    assert_eq!(bookmarks.sorted(), vec![3]);
}

#[test]
fn test_toggled_shouldLeaveInputUntouched() {
    let set: HashSet<String> = ["会議".to_string()].into_iter().collect();
    let next = toggled(&set, "売上".to_string());

    assert_eq!(set.len(), 1);
    assert!(next.contains("会議") && next.contains("売上"));
    assert_eq!(toggled(&next, "売上".to_string()), set);
}

#[test]
fn test_subscribe_shouldNotifyWithAcknowledgment() {
    let seen: Arc<Mutex<Vec<(String, bool, Acknowledgment)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut words = WordBookmarks::new();
    words.subscribe(move |change: &BookmarkChange<String>| {
        sink.lock().push((change.key.clone(), change.bookmarked, change.acknowledgment));
    });

    words.toggle("会議".to_string());
    words.toggle("会議".to_string());

    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], ("会議".to_string(), true, Acknowledgment::Added));
    assert_eq!(seen[1], ("会議".to_string(), false, Acknowledgment::Removed));
    assert_ne!(Acknowledgment::Added.message(), Acknowledgment::Removed.message());
}

#[test]
fn test_select_shouldReturnBookmarkedSentencesInTranscriptOrder() {
    let mut bookmarks = SentenceBookmarks::new();
    for id in [4, 1, 2] {
        bookmarks.toggle(id);
    }

    let ids: Vec<u32> = bookmarks.select(&common::sample_subtitles()).iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 4]);

    bookmarks.clear();
    assert!(bookmarks.is_empty());
}
