/*!
 * Bookmark tracking for sentences and vocabulary words.
 *
 * The store is owned by the session/UI layer. Every toggle notifies the
 * registered observers so the UI can show an acknowledgment. Iteration
 * order of [`BookmarkStore::all`] is unspecified; use
 * [`BookmarkStore::sorted`] when a stable order matters.
 */

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use log::{debug, info};

use crate::subtitle_processor::Subtitle;

/// What a toggle did, for rendering a confirmation message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgment {
    Added,
    Removed,
}

impl Acknowledgment {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Added => "Added to bookmarks",
            Self::Removed => "Removed from bookmarks",
        }
    }
}

/// Notification sent to observers after each toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkChange<K> {
    pub key: K,
    pub bookmarked: bool,
    pub acknowledgment: Acknowledgment,
}

/// Receives bookmark changes (toasts, badges, counters)
pub trait BookmarkObserver<K>: Send + Sync {
    fn on_bookmark_change(&self, change: &BookmarkChange<K>);
}

impl<K, F> BookmarkObserver<K> for F
where
    F: Fn(&BookmarkChange<K>) + Send + Sync,
{
    fn on_bookmark_change(&self, change: &BookmarkChange<K>) {
        self(change)
    }
}

/// Set of bookmarked keys with change notification
pub struct BookmarkStore<K> {
    keys: HashSet<K>,
    observers: Vec<Box<dyn BookmarkObserver<K>>>,
}

/// Bookmarked sentences, by subtitle id
pub type SentenceBookmarks = BookmarkStore<u32>;

/// Bookmarked vocabulary, by surface form
pub type WordBookmarks = BookmarkStore<String>;

impl<K> Default for BookmarkStore<K> {
    fn default() -> Self {
        Self {
            keys: HashSet::new(),
            observers: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone + fmt::Debug> BookmarkStore<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for future toggles
    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: BookmarkObserver<K> + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Flip membership of `key` and return the new state
    pub fn toggle(&mut self, key: K) -> bool {
        let bookmarked = if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key.clone());
            true
        };

        let change = BookmarkChange {
            key,
            bookmarked,
            acknowledgment: if bookmarked { Acknowledgment::Added } else { Acknowledgment::Removed },
        };
        debug!("Bookmark {:?}: {}", change.key, change.acknowledgment.message());

        for observer in &self.observers {
            observer.on_bookmark_change(&change);
        }

        bookmarked
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// All bookmarked keys, in no particular order
    pub fn all(&self) -> &HashSet<K> {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Remove every bookmark (explicit user action or session reset)
    pub fn clear(&mut self) {
        info!("Clearing {} bookmarks", self.keys.len());
        self.keys.clear();
    }
}

impl<K: Eq + Hash + Clone + Ord + fmt::Debug> BookmarkStore<K> {
    /// Bookmarked keys in ascending order
    pub fn sorted(&self) -> Vec<K> {
        let mut keys: Vec<K> = self.keys.iter().cloned().collect();
        keys.sort();
        keys
    }
}

impl BookmarkStore<u32> {
    /// Bookmarked subtitles in transcript order
    pub fn select(&self, segments: &[Subtitle]) -> Vec<Subtitle> {
        segments
            .iter()
            .filter(|segment| self.keys.contains(&segment.id))
            .cloned()
            .collect()
    }
}

impl<K: fmt::Debug> fmt::Debug for BookmarkStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookmarkStore")
            .field("keys", &self.keys)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Pure toggle: a copy of `set` with `key` flipped
pub fn toggled<K: Eq + Hash + Clone>(set: &HashSet<K>, key: K) -> HashSet<K> {
    let mut next = set.clone();
    if !next.remove(&key) {
        next.insert(key);
    }
    next
}
