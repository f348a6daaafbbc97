/*!
 * Dictionary-driven word segmentation for subtitle text.
 *
 * Sentences are split into word spans (exact dictionary surface forms) and
 * plain-text spans by a greedy longest-match scan from left to right. The
 * segmentation is lossless: joining the span texts gives back the input.
 *
 * Keys are grouped by their first character and pre-sorted once per
 * dictionary by descending length, with ties broken lexicographically, so
 * each scan position only checks candidates that can possibly match.
 */

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::DictionaryError;
use crate::file_utils::FileManager;
use crate::language_utils::JlptLevel;
use crate::subtitle_processor::Subtitle;

/// A vocabulary item that can be highlighted in subtitle text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Literal text used as the lookup key
    pub surface_form: String,

    /// Translation into the learner's language
    pub gloss_text: String,

    /// Romanized reading
    #[serde(default)]
    pub romanization: String,

    /// Proficiency level
    #[serde(default)]
    pub level: JlptLevel,
}

impl DictionaryEntry {
    pub fn new(
        surface_form: impl Into<String>,
        gloss_text: impl Into<String>,
        romanization: impl Into<String>,
        level: JlptLevel,
    ) -> Self {
        Self {
            surface_form: surface_form.into(),
            gloss_text: gloss_text.into(),
            romanization: romanization.into(),
            level,
        }
    }
}

/// Immutable surface-form lookup table
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<String, Arc<DictionaryEntry>>,

    /// Candidate keys per first character, longest first
    candidates: HashMap<char, Vec<Arc<DictionaryEntry>>>,
}

impl Dictionary {
    /// Build a dictionary; a later entry with the same surface form replaces an earlier one
    pub fn new<I>(entries: I) -> std::result::Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = DictionaryEntry>,
    {
        let mut map: HashMap<String, Arc<DictionaryEntry>> = HashMap::new();

        for entry in entries {
            if entry.surface_form.is_empty() {
                return Err(DictionaryError::EmptySurfaceForm(entry.gloss_text));
            }
            if map.contains_key(&entry.surface_form) {
                warn!("Duplicate dictionary entry '{}', keeping the last definition", entry.surface_form);
            }
            map.insert(entry.surface_form.clone(), Arc::new(entry));
        }

        let mut candidates: HashMap<char, Vec<Arc<DictionaryEntry>>> = HashMap::new();
        for entry in map.values() {
            if let Some(first) = entry.surface_form.chars().next() {
                candidates.entry(first).or_default().push(Arc::clone(entry));
            }
        }
        for list in candidates.values_mut() {
            list.sort_by(|a, b| {
                b.surface_form.chars().count()
                    .cmp(&a.surface_form.chars().count())
                    .then_with(|| a.surface_form.cmp(&b.surface_form))
            });
        }

        debug!("Dictionary ready: {} entries, {} leading characters", map.len(), candidates.len());

        Ok(Self { entries: map, candidates })
    }

    /// Parse a JSON array of entries
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<DictionaryEntry> = serde_json::from_str(json)
            .context("Failed to parse dictionary JSON")?;
        Ok(Self::new(entries)?)
    }

    /// Load a dictionary from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = FileManager::read_to_string(path)?;
        let dictionary = Self::from_json_str(&text)
            .with_context(|| format!("Invalid dictionary file: {:?}", path))?;
        info!("Loaded dictionary with {} entries from {:?}", dictionary.len(), path);
        Ok(dictionary)
    }

    pub fn get(&self, surface_form: &str) -> Option<&DictionaryEntry> {
        self.entries.get(surface_form).map(|e| e.as_ref())
    }

    pub fn contains(&self, surface_form: &str) -> bool {
        self.entries.contains_key(surface_form)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by surface form
    pub fn entries(&self) -> Vec<&DictionaryEntry> {
        let mut entries: Vec<&DictionaryEntry> = self.entries.values().map(|e| e.as_ref()).collect();
        entries.sort_by(|a, b| a.surface_form.cmp(&b.surface_form));
        entries
    }

    /// Longest entry whose surface form is a prefix of `text`
    pub fn longest_match(&self, text: &str) -> Option<&Arc<DictionaryEntry>> {
        let first = text.chars().next()?;
        self.candidates
            .get(&first)?
            .iter()
            .find(|entry| text.starts_with(entry.surface_form.as_str()))
    }

    /// Tokenize text against this dictionary
    pub fn tokenize(&self, text: &str) -> Vec<AnnotatedSpan> {
        tokenize(text, self)
    }
}

/// One piece of a segmented sentence
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSpan {
    pub text: String,
    pub is_word: bool,
    pub entry: Option<Arc<DictionaryEntry>>,
}

impl AnnotatedSpan {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_word: false,
            entry: None,
        }
    }

    fn word(text: &str, entry: Arc<DictionaryEntry>) -> Self {
        Self {
            text: text.to_string(),
            is_word: true,
            entry: Some(entry),
        }
    }
}

/// Split `text` into word and plain-text spans using greedy longest match
pub fn tokenize(text: &str, dictionary: &Dictionary) -> Vec<AnnotatedSpan> {
    let mut spans = Vec::new();
    let mut plain_start: Option<usize> = None;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];

        if let Some(entry) = dictionary.longest_match(rest) {
            if let Some(start) = plain_start.take() {
                spans.push(AnnotatedSpan::plain(&text[start..pos]));
            }
            let end = pos + entry.surface_form.len();
            spans.push(AnnotatedSpan::word(&text[pos..end], Arc::clone(entry)));
            pos = end;
        } else {
            plain_start.get_or_insert(pos);
            pos += rest.chars().next().map(char::len_utf8).unwrap_or(1);
        }
    }

    if let Some(start) = plain_start {
        spans.push(AnnotatedSpan::plain(&text[start..]));
    }

    spans
}

/// Subtitles whose tokenization contains the given surface form as a word
pub fn segments_containing_word<'a>(
    surface_form: &str,
    segments: &'a [Subtitle],
    dictionary: &Dictionary,
) -> Vec<&'a Subtitle> {
    segments
        .iter()
        .filter(|segment| {
            tokenize(&segment.source_text, dictionary)
                .iter()
                .any(|span| span.is_word && span.text == surface_form)
        })
        .collect()
}
