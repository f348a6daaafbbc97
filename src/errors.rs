/*!
 * Error types for the mediacademy library.
 *
 * This module contains custom error types for the different parts of the
 * playback core, using the thiserror crate for ergonomic error definitions.
 * Note that the tokenizer and the quiz generator have no error type: unknown
 * text and small bookmark pools are normal inputs for them.
 */

use thiserror::Error;

/// Errors found while validating a transcript at load time
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscriptError {
    /// A segment ends before (or exactly when) it starts
    #[error("Segment {id} has an empty time range: {start_time}s -> {end_time}s")]
    EmptyRange {
        /// Subtitle id
        id: u32,
        /// Start of the segment in seconds
        start_time: f64,
        /// End of the segment in seconds
        end_time: f64,
    },

    /// A segment starts before the previous one
    #[error("Segment {id} starts at {start_time}s, before segment {previous_id}")]
    Unsorted {
        id: u32,
        previous_id: u32,
        start_time: f64,
    },

    /// A segment starts before the previous one has ended
    #[error("Segment {id} overlaps segment {previous_id} by {overlap:.3}s")]
    Overlapping {
        id: u32,
        previous_id: u32,
        overlap: f64,
    },

    /// Two segments share the same id
    #[error("Duplicate segment id: {0}")]
    DuplicateId(u32),

    /// A time value is NaN or infinite
    #[error("Segment {0} has a non-finite timestamp")]
    NonFiniteTime(u32),

    /// Malformed transcript text
    #[error("Failed to parse transcript: {0}")]
    Parse(String),
}

/// Errors that can occur when loading a dictionary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DictionaryError {
    /// An entry with an empty surface form would match everywhere
    #[error("Dictionary entry with an empty surface form (gloss: {0})")]
    EmptySurfaceForm(String),

    /// Unknown proficiency level label
    #[error("Unknown JLPT level: {0}")]
    UnknownLevel(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from transcript loading
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Error from dictionary loading
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// A navigation target does not exist in the loaded content
    #[error("Sentence {sentence_id} not found in content {content_id}")]
    SentenceNotFound { content_id: u32, sentence_id: u32 },

    /// Playback rate outside the configured list
    #[error("Unsupported playback rate: {0}x")]
    UnsupportedPlaybackRate(f64),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::File(format!("Invalid JSON: {}", error))
    }
}
