/*!
 * # Mediacademy - subtitle-synchronized language study
 * 
 * A Rust library for studying a language through subtitled media.
 * 
 * ## Features
 * 
 * - Highlight the subtitle sentence under the playhead
 * - Jump to any sentence, repeat it, change the playback speed
 * - Split sentences into dictionary words (greedy longest match)
 * - Bookmark sentences and words
 * - Multiple-choice quizzes over bookmarked sentences, with a retake of
 *   the missed ones and a cancellable auto-advance
 * - Spaced review scheduling with a daily goal
 * 
 * ## Architecture
 * 
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Transcript loading (JSON and SRT) and validation
 * - `timeline`: Resolving the active segment from the playback position
 * - `tokenizer`: Dictionary and greedy longest-match tokenizer
 * - `bookmarks`: Observable bookmark sets
 * - `quiz`: Quiz generation, flow state machine and auto-advance
 * - `review`: Spaced-repetition scheduling
 * - `player`: Player session over a media host
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language codes and JLPT levels
 * - `errors`: Custom error types for the application
 * 
 * ## License
 * 
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod bookmarks;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod player;
pub mod quiz;
pub mod review;
pub mod subtitle_processor;
pub mod timeline;
pub mod tokenizer;

// Re-export main types for easier usage
pub use app_config::Config;
pub use bookmarks::{BookmarkStore, SentenceBookmarks, WordBookmarks};
pub use errors::{AppError, DictionaryError, TranscriptError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t, JlptLevel};
pub use player::{MediaHost, PlayerSession, SimulatedMedia};
pub use quiz::{build_quiz, QuizController, QuizItem, QuizMode, QuizSession};
pub use subtitle_processor::{ContentInfo, Subtitle, Transcript};
pub use timeline::{resolve_active_segment, SentenceTarget};
pub use tokenizer::{tokenize, AnnotatedSpan, Dictionary, DictionaryEntry};
