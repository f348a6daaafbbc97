/*!
 * Tests for error types
 */

use mediacademy::errors::{AppError, DictionaryError, TranscriptError};

#[test]
fn test_transcript_error_display_shouldDescribeSegment() {
    let err = TranscriptError::Overlapping { id: 2, previous_id: 1, overlap: 0.5 };
    assert_eq!(err.to_string(), "Segment 2 overlaps segment 1 by 0.500s");

    let err = TranscriptError::DuplicateId(4);
    assert_eq!(err.to_string(), "Duplicate segment id: 4");
}

#[test]
fn test_app_error_fromTranscriptError_shouldWrap() {
    let app_err: AppError = TranscriptError::NonFiniteTime(3).into();
    assert!(matches!(app_err, AppError::Transcript(TranscriptError::NonFiniteTime(3))));
    assert!(app_err.to_string().starts_with("Transcript error:"));
}

#[test]
fn test_app_error_fromDictionaryError_shouldWrap() {
    let app_err: AppError = DictionaryError::UnknownLevel("N9".to_string()).into();
    assert_eq!(app_err.to_string(), "Dictionary error: Unknown JLPT level: N9");
}

#[test]
fn test_app_error_fromIoAndAnyhow_shouldConvert() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert!(matches!(AppError::from(io_err), AppError::File(_)));

    let any_err = anyhow::anyhow!("boom");
    assert!(matches!(AppError::from(any_err), AppError::Unknown(msg) if msg == "boom"));
}

#[test]
fn test_sentence_not_found_display_shouldNameTarget() {
    let err = AppError::SentenceNotFound { content_id: 1, sentence_id: 9 };
    assert_eq!(err.to_string(), "Sentence 9 not found in content 1");
    assert_eq!(AppError::UnsupportedPlaybackRate(3.0).to_string(), "Unsupported playback rate: 3x");
}
