/*!
 * Common test utilities for the mediacademy test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use mediacademy::language_utils::JlptLevel;
use mediacademy::subtitle_processor::{ContentInfo, Subtitle, Transcript};
use mediacademy::tokenizer::{Dictionary, DictionaryEntry};

/// Route library logs through env_logger (shown with --nocapture)
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).filter_level(log::LevelFilter::Debug).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// The five sentences of the business meeting lesson
pub fn sample_subtitles() -> Vec<Subtitle> {
    vec![
        Subtitle::new(0, 0.0, 3.0, "こんにちは、皆さん。", "안녕하세요, 여러분.", "Konnichiwa, minasan."),
        Subtitle::new(1, 3.0, 7.0, "今日の会議を始めさせていただきます。", "오늘 회의를 시작하겠습니다.", "Kyō no kaigi wo hajimesasete itadakimasu."),
        Subtitle::new(2, 7.0, 12.0, "まず、売上について話し合いましょう。", "먼저 매출에 대해 이야기해봅시다.", "Mazu, uriage ni tsuite hanashiaimashō."),
        Subtitle::new(3, 12.0, 17.0, "今月の売上は予想を上回りました。", "이번 달 매출은 예상을 넘어섰습니다.", "Kongetsu no uriage wa yosō wo uwamawarimashita."),
        Subtitle::new(4, 17.0, 22.0, "素晴らしい結果ですね。おめでとうございます。", "훌륭한 결과네요. 축하합니다.", "Subarashii kekka desu ne. Omedetō gozaimasu."),
    ]
}

pub fn sample_transcript() -> Transcript {
    let mut content = ContentInfo::new(1, "비즈니스 일본어 - 회의 표현");
    content.category = "회화".to_string();
    content.level = JlptLevel::N2;
    Transcript::new(content, sample_subtitles()).expect("sample transcript is valid")
}

pub fn sample_dictionary() -> Arc<Dictionary> {
    let dictionary = Dictionary::new(vec![
        DictionaryEntry::new("会議", "회의", "kaigi", JlptLevel::N3),
        DictionaryEntry::new("売上", "매출", "uriage", JlptLevel::N2),
        DictionaryEntry::new("予想", "예상", "yosō", JlptLevel::N2),
        DictionaryEntry::new("結果", "결과", "kekka", JlptLevel::N3),
    ])
    .expect("sample dictionary is valid");
    Arc::new(dictionary)
}

/// Deterministic RNG for quiz tests
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub const SAMPLE_TRANSCRIPT_JSON: &str = r#"{
  "id": 1,
  "title": "비즈니스 일본어 - 회의 표현",
  "category": "회화",
  "level": "N2",
  "subtitles": [
    { "id": 0, "start_time": 0.0, "end_time": 3.0, "source_text": "こんにちは、皆さん。", "gloss_text": "안녕하세요, 여러분.", "romanization": "Konnichiwa, minasan." },
    { "id": 1, "start_time": 3.0, "end_time": 7.0, "source_text": "今日の会議を始めさせていただきます。", "gloss_text": "오늘 회의를 시작하겠습니다." },
    { "id": 2, "start_time": 7.0, "end_time": 12.0, "source_text": "まず、売上について話し合いましょう。", "gloss_text": "먼저 매출에 대해 이야기해봅시다." }
  ]
}"#;

pub const SAMPLE_DICTIONARY_JSON: &str = r#"[
  { "surface_form": "会議", "gloss_text": "회의", "romanization": "kaigi", "level": "N3" },
  { "surface_form": "売上", "gloss_text": "매출", "romanization": "uriage", "level": "N2" }
]"#;

/// Writes the sample transcript and dictionary into `dir`
pub fn create_sample_files(dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let transcript = create_test_file(dir, "business-meeting.json", SAMPLE_TRANSCRIPT_JSON)?;
    let dictionary = create_test_file(dir, "dictionary.json", SAMPLE_DICTIONARY_JSON)?;
    Ok((transcript, dictionary))
}
