/*!
 * Tests for language codes and JLPT levels
 */

use anyhow::Result;
use mediacademy::errors::DictionaryError;
use mediacademy::language_utils::{get_language_name, language_codes_match, normalize_to_part2t, JlptLevel};

#[test]
fn test_normalize_to_part2t_shouldHandleTwoAndThreeLetterCodes() -> Result<()> {
    assert_eq!(normalize_to_part2t("ja")?, "jpn");
    assert_eq!(normalize_to_part2t("KO")?, "kor");
    assert_eq!(normalize_to_part2t("jpn")?, "jpn");
    assert_eq!(normalize_to_part2t("chi")?, "zho");
    assert!(normalize_to_part2t("xx").is_err());
    Ok(())
}

#[test]
fn test_language_codes_match_acrossFormats_shouldMatch() {
    assert!(language_codes_match("ja", "jpn"));
    assert!(!language_codes_match("ja", "ko"));
    assert!(!language_codes_match("ja", "invalid"));
}

#[test]
fn test_get_language_name_shouldReturnEnglishName() -> Result<()> {
    assert_eq!(get_language_name("ja")?, "Japanese");
    assert_eq!(get_language_name("ko")?, "Korean");
    Ok(())
}

#[test]
fn test_jlpt_level_shouldOrderFromEasiestToHardest() {
    assert!(JlptLevel::N5 < JlptLevel::N1);
    assert_eq!(JlptLevel::default(), JlptLevel::N5);
    assert_eq!(JlptLevel::ALL.len(), 5);
    assert_eq!(JlptLevel::N3.to_string(), "N3");
}

#[test]
fn test_jlpt_level_fromStr_shouldAcceptLowercase() {
    assert_eq!(" n2 ".parse::<JlptLevel>(), Ok(JlptLevel::N2));
    assert_eq!("N6".parse::<JlptLevel>(), Err(DictionaryError::UnknownLevel("N6".to_string())));
}
