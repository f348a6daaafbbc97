/*!
 * Tests for application configuration
 */

use anyhow::Result;
use mediacademy::app_config::{Config, LogLevel};
use crate::common;

#[test]
fn test_default_config_shouldValidate() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.player.playback_rates, vec![0.5, 0.75, 1.0, 1.25, 1.5]);
    assert_eq!(config.quiz.distractor_count, 3);
    assert_eq!(config.quiz.auto_advance_delay().as_millis(), 2000);
    assert_eq!(config.review.intervals_days, vec![1, 3, 7, 14, 30]);
    assert_eq!(config.review.daily_goal, 10);
}

#[test]
fn test_config_withInvalidLanguage_shouldFailValidation() {
    let mut config = Config::default();
    config.gloss_language = "xx".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_withDefaultRateOutsideList_shouldFailValidation() {
    let mut config = Config::default();
    config.player.default_playback_rate = 2.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_withBadRates_shouldFailValidation() {
    let mut config = Config::default();
    config.player.playback_rates.push(0.0);
    assert!(config.validate().is_err());

    config.player.playback_rates.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_withDecreasingIntervals_shouldFailValidation() {
    let mut config = Config::default();
    config.review.intervals_days = vec![3, 1];
    assert!(config.validate().is_err());

    config.review.intervals_days.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_fromPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{ "gloss_language": "en", "quiz": { "auto_advance_delay_ms": 500 }, "log_level": "debug" }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.source_language, "ja");
    assert_eq!(config.gloss_language, "en");
    assert_eq!(config.quiz.auto_advance_delay_ms, 500);
    assert_eq!(config.quiz.distractor_count, 3);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(created, reloaded);
    assert_eq!(reloaded, Config::default());
    Ok(())
}

#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}
