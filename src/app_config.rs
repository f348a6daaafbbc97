use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use std::time::Duration;
use log::warn;

use crate::file_utils::FileManager;
use crate::review::{ReviewSchedule, DEFAULT_REVIEW_INTERVALS};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language of the subtitle source text (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language the glosses are written in (ISO)
    #[serde(default = "default_gloss_language")]
    pub gloss_language: String,

    /// Player settings
    #[serde(default)]
    pub player: PlayerConfig,

    /// Quiz settings
    #[serde(default)]
    pub quiz: QuizConfig,

    /// Review scheduling settings
    #[serde(default)]
    pub review: ReviewConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Playback settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Speeds offered by the rate selector
    #[serde(default = "default_playback_rates")]
    pub playback_rates: Vec<f64>,

    /// Speed used when content is opened
    #[serde(default = "default_playback_rate")]
    pub default_playback_rate: f64,

    /// Interval between simulated time updates, in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            playback_rates: default_playback_rates(),
            default_playback_rate: default_playback_rate(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl PlayerConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Quiz settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuizConfig {
    /// Wrong options per question
    #[serde(default = "default_distractor_count")]
    pub distractor_count: usize,

    /// How long answer feedback stays on screen before the next question
    #[serde(default = "default_auto_advance_delay_ms")]
    pub auto_advance_delay_ms: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            distractor_count: default_distractor_count(),
            auto_advance_delay_ms: default_auto_advance_delay_ms(),
        }
    }
}

impl QuizConfig {
    pub fn auto_advance_delay(&self) -> Duration {
        Duration::from_millis(self.auto_advance_delay_ms)
    }
}

/// Spaced-repetition settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReviewConfig {
    /// Days between reviews, one entry per stage
    #[serde(default = "default_review_intervals")]
    pub intervals_days: Vec<u32>,

    /// Reviews to complete per day
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            intervals_days: default_review_intervals(),
            daily_goal: default_daily_goal(),
        }
    }
}

impl ReviewConfig {
    pub fn schedule(&self) -> ReviewSchedule {
        ReviewSchedule::new(self.intervals_days.clone())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "ja".to_string()
}

fn default_gloss_language() -> String {
    "ko".to_string()
}

fn default_playback_rates() -> Vec<f64> {
    vec![0.5, 0.75, 1.0, 1.25, 1.5]
}

fn default_playback_rate() -> f64 {
    1.0
}

fn default_tick_ms() -> u64 {
    250 // roughly the cadence browsers fire timeupdate at
}

fn default_distractor_count() -> usize {
    3
}

fn default_auto_advance_delay_ms() -> u64 {
    2000
}

fn default_review_intervals() -> Vec<u32> {
    DEFAULT_REVIEW_INTERVALS.to_vec()
}

fn default_daily_goal() -> u32 {
    10
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _gloss_name = crate::language_utils::get_language_name(&self.gloss_language)?;

        if self.player.playback_rates.is_empty() {
            return Err(anyhow!("At least one playback rate is required"));
        }
        if let Some(rate) = self.player.playback_rates.iter().find(|r| !r.is_finite() || **r <= 0.0) {
            return Err(anyhow!("Invalid playback rate: {}", rate));
        }
        if !self.player.playback_rates.iter().any(|r| (r - self.player.default_playback_rate).abs() < f64::EPSILON) {
            return Err(anyhow!(
                "Default playback rate {} is not one of {:?}",
                self.player.default_playback_rate, self.player.playback_rates
            ));
        }
        if self.player.tick_ms == 0 {
            return Err(anyhow!("Player tick must be at least 1ms"));
        }
        if self.review.intervals_days.is_empty() {
            return Err(anyhow!("Review interval table must not be empty"));
        }
        if self.review.intervals_days.windows(2).any(|w| w[0] > w[1]) {
            return Err(anyhow!("Review intervals must be non-decreasing: {:?}", self.review.intervals_days));
        }

        Ok(())
    }

    /// Load configuration from a JSON file, writing the defaults if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if FileManager::file_exists(path) {
            let text = FileManager::read_to_string(path)?;
            let config: Config = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(path, &config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;

        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            gloss_language: default_gloss_language(),
            player: PlayerConfig::default(),
            quiz: QuizConfig::default(),
            review: ReviewConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
