use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::{error, info, debug};
use serde::{Deserialize, Serialize};
use crate::errors::TranscriptError;
use crate::file_utils::{FileManager, FileType};
use crate::language_utils::JlptLevel;

// @module: Transcript loading, validation and formatting

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @struct: Single time-aligned transcript sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    // @field: Sentence id, unique within a transcript
    pub id: u32,

    // @field: Start of the segment in seconds (inclusive)
    pub start_time: f64,

    // @field: End of the segment in seconds (exclusive)
    pub end_time: f64,

    // @field: Japanese text
    pub source_text: String,

    // @field: Translation into the learner's language
    pub gloss_text: String,

    // @field: Romanized reading
    #[serde(default)]
    pub romanization: String,
}

impl Subtitle {
    /// Creates a new subtitle
    pub fn new(
        id: u32,
        start_time: f64,
        end_time: f64,
        source_text: impl Into<String>,
        gloss_text: impl Into<String>,
        romanization: impl Into<String>,
    ) -> Self {
        Subtitle {
            id,
            start_time,
            end_time,
            source_text: source_text.into(),
            gloss_text: gloss_text.into(),
            romanization: romanization.into(),
        }
    }

    /// Whether the playback position falls inside this segment
    pub fn covers(&self, position: f64) -> bool {
        position >= self.start_time && position < self.end_time
    }

    /// Segment length in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Format seconds as an SRT timestamp (HH:MM:SS,mmm)
    pub fn format_timestamp(seconds: f64) -> String {
        let ms = (seconds.max(0.0) * 1000.0).round() as u64;
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let secs = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }

    /// Format seconds as a player clock (m:ss)
    pub fn format_clock(seconds: f64) -> String {
        let total = if seconds.is_finite() { seconds.max(0.0) as u64 } else { 0 };
        format!("{}:{:02}", total / 60, total % 60)
    }

    /// Parse an SRT timestamp to seconds
    pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
        // Parse HH:MM:SS,mmm format
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        let total_ms = hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis;
        Ok(total_ms as f64 / 1000.0)
    }
}

impl fmt::Display for Subtitle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_time),
            Self::format_timestamp(self.end_time)
        )?;
        writeln!(f, "{}", self.source_text)?;
        writeln!(f, "{}", self.gloss_text)?;
        if !self.romanization.is_empty() {
            writeln!(f, "{}", self.romanization)?;
        }
        writeln!(f)
    }
}

/// Catalog metadata for a media lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInfo {
    /// Content id used by navigation targets
    pub id: u32,

    /// Lesson title
    pub title: String,

    /// Catalog category (conversation, news, ...)
    #[serde(default)]
    pub category: String,

    /// Proficiency level of the lesson
    #[serde(default)]
    pub level: JlptLevel,

    /// Language of the subtitle source text
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language of the gloss text
    #[serde(default = "default_gloss_language")]
    pub gloss_language: String,
}

impl ContentInfo {
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            category: String::new(),
            level: JlptLevel::default(),
            source_language: default_source_language(),
            gloss_language: default_gloss_language(),
        }
    }
}

fn default_source_language() -> String {
    "ja".to_string()
}

fn default_gloss_language() -> String {
    "ko".to_string()
}

/// On-disk shape of a JSON transcript file
#[derive(Debug, Serialize, Deserialize)]
struct TranscriptFile {
    #[serde(flatten)]
    content: ContentInfo,
    subtitles: Vec<Subtitle>,
}

/// Validated, immutable list of subtitles for one content item
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Content metadata
    pub content: ContentInfo,

    /// Sorted, non-overlapping segments
    segments: Vec<Subtitle>,
}

impl Transcript {
    /// Build a transcript, rejecting segments that break the timeline invariants
    pub fn new(content: ContentInfo, segments: Vec<Subtitle>) -> std::result::Result<Self, TranscriptError> {
        if let Err(e) = validate_segments(&segments) {
            error!("Rejected transcript for content {}: {}", content.id, e);
            return Err(e);
        }

        debug!("Loaded {} segments for content {} ({})",
               segments.len(), content.id, content.title);

        Ok(Self { content, segments })
    }

    /// Parse a JSON transcript
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: TranscriptFile = serde_json::from_str(json)
            .context("Failed to parse transcript JSON")?;
        Ok(Self::new(file.content, file.subtitles)?)
    }

    /// Parse SRT cues whose text lines are source, gloss and romanization
    pub fn from_srt_str(content: ContentInfo, srt: &str) -> Result<Self> {
        let segments = parse_srt_string(srt)?;
        Ok(Self::new(content, segments)?)
    }

    /// Load a transcript from a JSON or SRT file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = FileManager::read_to_string(path)?;

        let transcript = match FileManager::detect_file_type(path)? {
            FileType::Json => Self::from_json_str(&text)
                .with_context(|| format!("Invalid transcript file: {:?}", path))?,
            FileType::Subtitle => {
                let title = path.file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                Self::from_srt_str(ContentInfo::new(0, title), &text)
                    .with_context(|| format!("Invalid subtitle file: {:?}", path))?
            }
            other => return Err(anyhow!("Unsupported transcript file type {:?}: {:?}", other, path)),
        };

        info!("Loaded transcript '{}' ({} sentences)", transcript.content.title, transcript.len());
        Ok(transcript)
    }

    /// Find every transcript file under a directory
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        FileManager::find_files(dir, &["json", "srt"])
    }

    /// Segments in playback order
    pub fn segments(&self) -> &[Subtitle] {
        &self.segments
    }

    /// Look up a sentence by id
    pub fn get(&self, id: u32) -> Option<&Subtitle> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End of the last segment, in seconds
    pub fn duration(&self) -> f64 {
        self.segments.last().map(|s| s.end_time).unwrap_or(0.0)
    }

    /// Serialize back to the JSON file format
    pub fn to_json(&self) -> Result<String> {
        let file = TranscriptFile {
            content: self.content.clone(),
            subtitles: self.segments.clone(),
        };
        serde_json::to_string_pretty(&file).context("Failed to serialize transcript")
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Check that segments are finite, non-empty, sorted, non-overlapping and uniquely identified
pub fn validate_segments(segments: &[Subtitle]) -> std::result::Result<(), TranscriptError> {
    let mut seen = HashSet::with_capacity(segments.len());
    let mut previous: Option<&Subtitle> = None;

    for segment in segments {
        if !segment.start_time.is_finite() || !segment.end_time.is_finite() {
            return Err(TranscriptError::NonFiniteTime(segment.id));
        }
        if segment.start_time >= segment.end_time {
            return Err(TranscriptError::EmptyRange {
                id: segment.id,
                start_time: segment.start_time,
                end_time: segment.end_time,
            });
        }
        if !seen.insert(segment.id) {
            return Err(TranscriptError::DuplicateId(segment.id));
        }
        if let Some(prev) = previous {
            if segment.start_time < prev.start_time {
                return Err(TranscriptError::Unsorted {
                    id: segment.id,
                    previous_id: prev.id,
                    start_time: segment.start_time,
                });
            }
            if segment.start_time < prev.end_time {
                return Err(TranscriptError::Overlapping {
                    id: segment.id,
                    previous_id: prev.id,
                    overlap: prev.end_time - segment.start_time,
                });
            }
        }
        previous = Some(segment);
    }

    Ok(())
}

/// Parse SRT text. Each cue carries up to three text lines:
/// source text, gloss text and romanization.
pub fn parse_srt_string(content: &str) -> std::result::Result<Vec<Subtitle>, TranscriptError> {
    let normalized = content.replace("\r\n", "\n");
    let mut segments = Vec::new();

    for block in normalized.split("\n\n") {
        let lines: Vec<&str> = block
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            continue;
        }
        if lines.len() < 3 {
            return Err(TranscriptError::Parse(format!("Incomplete cue: {:?}", lines)));
        }

        let id: u32 = lines[0].trim_start_matches('\u{feff}').parse()
            .map_err(|_| TranscriptError::Parse(format!("Invalid cue number: {}", lines[0])))?;

        let caps = TIMESTAMP_REGEX.captures(lines[1])
            .ok_or_else(|| TranscriptError::Parse(format!("Invalid timing line for cue {}: {}", id, lines[1])))?;

        let start_time = parse_timestamp_to_secs(&caps, 1);
        let end_time = parse_timestamp_to_secs(&caps, 5);

        segments.push(Subtitle::new(
            id,
            start_time,
            end_time,
            lines[2],
            lines.get(3).copied().unwrap_or_default(),
            lines.get(4).copied().unwrap_or_default(),
        ));
    }

    Ok(segments)
}

// The regex guarantees every group is a run of digits
fn parse_timestamp_to_secs(caps: &regex::Captures, start_idx: usize) -> f64 {
    let group = |i: usize| -> u64 {
        caps.get(start_idx + i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let total_ms = group(0) * 3_600_000 + group(1) * 60_000 + group(2) * 1_000 + group(3);
    total_ms as f64 / 1000.0
}
