/*!
 * Subtitle-synchronized player session.
 *
 * `PlayerSession` ties one loaded transcript to a media host, the shared
 * dictionary and the bookmark stores. The host pushes time updates; the
 * session re-resolves the active sentence on each one and notifies its
 * subscribers when the highlight moves.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::app_config::PlayerConfig;
use crate::bookmarks::{SentenceBookmarks, WordBookmarks};
use crate::errors::AppError;
use crate::subtitle_processor::{Subtitle, Transcript};
use crate::timeline::{seek_to_segment, ActiveSegmentChange, PlaybackTracker, SentenceTarget};
use crate::tokenizer::{segments_containing_word, AnnotatedSpan, Dictionary};

/// The media element the player drives (an audio tag, a decoder, a test clock)
pub trait MediaHost {
    fn position(&self) -> f64;
    fn set_position(&mut self, seconds: f64);
    fn duration(&self) -> f64;
    fn is_playing(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    fn playback_rate(&self) -> f64;
    fn set_playback_rate(&mut self, rate: f64);
}

/// Clock-driven host used by the CLI and tests
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedMedia {
    position: f64,
    duration: f64,
    playing: bool,
    rate: f64,
}

impl SimulatedMedia {
    pub fn new(duration: f64) -> Self {
        Self {
            position: 0.0,
            duration,
            playing: false,
            rate: 1.0,
        }
    }

    /// Advance the clock by wall time scaled by the playback rate; stops at the end
    pub fn tick(&mut self, elapsed: Duration) -> f64 {
        if self.playing {
            self.position = (self.position + elapsed.as_secs_f64() * self.rate).min(self.duration);
            if self.position >= self.duration {
                self.playing = false;
            }
        }
        self.position
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.duration
    }
}

impl MediaHost for SimulatedMedia {
    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds.clamp(0.0, self.duration);
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
    }
}

type SegmentListener = Box<dyn Fn(&ActiveSegmentChange, &Subtitle) + Send + Sync>;

/// One content item being watched
pub struct PlayerSession<H: MediaHost> {
    transcript: Transcript,
    dictionary: Arc<Dictionary>,
    host: H,
    tracker: PlaybackTracker,
    playback_rates: Vec<f64>,
    sentence_bookmarks: SentenceBookmarks,
    word_bookmarks: WordBookmarks,
    jump_target: Option<u32>,
    listeners: Vec<SegmentListener>,
}

impl<H: MediaHost> PlayerSession<H> {
    pub fn new(transcript: Transcript, dictionary: Arc<Dictionary>, mut host: H, config: &PlayerConfig) -> Self {
        host.set_playback_rate(config.default_playback_rate);
        info!("Opened '{}' ({} sentences, {})",
              transcript.content.title,
              transcript.len(),
              Subtitle::format_clock(transcript.duration()));

        Self {
            transcript,
            dictionary,
            host,
            tracker: PlaybackTracker::new(),
            playback_rates: config.playback_rates.clone(),
            sentence_bookmarks: SentenceBookmarks::new(),
            word_bookmarks: WordBookmarks::new(),
            jump_target: None,
            listeners: Vec::new(),
        }
    }

    /// Be told whenever the highlighted sentence changes
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&ActiveSegmentChange, &Subtitle) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Handle a time update from the host
    pub fn handle_time_update(&mut self) -> Option<ActiveSegmentChange> {
        let position = self.host.position();
        let change = self.tracker.on_position_update(position, self.transcript.segments())?;

        if let Some(segment) = self.transcript.get(change.current) {
            for listener in &self.listeners {
                listener(&change, segment);
            }
        }
        Some(change)
    }

    /// Highlighted sentence
    pub fn active_segment(&self) -> Option<&Subtitle> {
        self.tracker.active_id().and_then(|id| self.transcript.get(id))
    }

    /// Seek to a sentence of this transcript (clicking a transcript line)
    pub fn jump_to_sentence(&mut self, sentence_id: u32) -> Result<&Subtitle, AppError> {
        let target = SentenceTarget::new(self.transcript.content.id, sentence_id);
        let segment = target.resolve(&self.transcript)?;
        seek_to_segment(&mut self.host, segment);
        Ok(segment)
    }

    /// Open a navigation target, e.g. a bookmarked sentence from the vocabulary page
    pub fn navigate(&mut self, target: SentenceTarget) -> Result<&Subtitle, AppError> {
        let segment = target.resolve(&self.transcript)?;
        seek_to_segment(&mut self.host, segment);
        self.jump_target = Some(segment.id);
        info!("Jumped to bookmarked sentence: \"{}\"", segment.source_text);
        Ok(segment)
    }

    /// Sentence opened through navigation, highlighted separately from playback
    pub fn jump_target(&self) -> Option<u32> {
        self.jump_target
    }

    /// Toggle play/pause; returns whether the host is now playing
    pub fn toggle_play(&mut self) -> bool {
        if self.host.is_playing() {
            self.host.pause();
        } else {
            self.host.play();
        }
        self.host.is_playing()
    }

    /// Restart the highlighted sentence and make sure playback is running
    pub fn repeat_current_sentence(&mut self) -> Option<u32> {
        let segment = self.tracker.active_id().and_then(|id| self.transcript.get(id))?;
        seek_to_segment(&mut self.host, segment);
        let id = segment.id;
        if !self.host.is_playing() {
            self.host.play();
        }
        Some(id)
    }

    /// Change speed; only the configured rates are accepted
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), AppError> {
        if !self.playback_rates.iter().any(|r| (r - rate).abs() < f64::EPSILON) {
            warn!("Rejected playback rate {}x (allowed: {:?})", rate, self.playback_rates);
            return Err(AppError::UnsupportedPlaybackRate(rate));
        }
        debug!("Playback rate set to {}x", rate);
        self.host.set_playback_rate(rate);
        Ok(())
    }

    /// Fraction of the media played, in [0, 1]
    pub fn progress(&self) -> f64 {
        let duration = self.host.duration();
        if duration <= 0.0 || !duration.is_finite() {
            return 0.0;
        }
        (self.host.position() / duration).clamp(0.0, 1.0)
    }

    /// "elapsed / total" in m:ss
    pub fn clock(&self) -> String {
        format!("{} / {}",
                Subtitle::format_clock(self.host.position()),
                Subtitle::format_clock(self.host.duration()))
    }

    /// Word chips for one sentence
    pub fn tokenized(&self, sentence_id: u32) -> Option<Vec<AnnotatedSpan>> {
        self.transcript
            .get(sentence_id)
            .map(|segment| self.dictionary.tokenize(&segment.source_text))
    }

    /// Sentences in which a dictionary word appears
    pub fn sentences_with_word(&self, surface_form: &str) -> Vec<&Subtitle> {
        segments_containing_word(surface_form, self.transcript.segments(), &self.dictionary)
    }

    pub fn toggle_sentence_bookmark(&mut self, sentence_id: u32) -> Result<bool, AppError> {
        if self.transcript.get(sentence_id).is_none() {
            return Err(AppError::SentenceNotFound {
                content_id: self.transcript.content.id,
                sentence_id,
            });
        }
        Ok(self.sentence_bookmarks.toggle(sentence_id))
    }

    /// Bookmark a word chip; returns `None` for words not in the dictionary
    pub fn toggle_word_bookmark(&mut self, surface_form: &str) -> Option<bool> {
        if !self.dictionary.contains(surface_form) {
            warn!("'{}' is not a dictionary word", surface_form);
            return None;
        }
        Some(self.word_bookmarks.toggle(surface_form.to_string()))
    }

    /// Bookmarked sentences in transcript order, ready for a quiz
    pub fn bookmarked_pool(&self) -> Vec<Subtitle> {
        self.sentence_bookmarks.select(self.transcript.segments())
    }

    pub fn sentence_bookmarks(&self) -> &SentenceBookmarks {
        &self.sentence_bookmarks
    }

    pub fn sentence_bookmarks_mut(&mut self) -> &mut SentenceBookmarks {
        &mut self.sentence_bookmarks
    }

    pub fn word_bookmarks(&self) -> &WordBookmarks {
        &self.word_bookmarks
    }

    pub fn word_bookmarks_mut(&mut self) -> &mut WordBookmarks {
        &mut self.word_bookmarks
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
