//! The view-model behind the single screen.
//!
//! `App` is plain state: the event loop folds player notifications into it
//! and the UI renders it. It never talks to the engine.

use std::time::{Duration, Instant};

use crate::library::Track;
use crate::player::PlayerEvent;

/// How long a status (error) line stays on screen.
pub const STATUS_TTL: Duration = Duration::from_secs(4);

pub struct App {
    pub tracks: Vec<Track>,
    /// Display titles in playback order, as announced by the player.
    pub titles: Vec<String>,
    /// Cursor position in the track list.
    pub selected: usize,
    pub now_playing: Option<usize>,
    pub now_title: Option<String>,
    pub total: Option<Duration>,
    pub position: Duration,
    pub position_text: String,
    pub playing: bool,
    /// Transient user-visible error and when it appeared.
    pub status: Option<(String, Instant)>,
    pub current_dir: Option<String>,
}

impl App {
    pub fn new(tracks: Vec<Track>) -> Self {
        let titles = tracks.iter().map(|t| t.display.clone()).collect();
        Self {
            tracks,
            titles,
            selected: 0,
            now_playing: None,
            now_title: None,
            total: None,
            position: Duration::ZERO,
            position_text: "00:00".to_string(),
            playing: false,
            status: None,
            current_dir: None,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    /// Move the cursor down one row, wrapping at the end.
    pub fn select_next(&mut self) {
        if !self.tracks.is_empty() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move the cursor up one row, wrapping at the top.
    pub fn select_prev(&mut self) {
        if !self.tracks.is_empty() {
            self.selected = (self.selected + self.tracks.len() - 1) % self.tracks.len();
        }
    }

    /// Fold one player notification into the view state.
    pub fn apply(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::CatalogReady(titles) => self.titles = titles,
            PlayerEvent::TrackChanged {
                index,
                title,
                duration,
            } => {
                self.now_playing = Some(index);
                self.now_title = Some(title);
                self.total = duration;
                self.position = Duration::ZERO;
                self.position_text = "00:00".to_string();
                // Cursor follows playback.
                self.selected = index;
            }
            PlayerEvent::Progress { position, text } => {
                self.position = position;
                self.position_text = text;
            }
            PlayerEvent::PlayStateChanged(playing) => self.playing = playing,
            PlayerEvent::UserError(message) => self.status = Some((message, Instant::now())),
        }
    }

    /// Drop the status line once it has been on screen long enough.
    pub fn expire_status(&mut self) {
        if let Some((_, since)) = &self.status {
            if since.elapsed() >= STATUS_TTL {
                self.status = None;
            }
        }
    }

    /// Fraction of the track already played, for the progress gauge.
    pub fn progress_ratio(&self) -> f64 {
        match self.total {
            Some(total) if !total.is_zero() => {
                (self.position.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}
