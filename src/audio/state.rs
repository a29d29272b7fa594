use serde::{Deserialize, Serialize};

pub const NOTHING_PLAYING: &str = "Nothing playing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackState {
    pub track_id: Option<String>,
    pub title: String,
    pub artist: String,
    pub cover_url: Option<String>,
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub duration: f64,
    pub current_time: f64,
    pub is_playing: bool,
    pub volume: f64,
    pub is_muted: bool,
    pub is_repeat: bool,
    pub is_shuffle: bool,
    pub show_video: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            track_id: None,
            title: NOTHING_PLAYING.to_string(),
            artist: String::new(),
            cover_url: None,
            audio_url: None,
            video_url: None,
            duration: 0.0,
            current_time: 0.0,
            is_playing: false,
            volume: 1.0,
            is_muted: false,
            is_repeat: false,
            is_shuffle: false,
            show_video: false,
        }
    }
}

impl PlaybackState {
    pub fn has_track(&self) -> bool {
        self.audio_url.is_some()
    }

    /// Drops everything that identifies the loaded track; preferences stay.
    pub fn clear_identity(&mut self) {
        let defaults = Self::default();
        self.track_id = defaults.track_id;
        self.title = defaults.title;
        self.artist = defaults.artist;
        self.cover_url = defaults.cover_url;
        self.audio_url = defaults.audio_url;
        self.video_url = defaults.video_url;
        self.duration = defaults.duration;
        self.current_time = defaults.current_time;
        self.is_playing = false;
        self.show_video = false;
    }

    pub fn sanitize(&mut self) {
        if !self.duration.is_finite() || self.duration < 0.0 {
            self.duration = 0.0;
        }
        if !self.current_time.is_finite() || self.current_time < 0.0 {
            self.current_time = 0.0;
        }
        if self.duration > 0.0 && self.current_time > self.duration {
            self.current_time = self.duration;
        }
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        if self.audio_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.audio_url = None;
        }
        if self.video_url.is_none() {
            self.show_video = false;
        }
    }

    pub fn progress_percent(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
