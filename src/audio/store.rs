use std::sync::Arc;

use tracing::debug;

use crate::{audio::state::PlaybackState, storage::KeyValueStore};

pub const PLAYER_STATE_KEY: &str = "playerState";

pub struct PlaybackStore {
    backend: Arc<dyn KeyValueStore>,
    last_saved: Option<String>,
    cleared: bool,
}

impl PlaybackStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            last_saved: None,
            cleared: false,
        }
    }

    /// Missing or unreadable blobs give the default state.
    pub fn load(&mut self) -> PlaybackState {
        let Some(raw) = self.backend.get(PLAYER_STATE_KEY) else {
            return PlaybackState::default();
        };

        match serde_json::from_str::<PlaybackState>(&raw) {
            Ok(mut state) => {
                state.sanitize();
                self.last_saved = Some(raw);
                state
            }
            Err(e) => {
                debug!(error = %e, "playback_store_parse_failed");
                PlaybackState::default()
            }
        }
    }

    pub fn serialize(state: &PlaybackState) -> Option<String> {
        let mut snapshot = state.clone();
        snapshot.sanitize();
        serde_json::to_string(&snapshot).ok()
    }

    /// Returns whether the backend was written; unchanged snapshots are skipped.
    pub fn save(&mut self, state: &PlaybackState) -> bool {
        let Some(raw) = Self::serialize(state) else {
            return false;
        };
        if self.last_saved.as_deref() == Some(raw.as_str()) {
            return false;
        }

        match self.backend.set(PLAYER_STATE_KEY, &raw) {
            Ok(()) => {
                self.last_saved = Some(raw);
                self.cleared = false;
                true
            }
            Err(e) => {
                debug!(error = %e, "playback_store_save_failed");
                false
            }
        }
    }

    /// Periodic flavour of `save`: after a `clear` nothing is written until an
    /// explicit `save` stores a new session.
    pub fn refresh(&mut self, state: &PlaybackState) -> bool {
        !self.cleared && self.save(state)
    }

    pub fn clear(&mut self) {
        self.last_saved = None;
        self.cleared = true;
        if let Err(e) = self.backend.remove(PLAYER_STATE_KEY) {
            debug!(error = %e, "playback_store_clear_failed");
        }
    }

    pub fn stored(&self) -> Option<String> {
        self.backend.get(PLAYER_STATE_KEY)
    }
}
