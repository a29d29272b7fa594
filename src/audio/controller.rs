use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use flume::Sender;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::{
    audio::{
        commands::PlayerCommand,
        controls::BoundControls,
        queue::QueueManager,
        state::{PlaybackState, SessionPhase},
        store::PlaybackStore,
        traits::{MediaElement, MediaEvent, TrackLookup},
    },
    dom::Document,
    error::PlaybackError,
    event::events::Event,
    storage::KeyValueStore,
    util::url::AssetResolver,
};

/// Seconds into a track after which "previous" restarts it instead.
const RESTART_THRESHOLD: f64 = 3.0;

/// Sole owner of the media element and the playback state. Every mutation of
/// either goes through here and ends with a render and a save.
pub struct PlaybackController {
    media: Arc<dyn MediaElement>,
    tracks: Arc<dyn TrackLookup>,
    resolver: AssetResolver,
    document: Document,
    state: RwLock<PlaybackState>,
    phase: RwLock<SessionPhase>,
    store: Mutex<PlaybackStore>,
    controls: Mutex<BoundControls>,
    queue: Mutex<QueueManager>,
    lookup_generation: AtomicU64,
    play_generation: AtomicU64,
    command_tx: Sender<PlayerCommand>,
    event_tx: Sender<Event>,
}

impl PlaybackController {
    pub fn new(
        media: Arc<dyn MediaElement>,
        tracks: Arc<dyn TrackLookup>,
        resolver: AssetResolver,
        document: Document,
        storage: Arc<dyn KeyValueStore>,
        command_tx: Sender<PlayerCommand>,
        event_tx: Sender<Event>,
    ) -> Self {
        let mut store = PlaybackStore::new(storage);
        let state = store.load();

        media.set_volume(state.volume);
        media.set_muted(state.is_muted);

        Self {
            media,
            tracks,
            resolver,
            document,
            state: RwLock::new(state),
            phase: RwLock::new(SessionPhase::Idle),
            store: Mutex::new(store),
            controls: Mutex::new(BoundControls::new()),
            queue: Mutex::new(QueueManager::new()),
            lookup_generation: AtomicU64::new(0),
            play_generation: AtomicU64::new(0),
            command_tx,
            event_tx,
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, PlaybackState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, PlaybackState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn store_lock(&self) -> MutexGuard<'_, PlaybackStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn controls_lock(&self) -> MutexGuard<'_, BoundControls> {
        self.controls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn queue_lock(&self) -> MutexGuard<'_, QueueManager> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: SessionPhase) {
        *self.phase.write().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> PlaybackState {
        self.read_state().clone()
    }

    pub fn media(&self) -> &Arc<dyn MediaElement> {
        &self.media
    }

    /// Invalidates any play attempt still waiting on the media element.
    fn supersede(&self) -> u64 {
        self.play_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.play_generation.load(Ordering::SeqCst) == generation
    }

    fn settle_superseded(&self) {
        if self.phase() != SessionPhase::Loading && !self.read_state().is_playing {
            self.media.pause();
        }
    }

    /// Stored locations can be relative; they are made absolute against the
    /// origin before the element sees them. Unresolvable ones drop the track.
    fn resolve_stored_audio(&self) -> Option<String> {
        let mut state = self.write_state();
        let stored = state.audio_url.clone()?;
        match self.resolver.resolve(&stored) {
            Some(url) => {
                state.audio_url = Some(url.clone());
                Some(url)
            }
            None => {
                warn!(audio_url = %stored, "stored_audio_unresolvable");
                state.clear_identity();
                None
            }
        }
    }

    pub fn render(&self) -> usize {
        let state = self.state();
        self.controls_lock().render(&self.document, &state)
    }

    pub fn save(&self) -> bool {
        let state = self.state();
        self.store_lock().save(&state)
    }

    /// Saves unless the session was reset since the last explicit save.
    pub fn autosave(&self) -> bool {
        self.sync_position();
        let state = self.state();
        self.store_lock().refresh(&state)
    }

    fn commit(&self) {
        self.render();
        self.save();
    }

    /// Claims the control nodes currently in the document and paints them.
    pub fn bind_controls(&self) -> usize {
        let attached = self
            .controls_lock()
            .bind(&self.document, &self.command_tx);
        if attached > 0 {
            debug!(attached, "player_controls_bound");
        }
        self.render();
        attached
    }

    /// Copies the element's live position and duration into the state while it
    /// holds the state's track.
    pub fn sync_position(&self) {
        let src = self.media.src();
        let mut state = self.write_state();
        if src.is_none() || src != state.audio_url {
            return;
        }

        let time = self.media.current_time();
        if time.is_finite() {
            state.current_time = time.max(0.0);
        }
        let duration = self.media.duration();
        if duration.is_finite() && duration > 0.0 {
            state.duration = duration;
        }
    }

    fn known_duration(&self) -> f64 {
        let duration = self.media.duration();
        if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            self.read_state().duration
        }
    }

    fn finish_play(
        &self,
        result: Result<(), PlaybackError>,
        failure: SessionPhase,
        announce: Option<String>,
    ) -> bool {
        match result {
            Ok(()) => {
                let duration = self.media.duration();
                {
                    let mut state = self.write_state();
                    state.is_playing = true;
                    if duration.is_finite() && duration > 0.0 {
                        state.duration = duration;
                    }
                }
                self.set_phase(SessionPhase::Playing);
                if let Some(id) = announce {
                    info!(track_id = %id, "track_started");
                    let _ = self.event_tx.send(Event::TrackStarted(id));
                }
                self.commit();
                true
            }
            Err(e) => {
                self.write_state().is_playing = false;
                self.set_phase(failure);
                warn!(error = %e, "playback_rejected");
                let _ = self.event_tx.send(Event::PlaybackFailed(e.to_string()));
                self.commit();
                false
            }
        }
    }

    fn unavailable(&self, id: &str, reason: String) -> bool {
        warn!(track_id = %id, reason = %reason, "track_unavailable");
        let _ = self.event_tx.send(Event::TrackUnavailable(id.to_string()));
        false
    }

    /// Looks the track up, loads it and starts it. Tracks without a playable
    /// audio location leave everything untouched.
    pub async fn play_track_by_id(&self, id: &str) -> bool {
        let lookup = self.lookup_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let payload = match self.tracks.get_track(id).await {
            Ok(payload) => payload,
            Err(e) => return self.unavailable(id, e.to_string()),
        };
        let metadata = match payload.validate() {
            Ok(metadata) => metadata,
            Err(e) => return self.unavailable(id, e.to_string()),
        };
        let Some(audio_url) = self.resolver.resolve(&metadata.audio_url) else {
            return self.unavailable(id, format!("unresolvable audio {}", metadata.audio_url));
        };
        if self.lookup_generation.load(Ordering::SeqCst) != lookup {
            debug!(track_id = %id, "track_lookup_superseded");
            return false;
        }

        let cover_url = metadata
            .cover_url
            .as_deref()
            .and_then(|u| self.resolver.resolve(u));
        let video_url = metadata
            .video_url
            .as_deref()
            .and_then(|u| self.resolver.resolve(u));
        let track_id = metadata.id.clone();

        let generation = self.supersede();
        self.media.pause();
        self.media.set_src(Some(&audio_url));
        self.media.set_current_time(0.0);

        {
            let mut state = self.write_state();
            state.track_id = Some(metadata.id);
            state.title = metadata.title;
            state.artist = metadata.artist;
            state.cover_url = cover_url;
            state.audio_url = Some(audio_url);
            state.show_video = state.show_video && video_url.is_some();
            state.video_url = video_url;
            state.duration = metadata.duration.unwrap_or(0.0);
            state.current_time = 0.0;
            state.is_playing = false;
        }
        self.set_phase(SessionPhase::Loading);
        self.queue_lock().note_played(&track_id);
        self.commit();
        info!(track_id = %track_id, "track_loading");

        let result = self.media.play().await;
        if !self.is_current(generation) {
            debug!(track_id = %track_id, "play_superseded");
            self.settle_superseded();
            return false;
        }

        self.finish_play(result, SessionPhase::Idle, Some(track_id))
    }

    pub fn stop(&self, reset_identity: bool) {
        self.supersede();
        self.media.pause();
        self.media.set_current_time(0.0);
        self.set_phase(SessionPhase::Idle);

        if reset_identity {
            self.media.set_src(None);
            self.write_state().clear_identity();
            self.render();
            self.store_lock().clear();
        } else {
            {
                let mut state = self.write_state();
                state.current_time = 0.0;
                state.is_playing = false;
            }
            self.commit();
        }
        info!(reset_identity, "playback_stopped");
    }

    pub fn pause(&self) {
        self.supersede();
        self.media.pause();
        self.sync_position();
        self.write_state().is_playing = false;
        if matches!(self.phase(), SessionPhase::Playing | SessionPhase::Loading) {
            self.set_phase(SessionPhase::Paused);
        }
        self.commit();
    }

    /// Restarts the loaded track from where it stopped. Nothing loaded means
    /// nothing to resume.
    pub async fn resume(&self) -> bool {
        let audio_url = self.resolve_stored_audio();
        let position = self.read_state().current_time;
        let Some(audio_url) = audio_url else {
            self.write_state().is_playing = false;
            self.commit();
            return false;
        };

        let generation = self.supersede();
        if self.media.src().as_deref() != Some(audio_url.as_str()) {
            self.media.set_src(Some(&audio_url));
            self.media.set_current_time(position);
        }
        self.set_phase(SessionPhase::Loading);

        let result = self.media.play().await;
        if !self.is_current(generation) {
            self.settle_superseded();
            return false;
        }

        self.finish_play(result, SessionPhase::Paused, None)
    }

    pub async fn toggle_play(&self) -> bool {
        let playing = self.read_state().is_playing;
        if playing {
            self.pause();
            false
        } else {
            self.resume().await
        }
    }

    pub fn seek(&self, time: f64) -> bool {
        if !time.is_finite() {
            return false;
        }

        let duration = self.known_duration();
        let target = if duration > 0.0 {
            time.clamp(0.0, duration)
        } else {
            time.max(0.0)
        };
        self.media.set_current_time(target);
        self.write_state().current_time = target;
        self.commit();
        true
    }

    pub fn seek_percent(&self, percent: f64) -> bool {
        let duration = self.known_duration();
        if !percent.is_finite() || duration <= 0.0 {
            return false;
        }
        self.seek(percent.clamp(0.0, 100.0) / 100.0 * duration)
    }

    pub fn set_volume(&self, volume: f64) -> bool {
        if !(0.0..=1.0).contains(&volume) {
            return false;
        }

        self.media.set_volume(volume);
        self.media.set_muted(false);
        {
            let mut state = self.write_state();
            state.volume = volume;
            state.is_muted = false;
        }
        self.commit();
        true
    }

    pub fn toggle_mute(&self) -> bool {
        let muted = {
            let mut state = self.write_state();
            state.is_muted = !state.is_muted;
            state.is_muted
        };
        self.media.set_muted(muted);
        self.commit();
        muted
    }

    pub fn toggle_repeat(&self) -> bool {
        let repeat = {
            let mut state = self.write_state();
            state.is_repeat = !state.is_repeat;
            state.is_repeat
        };
        self.commit();
        repeat
    }

    pub fn toggle_shuffle(&self) -> bool {
        let shuffle = {
            let mut state = self.write_state();
            state.is_shuffle = !state.is_shuffle;
            state.is_shuffle
        };
        self.commit();
        shuffle
    }

    /// Only tracks with a video can show one.
    pub fn toggle_video(&self) -> bool {
        let shown = {
            let mut state = self.write_state();
            state.show_video = state.video_url.is_some() && !state.show_video;
            state.show_video
        };
        self.commit();
        shown
    }

    pub fn set_track_list(&self, ids: Vec<String>) {
        let current = self.read_state().track_id.clone();
        let index = current.and_then(|id| ids.iter().position(|t| *t == id));
        self.queue_lock().set_track_list(ids, index);
    }

    pub fn set_queue_tracks(&self, ids: Vec<String>) {
        self.queue_lock().set_queue_tracks(ids);
    }

    pub async fn next(&self) -> bool {
        let shuffle = self.read_state().is_shuffle;
        let next = self.queue_lock().next_track(shuffle);
        match next {
            Some(id) => self.play_track_by_id(&id).await,
            None => {
                let _ = self.event_tx.send(Event::QueueEnded);
                false
            }
        }
    }

    pub async fn previous(&self) -> bool {
        self.sync_position();
        if self.read_state().current_time > RESTART_THRESHOLD {
            return self.seek(0.0);
        }

        let previous = self.queue_lock().previous_track();
        match previous {
            Some(id) => self.play_track_by_id(&id).await,
            None => self.seek(0.0),
        }
    }

    pub async fn handle_media_event(&self, event: MediaEvent) {
        match event {
            MediaEvent::LoadedMetadata(duration) => {
                if duration.is_finite() && duration > 0.0 {
                    self.write_state().duration = duration;
                    self.render();
                }
            }
            MediaEvent::TimeUpdate(time) => {
                if time.is_finite() {
                    self.write_state().current_time = time.max(0.0);
                    self.render();
                }
            }
            MediaEvent::Ended => self.on_ended().await,
            MediaEvent::Error(reason) => {
                self.supersede();
                self.media.pause();
                self.write_state().is_playing = false;
                self.set_phase(SessionPhase::Error);
                error!(reason = %reason, "media_error");
                let _ = self.event_tx.send(Event::PlaybackFailed(reason));
                self.commit();
            }
        }
    }

    async fn on_ended(&self) {
        let repeat = {
            let mut state = self.write_state();
            state.is_playing = false;
            state.current_time = state.duration;
            state.is_repeat
        };
        self.set_phase(SessionPhase::Ended);
        let _ = self.event_tx.send(Event::TrackEnded);

        if repeat {
            let generation = self.supersede();
            self.media.set_current_time(0.0);
            self.write_state().current_time = 0.0;
            self.set_phase(SessionPhase::Loading);

            let result = self.media.play().await;
            if !self.is_current(generation) {
                self.settle_superseded();
                return;
            }
            self.finish_play(result, SessionPhase::Idle, None);
            return;
        }

        let shuffle = self.read_state().is_shuffle;
        let next = self.queue_lock().next_track(shuffle);
        if let Some(id) = next {
            if self.play_track_by_id(&id).await {
                return;
            }
        }

        if self.phase() == SessionPhase::Ended {
            self.set_phase(SessionPhase::Idle);
            info!("queue_ended");
            let _ = self.event_tx.send(Event::QueueEnded);
            self.commit();
        }
    }

    /// Reattaches the persisted track to the element and resumes it when it
    /// was playing at the last save.
    pub async fn restore(&self) -> bool {
        let audio_url = self.resolve_stored_audio();
        let snapshot = self.state();
        self.media.set_volume(snapshot.volume);
        self.media.set_muted(snapshot.is_muted);

        let Some(audio_url) = audio_url else {
            self.render();
            return false;
        };
        self.media.set_src(Some(&audio_url));
        self.media.set_current_time(snapshot.current_time);

        if !snapshot.is_playing {
            self.set_phase(SessionPhase::Paused);
            self.render();
            return false;
        }

        let generation = self.supersede();
        self.set_phase(SessionPhase::Loading);
        let result = self.media.play().await;
        if !self.is_current(generation) {
            self.settle_superseded();
            return false;
        }
        info!(track_id = ?snapshot.track_id, "playback_restored");
        self.finish_play(result, SessionPhase::Paused, None)
    }

    pub async fn dispatch(&self, command: PlayerCommand) {
        debug!(?command, "player_command");
        match command {
            PlayerCommand::PlayTrack(id) => {
                self.play_track_by_id(&id).await;
            }
            PlayerCommand::TogglePlay => {
                self.toggle_play().await;
            }
            PlayerCommand::SeekPercent(percent) => {
                self.seek_percent(percent);
            }
            PlayerCommand::SetVolume(volume) => {
                self.set_volume(volume);
            }
            PlayerCommand::ToggleMute => {
                self.toggle_mute();
            }
            PlayerCommand::ToggleRepeat => {
                self.toggle_repeat();
            }
            PlayerCommand::ToggleShuffle => {
                self.toggle_shuffle();
            }
            PlayerCommand::ToggleVideo => {
                self.toggle_video();
            }
            PlayerCommand::Next => {
                self.next().await;
            }
            PlayerCommand::Previous => {
                self.previous().await;
            }
        }
    }

    fn poll_media(&self) -> Vec<MediaEvent> {
        let mut events = Vec::new();

        let duration = self.media.duration();
        if duration.is_finite() && duration > 0.0 && duration != self.read_state().duration {
            events.push(MediaEvent::LoadedMetadata(duration));
        }
        if self.media.ended() {
            events.push(MediaEvent::Ended);
        } else {
            events.push(MediaEvent::TimeUpdate(self.media.current_time()));
        }

        events
    }

    /// Feeds element progress back into the state while something plays.
    pub fn start_monitor(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let controller = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if controller.phase() != SessionPhase::Playing {
                    continue;
                }

                for event in controller.poll_media() {
                    controller.handle_media_event(event).await;
                }
            }
        })
    }

    /// Periodic save for mutations that never go through `commit`, such as
    /// position drift. Unchanged snapshots are not rewritten.
    pub fn start_autosave(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let controller = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if controller.autosave() {
                    debug!("playback_autosaved");
                }
            }
        })
    }
}
