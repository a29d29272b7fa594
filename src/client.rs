use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use flume::Receiver;
use tracing::{info, warn};
use url::Url;

use crate::{
    audio::{
        commands::PlayerCommand,
        controller::PlaybackController,
        media::SimulatedMedia,
        state::{PlaybackState, SessionPhase},
        traits::{MediaElement, TrackLookup},
    },
    auth::{AUTH_TOKEN_KEY, TokenPresence},
    config::ClientConfig,
    dom::Document,
    error::{ClientError, StorageError},
    event::{bus::NavigationBus, events::Event},
    http::ApiService,
    storage::{FileStore, KeyValueStore},
    ui::{
        history::HashHistory,
        initializers::InitializerRegistry,
        route::Route,
        router::{APP_ROOT, RouteOutcome, Router},
        traits::TemplateSource,
    },
    util::{
        task::{AUTOSAVE_TASK, MONITOR_TASK, TaskManager},
        url::AssetResolver,
    },
};

/// Region for the persistent player widget, outside the router's mount point.
pub const PLAYER_REGION: &str = "#player-bar";

const MONITOR_PERIOD: Duration = Duration::from_millis(250);

pub const DEFAULT_PLAYER_BAR: &str = r#"<div class="player-bar">
  <img id="player-cover" alt="">
  <div class="player-meta"><span id="player-title"></span><span id="player-artist"></span></div>
  <button id="player-play" aria-label="Play"></button>
  <span id="player-current-time"></span>
  <input id="player-progress" type="range" min="0" max="100">
  <span id="player-duration"></span>
  <button id="player-mute"></button>
  <input id="player-volume" type="range" min="0" max="1" step="0.01">
  <button id="player-repeat"></button>
  <button id="player-shuffle"></button>
  <button id="player-video"></button>
</div>"#;

/// Collaborators a client is assembled from.
pub struct ClientParts {
    pub media: Arc<dyn MediaElement>,
    pub tracks: Arc<dyn TrackLookup>,
    pub templates: Arc<dyn TemplateSource>,
    pub storage: Arc<dyn KeyValueStore>,
    pub origin: Url,
    pub initial_hash: String,
    pub player_markup: String,
}

/// One router and one playback session sharing a document. Build it once at
/// startup and pass it around by reference.
pub struct Client {
    router: Router,
    controller: Arc<PlaybackController>,
    document: Document,
    bus: NavigationBus,
    initializers: InitializerRegistry,
    storage: Arc<dyn KeyValueStore>,
    tasks: Mutex<TaskManager>,
    command_rx: Receiver<PlayerCommand>,
    event_rx: Receiver<Event>,
}

impl Client {
    pub fn new(parts: ClientParts) -> Self {
        let document = Document::new(&[PLAYER_REGION, APP_ROOT]);
        if let Err(e) = document.replace_region(PLAYER_REGION, &parts.player_markup) {
            warn!(error = %e, "player_region_unavailable");
        }

        let (command_tx, command_rx) = flume::unbounded();
        let (event_tx, event_rx) = flume::unbounded();
        let bus = NavigationBus::new();
        let initializers = InitializerRegistry::new();

        let controller = Arc::new(PlaybackController::new(
            parts.media,
            parts.tracks,
            AssetResolver::new(parts.origin),
            document.clone(),
            parts.storage.clone(),
            command_tx,
            event_tx.clone(),
        ));

        let rebind = Arc::clone(&controller);
        bus.subscribe(move |_| {
            rebind.bind_controls();
        });

        let router = Router::new(
            HashHistory::new(&parts.initial_hash),
            parts.templates,
            Arc::new(TokenPresence::new(parts.storage.clone())),
            document.clone(),
            bus.clone(),
            initializers.clone(),
            event_tx,
        );

        Self {
            router,
            controller,
            document,
            bus,
            initializers,
            storage: parts.storage,
            tasks: Mutex::new(TaskManager::new()),
            command_rx,
            event_rx,
        }
    }

    /// The native client: HTTP collaborators, a file-backed store in the data
    /// directory and a simulated media element.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let api = Arc::new(ApiService::new(config.api_origin.clone())?);
        let storage = Arc::new(FileStore::open(&config.data_dir)?);

        Ok(Self::new(ClientParts {
            media: Arc::new(SimulatedMedia::new()),
            tracks: api.clone(),
            templates: api,
            storage,
            origin: config.api_origin.clone(),
            initial_hash: config.start_route.clone(),
            player_markup: DEFAULT_PLAYER_BAR.to_string(),
        }))
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    /// Restores the persisted session, binds the persistent player widget and
    /// mounts the initial route.
    pub async fn boot(&self) -> RouteOutcome {
        self.controller.bind_controls();
        self.controller.restore().await;
        let outcome = self.router.handle_route_change().await;
        info!(route = ?outcome.route(), "client_booted");
        outcome
    }

    pub fn start_background(&self, autosave: Duration) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.spawn(MONITOR_TASK, self.controller.start_monitor(MONITOR_PERIOD));
        tasks.spawn(AUTOSAVE_TASK, self.controller.start_autosave(autosave));
    }

    pub fn shutdown(&self) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
        self.controller.autosave();
        info!("client_shutdown");
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn controller(&self) -> &Arc<PlaybackController> {
        &self.controller
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn bus(&self) -> &NavigationBus {
        &self.bus
    }

    pub fn initializers(&self) -> &InitializerRegistry {
        &self.initializers
    }

    pub fn commands(&self) -> &Receiver<PlayerCommand> {
        &self.command_rx
    }

    pub fn events(&self) -> &Receiver<Event> {
        &self.event_rx
    }

    /// Runs every player command bound controls have queued so far.
    pub async fn drain_commands(&self) -> usize {
        let mut handled = 0;
        while let Ok(command) = self.command_rx.try_recv() {
            self.controller.dispatch(command).await;
            handled += 1;
        }
        handled
    }

    pub async fn play_track_by_id(&self, id: &str) -> bool {
        self.controller.play_track_by_id(id).await
    }

    pub fn stop(&self, reset_identity: bool) {
        self.controller.stop(reset_identity);
    }

    pub fn pause(&self) {
        self.controller.pause();
    }

    pub async fn resume(&self) -> bool {
        self.controller.resume().await
    }

    pub async fn toggle_play(&self) -> bool {
        self.controller.toggle_play().await
    }

    pub fn seek(&self, time: f64) -> bool {
        self.controller.seek(time)
    }

    pub fn set_volume(&self, volume: f64) -> bool {
        self.controller.set_volume(volume)
    }

    pub fn toggle_mute(&self) -> bool {
        self.controller.toggle_mute()
    }

    pub fn toggle_repeat(&self) -> bool {
        self.controller.toggle_repeat()
    }

    pub fn toggle_shuffle(&self) -> bool {
        self.controller.toggle_shuffle()
    }

    pub fn toggle_video(&self) -> bool {
        self.controller.toggle_video()
    }

    pub async fn next(&self) -> bool {
        self.controller.next().await
    }

    pub async fn previous(&self) -> bool {
        self.controller.previous().await
    }

    pub fn render(&self) -> usize {
        self.controller.render()
    }

    pub fn get_state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn phase(&self) -> SessionPhase {
        self.controller.phase()
    }

    pub fn set_track_list(&self, ids: Vec<String>) {
        self.controller.set_track_list(ids);
    }

    pub fn set_queue_tracks(&self, ids: Vec<String>) {
        self.controller.set_queue_tracks(ids);
    }

    pub async fn navigate(&self, target: &str) -> RouteOutcome {
        self.router.navigate(target).await
    }

    pub async fn back(&self) -> Option<RouteOutcome> {
        self.router.back().await
    }

    pub async fn forward(&self) -> Option<RouteOutcome> {
        self.router.forward().await
    }

    pub fn get_current_route(&self) -> Route {
        self.router.current_route()
    }

    /// Stores the session token issued by the login form and leaves the auth
    /// pages.
    pub async fn sign_in(&self, token: &str) -> Result<RouteOutcome, StorageError> {
        self.storage.set(AUTH_TOKEN_KEY, token)?;
        info!("signed_in");
        Ok(self.router.navigate(Route::default_route().as_str()).await)
    }

    pub async fn sign_out(&self) -> Result<RouteOutcome, StorageError> {
        self.storage.remove(AUTH_TOKEN_KEY)?;
        self.controller.stop(true);
        info!("signed_out");
        Ok(self.router.navigate(Route::login().as_str()).await)
    }
}
