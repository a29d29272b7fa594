#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tokio::sync::Notify;
use tunewire::{
    audio::{media::SimulatedMedia, traits::TrackLookup},
    auth::AUTH_TOKEN_KEY,
    client::{Client, ClientParts, DEFAULT_PLAYER_BAR},
    error::NetworkError,
    http::model::TrackPayload,
    storage::{KeyValueStore, MemoryStore},
    ui::traits::TemplateSource,
};
use url::Url;

pub const ORIGIN: &str = "http://localhost:3000";

pub const PLAYER_VIEW: &str = r#"<section id="player-view">
  <button id="player-play"></button><input id="player-progress"><input id="player-volume">
</section>"#;

#[derive(Default)]
pub struct FakeTemplates {
    templates: Mutex<HashMap<String, String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub fetches: AtomicUsize,
}

impl FakeTemplates {
    pub fn standard() -> Self {
        let source = Self::default();
        for view in ["feed", "lists", "library", "search", "upload", "profile", "login", "register"] {
            source.insert(
                &format!("views/{view}.html"),
                &format!(r#"<section id="{view}-view"><h1>{view}</h1></section>"#),
            );
        }
        source.insert("views/player.html", PLAYER_VIEW);
        source.insert(
            "views/collection.html",
            r#"<section id="collection-view"></section>"#,
        );
        source
    }

    pub fn insert(&self, location: &str, markup: &str) {
        self.templates
            .lock()
            .unwrap()
            .insert(location.to_string(), markup.to_string());
    }

    pub fn remove(&self, location: &str) {
        self.templates.lock().unwrap().remove(location);
    }

    /// Holds fetches of `location` until the returned gate is notified.
    pub fn gate(&self, location: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(location.to_string(), gate.clone());
        gate
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TemplateSource for FakeTemplates {
    async fn fetch_template(&self, location: &str) -> Result<String, NetworkError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().get(location).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.templates
            .lock()
            .unwrap()
            .get(location)
            .cloned()
            .ok_or_else(|| NetworkError::Request {
                url: location.to_string(),
                reason: "connection refused".into(),
            })
    }
}

#[derive(Default)]
pub struct FakeTracks {
    tracks: HashMap<String, String>,
}

impl FakeTracks {
    pub fn standard() -> Self {
        let mut tracks = HashMap::new();
        tracks.insert(
            "abc".to_string(),
            r#"{"id":"abc","audio_url":"/u/a.mp3","title":"T","artist_name":"A"}"#.to_string(),
        );
        tracks.insert(
            "xyz".to_string(),
            r#"{"id":"xyz","audio_url":"/u/x.mp3","title":"X","artist_name":"B","cover_image_url":"/c/x.png"}"#
                .to_string(),
        );
        tracks.insert(
            "silent".to_string(),
            r#"{"id":"silent","title":"No audio","audio_url":""}"#.to_string(),
        );
        Self { tracks }
    }
}

#[async_trait]
impl TrackLookup for FakeTracks {
    async fn get_track(&self, id: &str) -> Result<TrackPayload, NetworkError> {
        let raw = self.tracks.get(id).ok_or_else(|| NetworkError::Status {
            url: format!("/tracks/{id}"),
            status: 404,
        })?;
        TrackPayload::from_json(raw).map_err(|e| NetworkError::Body(e.to_string()))
    }
}

pub struct TestClient {
    pub client: Client,
    pub media: Arc<SimulatedMedia>,
    pub storage: Arc<dyn KeyValueStore>,
    pub templates: Arc<FakeTemplates>,
}

pub struct Setup {
    pub initial_hash: &'static str,
    pub signed_in: bool,
    pub player_markup: &'static str,
    pub storage: Arc<dyn KeyValueStore>,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            initial_hash: "#/feed",
            signed_in: true,
            player_markup: DEFAULT_PLAYER_BAR,
            storage: Arc::new(MemoryStore::new()),
        }
    }
}

pub fn client(setup: Setup) -> TestClient {
    if setup.signed_in {
        setup.storage.set(AUTH_TOKEN_KEY, "token").unwrap();
    }
    let media = Arc::new(SimulatedMedia::new().with_default_duration(200.0));
    let templates = Arc::new(FakeTemplates::standard());

    let client = Client::new(ClientParts {
        media: media.clone(),
        tracks: Arc::new(FakeTracks::standard()),
        templates: templates.clone(),
        storage: setup.storage.clone(),
        origin: Url::parse(ORIGIN).unwrap(),
        initial_hash: setup.initial_hash.to_string(),
        player_markup: setup.player_markup.to_string(),
    });

    TestClient {
        client,
        media,
        storage: setup.storage,
        templates,
    }
}
