mod common;

use std::sync::Arc;

use common::{PLAYER_VIEW, Setup, client};
use tempfile::TempDir;
use tunewire::{
    audio::{
        commands::PlayerCommand,
        state::SessionPhase,
        store::PLAYER_STATE_KEY,
        traits::MediaElement,
    },
    storage::{FileStore, KeyValueStore, MemoryStore},
};

#[tokio::test]
async fn play_by_id_resolves_and_starts() {
    let t = client(Setup::default());
    t.client.boot().await;

    assert!(t.client.play_track_by_id("abc").await);

    let state = t.client.get_state();
    assert_eq!(state.title, "T");
    assert_eq!(state.audio_url.as_deref(), Some("http://localhost:3000/u/a.mp3"));
    assert!(state.is_playing);
    assert_eq!(t.client.phase(), SessionPhase::Playing);

    let document = t.client.document();
    let title = document.query("#player-title").unwrap();
    assert_eq!(document.text(title).as_deref(), Some("T"));
    assert!(document.has_class(document.query("#player-play").unwrap(), "is-playing"));
}

#[tokio::test]
async fn track_without_audio_leaves_state_byte_identical() {
    let t = client(Setup::default());
    t.client.boot().await;
    t.client.play_track_by_id("abc").await;
    t.client.seek(12.0);

    let before = serde_json::to_string(&t.client.get_state()).unwrap();
    let stored = t.storage.get(PLAYER_STATE_KEY);

    assert!(!t.client.play_track_by_id("silent").await);

    assert_eq!(serde_json::to_string(&t.client.get_state()).unwrap(), before);
    assert_eq!(t.storage.get(PLAYER_STATE_KEY), stored);
    assert_eq!(t.media.src().as_deref(), Some("http://localhost:3000/u/a.mp3"));
}

#[tokio::test]
async fn toggle_play_without_audio_does_not_start() {
    let t = client(Setup::default());
    t.client.boot().await;

    assert!(!t.client.toggle_play().await);
    assert!(!t.client.get_state().is_playing);
    assert!(t.client.get_state().audio_url.is_none());
}

#[tokio::test]
async fn toggle_repeat_twice_is_a_no_op() {
    let t = client(Setup::default());
    let original = t.client.get_state().is_repeat;

    t.client.toggle_repeat();
    t.client.toggle_repeat();

    assert_eq!(t.client.get_state().is_repeat, original);
}

#[tokio::test]
async fn rebinding_the_same_controls_fires_handlers_once() {
    let t = client(Setup {
        player_markup: "",
        ..Setup::default()
    });
    t.client.boot().await;
    t.client.navigate("#/player").await;
    t.client.controller().bind_controls();
    t.client.controller().bind_controls();

    let document = t.client.document();
    let play = document.query("#player-play").unwrap();
    assert_eq!(document.listener_count(play), 1);

    document.click("#player-play");
    assert_eq!(
        t.client.commands().drain().collect::<Vec<_>>(),
        vec![PlayerCommand::TogglePlay]
    );
}

#[tokio::test]
async fn controls_inside_routed_views_are_rebound_after_each_swap() {
    let t = client(Setup {
        player_markup: "",
        ..Setup::default()
    });
    t.client.boot().await;
    t.client.play_track_by_id("abc").await;

    t.client.navigate("#/player").await;
    t.client.navigate("#/feed").await;
    assert!(t.client.document().query("#player-play").is_none());
    assert_eq!(t.client.render(), 0);

    t.client.navigate("#/player").await;
    let document = t.client.document();
    assert_eq!(document.listener_count(document.query("#player-play").unwrap()), 1);

    document.click("#player-play");
    assert_eq!(t.client.drain_commands().await, 1);
    assert!(!t.client.get_state().is_playing);
    assert!(t.media.paused());

    document.input("#player-volume", 0.3);
    t.client.drain_commands().await;
    assert_eq!(t.client.get_state().volume, 0.3);
    assert!(PLAYER_VIEW.contains("player-volume"));
}

#[tokio::test]
async fn player_bar_survives_route_swaps() {
    let t = client(Setup::default());
    t.client.boot().await;
    let play = t.client.document().query("#player-play").unwrap();

    t.client.navigate("#/lists").await;
    t.client.navigate("#/library").await;

    let document = t.client.document();
    assert_eq!(document.query("#player-play"), Some(play));
    assert_eq!(document.listener_count(play), 1);
}

#[tokio::test]
async fn persisted_state_round_trips_without_rewrites() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    {
        let t = client(Setup {
            storage: store.clone(),
            ..Setup::default()
        });
        t.client.boot().await;
        t.client.play_track_by_id("xyz").await;
        t.client.set_volume(0.5);
        t.client.pause();
    }

    let reopened: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let stored = reopened.get(PLAYER_STATE_KEY).unwrap();
    let t = client(Setup {
        storage: reopened.clone(),
        ..Setup::default()
    });

    assert!(!t.client.controller().save());
    assert_eq!(reopened.get(PLAYER_STATE_KEY).unwrap(), stored);

    let state = t.client.get_state();
    assert_eq!(state.title, "X");
    assert_eq!(state.volume, 0.5);
    assert_eq!(state.cover_url.as_deref(), Some("http://localhost:3000/c/x.png"));
    assert!(!state.is_playing);
}

#[tokio::test]
async fn garbage_in_storage_yields_defaults() {
    let storage = MemoryStore::new();
    storage.set(PLAYER_STATE_KEY, "{not json").unwrap();
    let t = client(Setup {
        storage: Arc::new(storage),
        ..Setup::default()
    });

    assert_eq!(t.client.get_state(), Default::default());
    t.client.boot().await;
    assert_eq!(t.client.phase(), SessionPhase::Idle);
}

#[tokio::test]
async fn restore_resolves_a_relative_stored_audio_location() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage
        .set(
            PLAYER_STATE_KEY,
            r#"{"trackId":"abc","title":"T","audioUrl":"/u/a.mp3","isPlaying":true}"#,
        )
        .unwrap();
    let t = client(Setup {
        storage,
        ..Setup::default()
    });
    t.client.boot().await;

    assert_eq!(t.media.src().as_deref(), Some("http://localhost:3000/u/a.mp3"));
    assert_eq!(
        t.client.get_state().audio_url.as_deref(),
        Some("http://localhost:3000/u/a.mp3")
    );
    assert_eq!(t.client.phase(), SessionPhase::Playing);

    t.client.pause();
    assert!(t.client.resume().await);
    assert_eq!(t.media.src().as_deref(), Some("http://localhost:3000/u/a.mp3"));
}

#[tokio::test]
async fn unresolvable_stored_audio_location_drops_the_track() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage
        .set(
            PLAYER_STATE_KEY,
            r#"{"trackId":"abc","title":"T","audioUrl":"ftp://files/a.mp3","isPlaying":true}"#,
        )
        .unwrap();
    let t = client(Setup {
        storage,
        ..Setup::default()
    });
    t.client.boot().await;

    assert_eq!(t.media.src(), None);
    let state = t.client.get_state();
    assert_eq!(state.audio_url, None);
    assert_eq!(state.title, "Nothing playing");
    assert!(!t.client.resume().await);
}

#[tokio::test(start_paused = true)]
async fn stop_with_reset_clears_persisted_state() {
    let t = client(Setup::default());
    t.client.boot().await;
    t.client.play_track_by_id("abc").await;
    t.client.start_background(std::time::Duration::from_secs(5));

    t.client.stop(true);

    assert!(t.storage.get(PLAYER_STATE_KEY).is_none());
    assert_eq!(t.client.get_state().title, "Nothing playing");
    assert_eq!(t.client.phase(), SessionPhase::Idle);

    tokio::time::sleep(std::time::Duration::from_secs(11)).await;
    assert!(t.storage.get(PLAYER_STATE_KEY).is_none());

    t.client.shutdown();
    assert!(t.storage.get(PLAYER_STATE_KEY).is_none());

    t.client.play_track_by_id("xyz").await;
    assert!(t.storage.get(PLAYER_STATE_KEY).unwrap().contains("\"title\":\"X\""));
}

#[tokio::test]
async fn queue_and_track_list_feed_next() {
    let t = client(Setup::default());
    t.client.boot().await;
    t.client.play_track_by_id("abc").await;
    t.client.set_track_list(vec!["abc".into(), "xyz".into()]);

    assert!(t.client.next().await);
    assert_eq!(t.client.get_state().title, "X");
    assert!(!t.client.next().await);

    t.client.set_queue_tracks(vec!["abc".into()]);
    assert!(t.client.next().await);
    assert_eq!(t.client.get_state().title, "T");
}

#[tokio::test(start_paused = true)]
async fn background_tasks_track_progress_and_autosave() {
    let t = client(Setup::default());
    t.client.boot().await;
    t.client.play_track_by_id("abc").await;
    t.client.start_background(std::time::Duration::from_secs(5));

    tokio::time::sleep(std::time::Duration::from_secs(11)).await;

    assert!(t.client.get_state().current_time >= 10.0);
    let stored = t.storage.get(PLAYER_STATE_KEY).unwrap();
    assert!(!stored.contains("\"currentTime\":0.0"));

    t.client.shutdown();
}
