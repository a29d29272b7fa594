use tracing::info;

use crate::{
    audio::state::format_time,
    client::{Client, PLAYER_REGION},
    event::events::Event,
    ui::{
        input::{HELP, InputHandler},
        message::AppMessage,
        router::{APP_ROOT, RouteOutcome},
    },
};

pub struct EventHandler;

impl EventHandler {
    /// Returns `false` once the shell should exit.
    pub async fn handle_line(client: &Client, line: &str) -> bool {
        if line.trim().is_empty() {
            return true;
        }
        match InputHandler::handle_line(line) {
            Some(message) => Self::handle_message(client, message).await,
            None => {
                println!("unknown command: {}", line.trim());
                true
            }
        }
    }

    pub async fn handle_message(client: &Client, message: AppMessage) -> bool {
        match message {
            AppMessage::Quit => return false,
            AppMessage::Help => println!("{HELP}"),
            AppMessage::Navigate(target) => {
                let outcome = client.navigate(&target).await;
                Self::print_outcome(&outcome);
            }
            AppMessage::GoBack => match client.back().await {
                Some(outcome) => Self::print_outcome(&outcome),
                None => println!("no earlier entry"),
            },
            AppMessage::GoForward => match client.forward().await {
                Some(outcome) => Self::print_outcome(&outcome),
                None => println!("no later entry"),
            },
            AppMessage::PlayTrack(id) => {
                client.play_track_by_id(&id).await;
                Self::print_status(client);
            }
            AppMessage::TogglePlayPause => {
                client.toggle_play().await;
                Self::print_status(client);
            }
            AppMessage::Pause => {
                client.pause();
                Self::print_status(client);
            }
            AppMessage::Resume => {
                client.resume().await;
                Self::print_status(client);
            }
            AppMessage::Stop { reset } => {
                client.stop(reset);
                Self::print_status(client);
            }
            AppMessage::Seek(time) => {
                if !client.seek(time) {
                    println!("seek ignored");
                }
                Self::print_status(client);
            }
            AppMessage::SetVolume(volume) => {
                if !client.set_volume(volume) {
                    println!("volume must be between 0 and 1");
                }
            }
            AppMessage::ToggleMute => println!("muted: {}", client.toggle_mute()),
            AppMessage::ToggleRepeat => println!("repeat: {}", client.toggle_repeat()),
            AppMessage::ToggleShuffle => println!("shuffle: {}", client.toggle_shuffle()),
            AppMessage::ToggleVideo => println!("video: {}", client.toggle_video()),
            AppMessage::NextTrack => {
                client.next().await;
                Self::print_status(client);
            }
            AppMessage::PreviousTrack => {
                client.previous().await;
                Self::print_status(client);
            }
            AppMessage::Click(selector) => {
                if client.document().click(&selector) == 0 {
                    println!("nothing listens on {selector}");
                }
                client.drain_commands().await;
                Self::print_status(client);
            }
            AppMessage::ShowState => match serde_json::to_string_pretty(&client.get_state()) {
                Ok(json) => println!("{json}"),
                Err(e) => println!("state unavailable: {e}"),
            },
            AppMessage::ShowDom => {
                let document = client.document();
                println!("title: {}", document.title());
                for region in [PLAYER_REGION, APP_ROOT] {
                    println!("{region}:\n{}", document.region_markup(region).unwrap_or_default());
                }
            }
            AppMessage::SignIn(token) => match client.sign_in(&token).await {
                Ok(outcome) => Self::print_outcome(&outcome),
                Err(e) => println!("sign-in failed: {e}"),
            },
            AppMessage::SignOut => match client.sign_out().await {
                Ok(outcome) => Self::print_outcome(&outcome),
                Err(e) => println!("sign-out failed: {e}"),
            },
        }
        true
    }

    pub fn handle_event(evt: Event) {
        info!(?evt, "app_event");
        match evt {
            Event::TrackStarted(id) => println!("started {id}"),
            Event::TrackUnavailable(id) => println!("track {id} cannot be played"),
            Event::PlaybackFailed(reason) => println!("playback failed: {reason}"),
            Event::NavigationFailed(route, reason) => println!("{route}: {reason}"),
            Event::QueueEnded => println!("queue finished"),
            Event::Navigated(_) | Event::TrackEnded => {}
        }
    }

    pub fn print_outcome(outcome: &RouteOutcome) {
        match outcome {
            RouteOutcome::Mounted(route) => println!("at {route}"),
            RouteOutcome::Failed(route) => println!("at {route} (view unavailable)"),
            RouteOutcome::Stale => {}
        }
    }

    fn print_status(client: &Client) {
        let state = client.get_state();
        println!(
            "[{:?}] {} - {} {}/{}",
            client.phase(),
            state.title,
            state.artist,
            format_time(state.current_time),
            format_time(state.duration)
        );
    }
}
