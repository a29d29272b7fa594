use std::{collections::HashMap, sync::Arc};

use flume::Sender;

use crate::{
    audio::{
        commands::PlayerCommand,
        state::{PlaybackState, format_time},
    },
    dom::{DomEvent, Document, EventKind, Listener, NodeId},
};

pub const BOUND_MARKER: &str = "data-player-bound";
pub const DEFAULT_COVER: &str = "assets/default-cover.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSlot {
    PlayButton,
    Progress,
    Volume,
    Cover,
    Title,
    Artist,
    CurrentTime,
    Duration,
    Mute,
    Repeat,
    Shuffle,
    Video,
}

impl ControlSlot {
    pub const ALL: [ControlSlot; 12] = [
        ControlSlot::PlayButton,
        ControlSlot::Progress,
        ControlSlot::Volume,
        ControlSlot::Cover,
        ControlSlot::Title,
        ControlSlot::Artist,
        ControlSlot::CurrentTime,
        ControlSlot::Duration,
        ControlSlot::Mute,
        ControlSlot::Repeat,
        ControlSlot::Shuffle,
        ControlSlot::Video,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            ControlSlot::PlayButton => "#player-play",
            ControlSlot::Progress => "#player-progress",
            ControlSlot::Volume => "#player-volume",
            ControlSlot::Cover => "#player-cover",
            ControlSlot::Title => "#player-title",
            ControlSlot::Artist => "#player-artist",
            ControlSlot::CurrentTime => "#player-current-time",
            ControlSlot::Duration => "#player-duration",
            ControlSlot::Mute => "#player-mute",
            ControlSlot::Repeat => "#player-repeat",
            ControlSlot::Shuffle => "#player-shuffle",
            ControlSlot::Video => "#player-video",
        }
    }

    fn event_kind(self) -> Option<EventKind> {
        match self {
            ControlSlot::Progress | ControlSlot::Volume => Some(EventKind::Input),
            ControlSlot::PlayButton
            | ControlSlot::Mute
            | ControlSlot::Repeat
            | ControlSlot::Shuffle
            | ControlSlot::Video => Some(EventKind::Click),
            _ => None,
        }
    }

    fn command(self, event: &DomEvent) -> Option<PlayerCommand> {
        match self {
            ControlSlot::PlayButton => Some(PlayerCommand::TogglePlay),
            ControlSlot::Progress => event.value.map(PlayerCommand::SeekPercent),
            ControlSlot::Volume => event.value.map(PlayerCommand::SetVolume),
            ControlSlot::Mute => Some(PlayerCommand::ToggleMute),
            ControlSlot::Repeat => Some(PlayerCommand::ToggleRepeat),
            ControlSlot::Shuffle => Some(PlayerCommand::ToggleShuffle),
            ControlSlot::Video => Some(PlayerCommand::ToggleVideo),
            _ => None,
        }
    }

    fn listener(self, tx: &Sender<PlayerCommand>) -> Option<(EventKind, Listener)> {
        let kind = self.event_kind()?;
        let tx = tx.clone();
        let listener: Listener = Arc::new(move |event: &DomEvent| {
            if let Some(command) = self.command(event) {
                let _ = tx.send(command);
            }
        });
        Some((kind, listener))
    }
}

/// Which node each control slot currently owns. A node is claimed once; the
/// marker attribute covers nodes claimed by an earlier arena.
#[derive(Debug, Default)]
pub struct BoundControls {
    nodes: HashMap<ControlSlot, NodeId>,
}

impl BoundControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: ControlSlot) -> Option<NodeId> {
        self.nodes.get(&slot).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Claims whatever control nodes the document currently has and returns
    /// how many listeners were newly attached.
    pub fn bind(&mut self, document: &Document, tx: &Sender<PlayerCommand>) -> usize {
        let mut attached = 0;

        for slot in ControlSlot::ALL {
            let Some(node) = document.query(slot.selector()) else {
                self.nodes.remove(&slot);
                continue;
            };

            let owned = self.nodes.get(&slot) == Some(&node);
            let marked = document.attr(node, BOUND_MARKER).is_some();
            if !owned && !marked {
                if let Some((kind, listener)) = slot.listener(tx) {
                    if document.add_listener(node, kind, listener) {
                        attached += 1;
                    }
                }
                document.set_attr(node, BOUND_MARKER, "true");
            }

            self.nodes.insert(slot, node);
        }

        attached
    }

    /// Projects `state` onto the owned nodes that are still in the document.
    pub fn render(&self, document: &Document, state: &PlaybackState) -> usize {
        let mut rendered = 0;

        for (slot, node) in &self.nodes {
            let node = *node;
            if !document.contains(node) {
                continue;
            }

            match slot {
                ControlSlot::PlayButton => {
                    document.set_class(node, "is-playing", state.is_playing);
                    document.set_class(node, "icon-pause", state.is_playing);
                    document.set_class(node, "icon-play", !state.is_playing);
                    document.set_attr(
                        node,
                        "aria-label",
                        if state.is_playing { "Pause" } else { "Play" },
                    );
                }
                ControlSlot::Progress => document.set_value(node, state.progress_percent()),
                ControlSlot::Volume => {
                    document.set_value(node, if state.is_muted { 0.0 } else { state.volume })
                }
                ControlSlot::Cover => document.set_attr(
                    node,
                    "src",
                    state.cover_url.as_deref().unwrap_or(DEFAULT_COVER),
                ),
                ControlSlot::Title => document.set_text(node, &state.title),
                ControlSlot::Artist => document.set_text(node, &state.artist),
                ControlSlot::CurrentTime => {
                    document.set_text(node, &format_time(state.current_time))
                }
                ControlSlot::Duration => document.set_text(node, &format_time(state.duration)),
                ControlSlot::Mute => document.set_class(node, "is-active", state.is_muted),
                ControlSlot::Repeat => document.set_class(node, "is-active", state.is_repeat),
                ControlSlot::Shuffle => document.set_class(node, "is-active", state.is_shuffle),
                ControlSlot::Video => {
                    document.set_class(node, "is-active", state.show_video);
                    document.set_class(node, "is-disabled", state.video_url.is_none());
                }
            }
            rendered += 1;
        }

        rendered
    }
}
