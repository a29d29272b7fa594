use crate::ui::route::Route;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Navigated(Route),
    NavigationFailed(Route, String),
    TrackStarted(String),
    TrackEnded,
    QueueEnded,
    PlaybackFailed(String),
    TrackUnavailable(String),
}
