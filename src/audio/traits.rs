use async_trait::async_trait;

use crate::{
    error::{NetworkError, PlaybackError},
    http::model::TrackPayload,
};

#[async_trait]
pub trait TrackLookup: Send + Sync {
    async fn get_track(&self, id: &str) -> Result<TrackPayload, NetworkError>;
}

/// The host media element. Times are in seconds; `duration` is NaN while unknown.
#[async_trait]
pub trait MediaElement: Send + Sync {
    fn set_src(&self, src: Option<&str>);
    fn src(&self) -> Option<String>;
    async fn play(&self) -> Result<(), PlaybackError>;
    fn pause(&self);
    fn paused(&self) -> bool;
    fn ended(&self) -> bool;
    fn current_time(&self) -> f64;
    fn set_current_time(&self, time: f64);
    fn duration(&self) -> f64;
    fn set_volume(&self, volume: f64);
    fn set_muted(&self, muted: bool);
}

/// Native events a media element raises.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    LoadedMetadata(f64),
    TimeUpdate(f64),
    Ended,
    Error(String),
}
