use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{audio::traits::MediaElement, error::PlaybackError};

struct MediaInner {
    src: Option<String>,
    paused: bool,
    position: f64,
    started_at: Option<Instant>,
    duration: f64,
    volume: f64,
    muted: bool,
    autoplay_allowed: bool,
    default_duration: Option<f64>,
}

impl MediaInner {
    fn position_now(&self) -> f64 {
        let elapsed = self
            .started_at
            .map_or(0.0, |start| start.elapsed().as_secs_f64());
        let position = self.position + elapsed;
        if self.duration.is_finite() {
            position.min(self.duration)
        } else {
            position
        }
    }

    fn settle(&mut self) {
        self.position = self.position_now();
        self.started_at = self.started_at.map(|_| Instant::now());
    }
}

/// A clock-driven stand-in for a browser media element: it tracks position,
/// volume and paused state without decoding anything.
pub struct SimulatedMedia {
    inner: RwLock<MediaInner>,
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedMedia {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MediaInner {
                src: None,
                paused: true,
                position: 0.0,
                started_at: None,
                duration: f64::NAN,
                volume: 1.0,
                muted: false,
                autoplay_allowed: true,
                default_duration: None,
            }),
        }
    }

    pub fn with_default_duration(self, seconds: f64) -> Self {
        self.lock().default_duration = Some(seconds);
        self
    }

    fn lock(&self) -> RwLockWriteGuard<'_, MediaInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_autoplay_allowed(&self, allowed: bool) {
        self.lock().autoplay_allowed = allowed;
    }

    pub fn set_duration(&self, seconds: f64) {
        let mut inner = self.lock();
        inner.settle();
        inner.duration = seconds;
    }

    pub fn volume(&self) -> f64 {
        self.lock().volume
    }

    pub fn muted(&self) -> bool {
        self.lock().muted
    }
}

#[async_trait]
impl MediaElement for SimulatedMedia {
    fn set_src(&self, src: Option<&str>) {
        let mut inner = self.lock();
        inner.src = src.map(str::to_string);
        inner.paused = true;
        inner.started_at = None;
        inner.position = 0.0;
        let duration = match (inner.src.is_some(), inner.default_duration) {
            (true, Some(d)) => d,
            _ => f64::NAN,
        };
        inner.duration = duration;
    }

    fn src(&self) -> Option<String> {
        self.lock().src.clone()
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        tokio::task::yield_now().await;

        let mut inner = self.lock();
        if inner.src.is_none() {
            return Err(PlaybackError::NoSource);
        }
        if !inner.autoplay_allowed {
            return Err(PlaybackError::Rejected(
                "play() request was not allowed by the user agent".into(),
            ));
        }
        if inner.duration.is_finite() && inner.position >= inner.duration {
            inner.position = 0.0;
        }
        if inner.started_at.is_none() {
            inner.started_at = Some(Instant::now());
        }
        inner.paused = false;
        Ok(())
    }

    fn pause(&self) {
        let mut inner = self.lock();
        inner.position = inner.position_now();
        inner.started_at = None;
        inner.paused = true;
    }

    fn paused(&self) -> bool {
        self.lock().paused
    }

    fn ended(&self) -> bool {
        let inner = self.lock();
        inner.src.is_some() && inner.duration.is_finite() && inner.position_now() >= inner.duration
    }

    fn current_time(&self) -> f64 {
        self.lock().position_now()
    }

    fn set_current_time(&self, time: f64) {
        let mut inner = self.lock();
        inner.settle();
        inner.position = if inner.duration.is_finite() {
            time.clamp(0.0, inner.duration)
        } else {
            time.max(0.0)
        };
    }

    fn duration(&self) -> f64 {
        self.lock().duration
    }

    fn set_volume(&self, volume: f64) {
        self.lock().volume = volume;
    }

    fn set_muted(&self, muted: bool) {
        self.lock().muted = muted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn play_without_source_is_rejected() {
        let media = SimulatedMedia::new();
        assert_eq!(media.play().await, Err(PlaybackError::NoSource));
        assert!(media.paused());
    }

    #[tokio::test]
    async fn blocked_autoplay_rejects_the_play_promise() {
        let media = SimulatedMedia::new();
        media.set_src(Some("https://media.example.com/a.mp3"));
        media.set_autoplay_allowed(false);
        assert!(matches!(media.play().await, Err(PlaybackError::Rejected(_))));
        assert!(media.paused());
    }

    #[tokio::test(start_paused = true)]
    async fn position_advances_while_playing_and_stops_at_duration() {
        let media = SimulatedMedia::new().with_default_duration(10.0);
        media.set_src(Some("https://media.example.com/a.mp3"));
        media.play().await.unwrap();

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!((media.current_time() - 4.0).abs() < 1e-6);

        media.pause();
        tokio::time::advance(Duration::from_secs(4)).await;
        assert!((media.current_time() - 4.0).abs() < 1e-6);

        media.play().await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(media.current_time(), 10.0);
        assert!(media.ended());
    }
}
