use std::collections::VecDeque;

use rand::{Rng, rng};

const HISTORY_LIMIT: usize = 100;

/// Track ids the next-track hook draws from: explicitly queued ids first, then
/// the page's track list in order (or at random while shuffling).
#[derive(Debug, Default)]
pub struct QueueManager {
    pub track_list: Vec<String>,
    pub list_index: Option<usize>,
    pub queue: VecDeque<String>,
    pub history: Vec<String>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list; `current` marks the entry that is already playing.
    pub fn set_track_list(&mut self, ids: Vec<String>, current: Option<usize>) {
        self.track_list = ids;
        self.list_index = current.filter(|i| *i < self.track_list.len());
    }

    pub fn set_queue_tracks(&mut self, ids: Vec<String>) {
        self.queue = ids.into_iter().collect();
    }

    pub fn note_played(&mut self, id: &str) {
        if self.history.last().map(String::as_str) != Some(id) {
            self.history.push(id.to_string());
            if self.history.len() > HISTORY_LIMIT {
                let excess = self.history.len() - HISTORY_LIMIT;
                self.history.drain(..excess);
            }
        }
        if self.list_index.and_then(|i| self.track_list.get(i)).map(String::as_str) != Some(id) {
            if let Some(position) = self.track_list.iter().position(|t| t == id) {
                self.list_index = Some(position);
            }
        }
    }

    pub fn next_track(&mut self, shuffle: bool) -> Option<String> {
        if let Some(id) = self.queue.pop_front() {
            return Some(id);
        }
        if self.track_list.is_empty() {
            return None;
        }

        let next = if shuffle {
            let candidates: Vec<usize> = (0..self.track_list.len())
                .filter(|i| Some(*i) != self.list_index)
                .collect();
            if candidates.is_empty() {
                return None;
            }
            candidates[rng().random_range(0..candidates.len())]
        } else {
            let next = self.list_index.map_or(0, |i| i + 1);
            if next >= self.track_list.len() {
                return None;
            }
            next
        };

        self.list_index = Some(next);
        Some(self.track_list[next].clone())
    }

    pub fn previous_track(&mut self) -> Option<String> {
        if self.history.len() < 2 {
            return None;
        }
        self.history.pop();
        let previous = self.history.last().cloned()?;
        if let Some(position) = self.track_list.iter().position(|t| *t == previous) {
            self.list_index = Some(position);
        }
        Some(previous)
    }
}
