use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Markup keyed by source location. Entries are never invalidated during a
/// session; `clear` exists for hosts that want a hard refresh.
#[derive(Clone, Default)]
pub struct TemplateCache {
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, location: &str) -> Option<String> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(location)
            .cloned()
    }

    pub fn insert(&self, location: String, markup: String) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location, markup);
    }

    pub fn contains(&self, location: &str) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(location)
    }

    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
