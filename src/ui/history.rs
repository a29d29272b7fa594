use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

struct Entries {
    stack: Vec<String>,
    index: usize,
}

/// Session history of raw hash tokens, the stand-in for `location.hash` plus
/// the back/forward stack.
pub struct HashHistory {
    entries: RwLock<Entries>,
}

impl HashHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: RwLock::new(Entries {
                stack: vec![initial.to_string()],
                index: 0,
            }),
        }
    }

    fn lock(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// `None` when the current hash is empty.
    pub fn current(&self) -> Option<String> {
        let entries = self.lock();
        entries
            .stack
            .get(entries.index)
            .filter(|hash| !hash.trim().is_empty())
            .cloned()
    }

    pub fn push(&self, hash: &str) {
        let mut entries = self.lock();
        let next = entries.index + 1;
        entries.stack.truncate(next);
        entries.stack.push(hash.to_string());
        entries.index = next;
    }

    pub fn replace(&self, hash: &str) {
        let mut entries = self.lock();
        let index = entries.index;
        entries.stack[index] = hash.to_string();
    }

    pub fn back(&self) -> bool {
        let mut entries = self.lock();
        if entries.index == 0 {
            return false;
        }
        entries.index -= 1;
        true
    }

    pub fn forward(&self) -> bool {
        let mut entries = self.lock();
        if entries.index + 1 >= entries.stack.len() {
            return false;
        }
        entries.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.lock().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
