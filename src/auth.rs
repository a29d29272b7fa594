use std::sync::Arc;

use crate::storage::KeyValueStore;

pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Answers only "is a session token present". Tokens are never decoded here.
pub trait SessionGate: Send + Sync {
    fn has_session(&self) -> bool;
}

impl<F> SessionGate for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn has_session(&self) -> bool {
        self()
    }
}

pub struct TokenPresence {
    store: Arc<dyn KeyValueStore>,
}

impl TokenPresence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl SessionGate for TokenPresence {
    fn has_session(&self) -> bool {
        self.store
            .get(AUTH_TOKEN_KEY)
            .is_some_and(|token| !token.trim().is_empty())
    }
}
