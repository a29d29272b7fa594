use std::sync::{Arc, PoisonError, RwLock};

use flume::{Receiver, Sender};
use uuid::Uuid;

use crate::ui::route::Route;

pub type SubscriptionId = Uuid;
pub type NavigationListener = Arc<dyn Fn(&Route) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    listeners: Vec<(SubscriptionId, NavigationListener)>,
    channels: Vec<Sender<Route>>,
}

/// Fire-and-forget announcement of each completed route swap.
#[derive(Clone, Default)]
pub struct NavigationBus {
    inner: Arc<RwLock<BusInner>>,
}

impl NavigationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Route) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = inner.listeners.len();
        inner.listeners.retain(|(existing, _)| *existing != id);
        inner.listeners.len() != before
    }

    pub fn subscribe_channel(&self) -> Receiver<Route> {
        let (tx, rx) = flume::unbounded();
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .channels
            .push(tx);
        rx
    }

    /// Calls every listener synchronously, in subscription order, and returns
    /// how many were notified. Listeners may subscribe or publish re-entrantly.
    pub fn publish(&self, route: &Route) -> usize {
        let listeners: Vec<NavigationListener> = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in &listeners {
            listener(route);
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.channels.retain(|tx| tx.send(route.clone()).is_ok());
        listeners.len() + inner.channels.len()
    }
}
