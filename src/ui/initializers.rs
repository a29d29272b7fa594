use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use crate::ui::route::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
    pub route: Route,
    pub view_id: &'static str,
    pub param: Option<String>,
}

pub type RouteInitializer = Arc<dyn Fn(&RouteContext) + Send + Sync>;

/// Page modules register their per-view setup here at startup; the router
/// looks them up by view id after each swap.
#[derive(Clone, Default)]
pub struct InitializerRegistry {
    initializers: Arc<RwLock<HashMap<&'static str, RouteInitializer>>>,
}

impl InitializerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, view_id: &'static str, initializer: F)
    where
        F: Fn(&RouteContext) + Send + Sync + 'static,
    {
        self.initializers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(view_id, Arc::new(initializer));
    }

    pub fn invoke(&self, ctx: &RouteContext) -> bool {
        let initializer = self
            .initializers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ctx.view_id)
            .cloned();

        match initializer {
            Some(initializer) => {
                initializer(ctx);
                true
            }
            None => false,
        }
    }
}
