use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicU64, Ordering},
};

use flume::Sender;
use tracing::{debug, info, warn};

use crate::{
    auth::SessionGate,
    dom::{Document, markup},
    error::RouteError,
    event::{bus::NavigationBus, events::Event},
    ui::{
        history::HashHistory,
        initializers::{InitializerRegistry, RouteContext},
        route::{Route, normalize_route},
        template_cache::TemplateCache,
        traits::TemplateSource,
        views::{ViewDescriptor, route_to_descriptor},
    },
};

pub const APP_ROOT: &str = "#app";
pub const APP_NAME: &str = "tunewire";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Mounted(Route),
    /// The route pointer moved but the view could not be shown; an inline
    /// error sits in the mount region instead.
    Failed(Route),
    /// A newer navigation started while this one was loading.
    Stale,
}

impl RouteOutcome {
    pub fn route(&self) -> Option<&Route> {
        match self {
            RouteOutcome::Mounted(route) | RouteOutcome::Failed(route) => Some(route),
            RouteOutcome::Stale => None,
        }
    }
}

pub struct Router {
    history: HashHistory,
    cache: TemplateCache,
    source: Arc<dyn TemplateSource>,
    session: Arc<dyn SessionGate>,
    document: Document,
    bus: NavigationBus,
    initializers: InitializerRegistry,
    current: RwLock<Route>,
    nav_generation: AtomicU64,
    event_tx: Sender<Event>,
}

impl Router {
    pub fn new(
        history: HashHistory,
        source: Arc<dyn TemplateSource>,
        session: Arc<dyn SessionGate>,
        document: Document,
        bus: NavigationBus,
        initializers: InitializerRegistry,
        event_tx: Sender<Event>,
    ) -> Self {
        let current = normalize_route(&history.current().unwrap_or_default());
        Self {
            history,
            cache: TemplateCache::new(),
            source,
            session,
            document,
            bus,
            initializers,
            current: RwLock::new(current),
            nav_generation: AtomicU64::new(0),
            event_tx,
        }
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    pub fn history(&self) -> &HashHistory {
        &self.history
    }

    /// The route in the address bar, normalized. Missing hashes give the default.
    pub fn get_route(&self) -> Route {
        normalize_route(&self.history.current().unwrap_or_default())
    }

    /// The route last applied by `handle_route_change`.
    pub fn current_route(&self) -> Route {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_current(&self, route: Route) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = route;
    }

    fn is_current(&self, generation: u64) -> bool {
        self.nav_generation.load(Ordering::SeqCst) == generation
    }

    /// Cached markup, or a fetch that fills the cache on success. Failures
    /// give `None`.
    pub async fn load_template(&self, descriptor: &ViewDescriptor) -> Option<String> {
        if let Some(markup) = self.cache.get(descriptor.source_location) {
            debug!(location = descriptor.source_location, "template_cache_hit");
            return Some(markup);
        }

        match self.source.fetch_template(descriptor.source_location).await {
            Ok(markup) => {
                self.cache
                    .insert(descriptor.source_location.to_string(), markup.clone());
                Some(markup)
            }
            Err(e) => {
                warn!(location = descriptor.source_location, error = %e, "template_fetch_failed");
                None
            }
        }
    }

    fn gate(&self, route: Route) -> Route {
        let signed_in = self.session.has_session();
        let target = if route.requires_auth() && !signed_in {
            Route::login()
        } else if route.is_auth_route() && signed_in {
            Route::default_route()
        } else {
            return route;
        };

        info!(from = %route, to = %target, "route_redirected");
        self.history.replace(target.as_str());
        target
    }

    pub async fn handle_route_change(&self) -> RouteOutcome {
        let generation = self.nav_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let route = self.gate(self.get_route());
        let descriptor = route_to_descriptor(&route);

        let markup = self.load_template(&descriptor).await;
        if !self.is_current(generation) {
            debug!(route = %route, "route_superseded");
            return RouteOutcome::Stale;
        }
        self.set_current(route.clone());

        let markup = match markup {
            Some(markup) if markup::contains_selector(&markup, descriptor.mount_selector) => markup,
            Some(_) => {
                return self.fail(
                    route,
                    RouteError::MissingMountNode {
                        location: descriptor.source_location.to_string(),
                        selector: descriptor.mount_selector.to_string(),
                    },
                );
            }
            None => {
                return self.fail(
                    route,
                    RouteError::TemplateUnavailable(descriptor.source_location.to_string()),
                );
            }
        };

        if let Err(e) = self.document.replace_region(APP_ROOT, &markup) {
            return self.fail(route, e);
        }
        self.document
            .set_title(&format!("{} · {APP_NAME}", descriptor.title));

        info!(route = %route, view = descriptor.id, "route_mounted");
        let _ = self.event_tx.send(Event::Navigated(route.clone()));
        self.bus.publish(&route);
        self.initializers.invoke(&RouteContext {
            route: route.clone(),
            view_id: descriptor.id,
            param: descriptor.param,
        });

        RouteOutcome::Mounted(route)
    }

    fn fail(&self, route: Route, error: RouteError) -> RouteOutcome {
        warn!(route = %route, error = %error, "route_failed");
        if let Err(e) = self
            .document
            .replace_region(APP_ROOT, &markup::inline_error(&error.to_string()))
        {
            warn!(error = %e, "route_error_unrendered");
        }
        let _ = self
            .event_tx
            .send(Event::NavigationFailed(route.clone(), error.to_string()));
        RouteOutcome::Failed(route)
    }

    pub async fn navigate(&self, target: &str) -> RouteOutcome {
        let route = normalize_route(target);
        if self.history.current().as_deref() != Some(route.as_str()) {
            self.history.push(route.as_str());
        }
        self.handle_route_change().await
    }

    pub async fn back(&self) -> Option<RouteOutcome> {
        if !self.history.back() {
            return None;
        }
        Some(self.handle_route_change().await)
    }

    pub async fn forward(&self) -> Option<RouteOutcome> {
        if !self.history.forward() {
            return None;
        }
        Some(self.handle_route_change().await)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicBool, AtomicUsize},
    };

    use async_trait::async_trait;
    use flume::Receiver;

    use super::*;
    use crate::error::NetworkError;

    #[derive(Default)]
    struct MapSource {
        templates: HashMap<&'static str, &'static str>,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl TemplateSource for MapSource {
        async fn fetch_template(&self, location: &str) -> Result<String, NetworkError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.templates
                .get(location)
                .map(|markup| markup.to_string())
                .ok_or_else(|| NetworkError::Status {
                    url: location.to_string(),
                    status: 404,
                })
        }
    }

    struct Harness {
        router: Router,
        source: Arc<MapSource>,
        signed_in: Arc<AtomicBool>,
        document: Document,
        bus: NavigationBus,
        initializers: InitializerRegistry,
        events: Receiver<Event>,
    }

    fn harness(initial: &str, signed_in: bool) -> Harness {
        let source = Arc::new(MapSource {
            templates: HashMap::from([
                ("views/feed.html", r#"<section id="feed-view">feed</section>"#),
                ("views/lists.html", r#"<section id="lists-view">lists</section>"#),
                ("views/login.html", r#"<form id="login-view"></form>"#),
                ("views/library.html", r#"<section id="wrong-view"></section>"#),
                (
                    "views/collection.html",
                    r#"<section id="collection-view"></section>"#,
                ),
            ]),
            fetches: AtomicUsize::new(0),
        });
        let flag = Arc::new(AtomicBool::new(signed_in));
        let gate_flag = flag.clone();
        let document = Document::new(&["#player-bar", APP_ROOT]);
        let bus = NavigationBus::new();
        let initializers = InitializerRegistry::new();
        let (event_tx, events) = flume::unbounded();

        let router = Router::new(
            HashHistory::new(initial),
            source.clone(),
            Arc::new(move || gate_flag.load(Ordering::SeqCst)),
            document.clone(),
            bus.clone(),
            initializers.clone(),
            event_tx,
        );

        Harness {
            router,
            source,
            signed_in: flag,
            document,
            bus,
            initializers,
            events,
        }
    }

    #[tokio::test]
    async fn unauthenticated_visit_lands_on_login() {
        let h = harness("#/lists", false);

        let outcome = h.router.handle_route_change().await;

        assert_eq!(outcome, RouteOutcome::Mounted(Route::login()));
        assert_eq!(h.router.current_route().as_str(), "#/login");
        assert_eq!(h.router.history().current().as_deref(), Some("#/login"));
        assert!(h.document.query("#login-view").is_some());
        assert!(h.document.query("#lists-view").is_none());
    }

    #[tokio::test]
    async fn signed_in_visit_to_login_goes_to_the_feed() {
        let h = harness("#/login", true);
        assert_eq!(
            h.router.handle_route_change().await,
            RouteOutcome::Mounted(Route::default_route())
        );
        assert_eq!(h.document.title(), "Feed · tunewire");
    }

    #[tokio::test]
    async fn templates_are_fetched_once() {
        let h = harness("#/feed", true);
        h.router.handle_route_change().await;
        h.router.navigate("#/lists").await;
        h.router.navigate("#/feed").await;

        assert_eq!(h.source.fetches.load(Ordering::SeqCst), 2);
        assert_eq!(h.router.cache().len(), 2);
    }

    #[tokio::test]
    async fn unreachable_template_renders_inline_error() {
        let h = harness("#/feed", true);
        h.router.handle_route_change().await;
        h.events.drain();

        let outcome = h.router.navigate("#/search").await;

        assert!(matches!(outcome, RouteOutcome::Failed(_)));
        assert_eq!(h.router.current_route().as_str(), "#/search");
        assert!(h.document.query("#route-error").is_some());
        assert!(!h.router.cache().contains("views/search.html"));
        assert!(
            h.events
                .drain()
                .any(|e| matches!(e, Event::NavigationFailed(ref r, _) if r.as_str() == "#/search"))
        );
    }

    #[tokio::test]
    async fn markup_without_mount_node_is_not_mounted() {
        let h = harness("#/library", true);
        let outcome = h.router.handle_route_change().await;

        assert!(matches!(outcome, RouteOutcome::Failed(_)));
        assert!(h.document.query("#wrong-view").is_none());
        assert!(
            h.document
                .region_markup(APP_ROOT)
                .unwrap()
                .contains("#library-view")
        );
    }

    #[tokio::test]
    async fn swap_publishes_once_and_runs_the_view_initializer() {
        let h = harness("#/feed", true);
        let published = Arc::new(AtomicUsize::new(0));
        let counter = published.clone();
        h.bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let seen = Arc::new(RwLock::new(None));
        let sink = seen.clone();
        h.initializers.register("collection", move |ctx| {
            *sink.write().unwrap() = ctx.param.clone();
        });

        h.router.navigate("#/collection/42?sort=asc").await;

        assert_eq!(published.load(Ordering::SeqCst), 1);
        assert_eq!(seen.read().unwrap().as_deref(), Some("42"));
        assert_eq!(h.router.current_route().as_str(), "#/collection/42");
    }

    #[tokio::test]
    async fn back_and_forward_walk_history() {
        let h = harness("#/feed", true);
        h.router.handle_route_change().await;
        h.router.navigate("#/lists").await;

        assert_eq!(
            h.router.back().await,
            Some(RouteOutcome::Mounted(Route::default_route()))
        );
        assert!(h.router.back().await.is_none());
        assert!(matches!(h.router.forward().await, Some(RouteOutcome::Mounted(r)) if r.path() == "lists"));

        h.signed_in.store(false, Ordering::SeqCst);
        assert_eq!(
            h.router.back().await,
            Some(RouteOutcome::Mounted(Route::login()))
        );
    }
}
