use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    dom::markup::{element_ids, selector_id},
    error::RouteError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomEvent {
    pub kind: EventKind,
    pub value: Option<f64>,
}

impl DomEvent {
    pub fn click() -> Self {
        Self {
            kind: EventKind::Click,
            value: None,
        }
    }

    pub fn input(value: f64) -> Self {
        Self {
            kind: EventKind::Input,
            value: Some(value),
        }
    }
}

pub type Listener = Arc<dyn Fn(&DomEvent) + Send + Sync>;

struct Element {
    id: String,
    text: String,
    classes: BTreeSet<String>,
    value: f64,
    attrs: BTreeMap<String, String>,
    listeners: Vec<(EventKind, Listener)>,
}

impl Element {
    fn new(id: String) -> Self {
        Self {
            id,
            text: String::new(),
            classes: BTreeSet::new(),
            value: 0.0,
            attrs: BTreeMap::new(),
            listeners: Vec::new(),
        }
    }
}

struct Region {
    selector: String,
    markup: String,
    nodes: Vec<NodeId>,
}

#[derive(Default)]
struct DocumentInner {
    title: String,
    regions: Vec<Region>,
    nodes: BTreeMap<NodeId, Element>,
    next_node: u64,
}

/// In-memory page model: named regions whose markup can be swapped wholesale.
/// Every swap destroys the region's element nodes and mints fresh ones, so
/// listeners and markers on the old nodes are gone afterwards.
#[derive(Clone, Default)]
pub struct Document {
    inner: Arc<RwLock<DocumentInner>>,
}

impl Document {
    pub fn new(regions: &[&str]) -> Self {
        let document = Self::default();
        for region in regions {
            document.add_region(region);
        }
        document
    }

    fn read(&self) -> RwLockReadGuard<'_, DocumentInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DocumentInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_region(&self, selector: &str) {
        let mut inner = self.write();
        if inner.regions.iter().any(|r| r.selector == selector) {
            return;
        }
        inner.regions.push(Region {
            selector: selector.to_string(),
            markup: String::new(),
            nodes: Vec::new(),
        });
    }

    /// Swaps the whole region under a single write lock; readers observe either
    /// the old subtree or the new one.
    pub fn replace_region(&self, selector: &str, markup: &str) -> Result<usize, RouteError> {
        let mut inner = self.write();
        let Some(index) = inner.regions.iter().position(|r| r.selector == selector) else {
            return Err(RouteError::MissingRegion(selector.to_string()));
        };

        let ids = element_ids(markup);
        let mut fresh = Vec::with_capacity(ids.len());
        for id in ids {
            inner.next_node += 1;
            let node = NodeId(inner.next_node);
            inner.nodes.insert(node, Element::new(id));
            fresh.push(node);
        }

        let region = &mut inner.regions[index];
        region.markup = markup.to_string();
        let stale = std::mem::replace(&mut region.nodes, fresh);
        let count = region.nodes.len();
        for node in stale {
            inner.nodes.remove(&node);
        }

        Ok(count)
    }

    pub fn region_markup(&self, selector: &str) -> Option<String> {
        self.read()
            .regions
            .iter()
            .find(|r| r.selector == selector)
            .map(|r| r.markup.clone())
    }

    pub fn title(&self) -> String {
        self.read().title.clone()
    }

    pub fn set_title(&self, title: &str) {
        self.write().title = title.to_string();
    }

    /// First live element matching an `#id` selector, in region order.
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        let id = selector_id(selector)?;
        let inner = self.read();
        inner
            .regions
            .iter()
            .flat_map(|r| r.nodes.iter())
            .find(|node| inner.nodes.get(*node).is_some_and(|el| el.id == id))
            .copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.read().nodes.contains_key(&node)
    }

    pub fn text(&self, node: NodeId) -> Option<String> {
        self.read().nodes.get(&node).map(|el| el.text.clone())
    }

    pub fn set_text(&self, node: NodeId, text: &str) {
        if let Some(el) = self.write().nodes.get_mut(&node) {
            if el.text != text {
                el.text = text.to_string();
            }
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.read()
            .nodes
            .get(&node)
            .is_some_and(|el| el.classes.contains(class))
    }

    pub fn set_class(&self, node: NodeId, class: &str, enabled: bool) {
        if let Some(el) = self.write().nodes.get_mut(&node) {
            if enabled {
                el.classes.insert(class.to_string());
            } else {
                el.classes.remove(class);
            }
        }
    }

    pub fn value(&self, node: NodeId) -> Option<f64> {
        self.read().nodes.get(&node).map(|el| el.value)
    }

    pub fn set_value(&self, node: NodeId, value: f64) {
        if let Some(el) = self.write().nodes.get_mut(&node) {
            el.value = value;
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.read()
            .nodes
            .get(&node)
            .and_then(|el| el.attrs.get(name).cloned())
    }

    pub fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.write().nodes.get_mut(&node) {
            el.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn add_listener(&self, node: NodeId, kind: EventKind, listener: Listener) -> bool {
        match self.write().nodes.get_mut(&node) {
            Some(el) => {
                el.listeners.push((kind, listener));
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.read()
            .nodes
            .get(&node)
            .map_or(0, |el| el.listeners.len())
    }

    /// Runs matching listeners outside the lock and returns how many fired.
    pub fn dispatch(&self, node: NodeId, event: DomEvent) -> usize {
        let listeners: Vec<Listener> = {
            let inner = self.read();
            let Some(el) = inner.nodes.get(&node) else {
                return 0;
            };
            el.listeners
                .iter()
                .filter(|(kind, _)| *kind == event.kind)
                .map(|(_, listener)| listener.clone())
                .collect()
        };

        for listener in &listeners {
            listener(&event);
        }
        listeners.len()
    }

    pub fn click(&self, selector: &str) -> usize {
        match self.query(selector) {
            Some(node) => self.dispatch(node, DomEvent::click()),
            None => 0,
        }
    }

    pub fn input(&self, selector: &str, value: f64) -> usize {
        match self.query(selector) {
            Some(node) => {
                self.set_value(node, value);
                self.dispatch(node, DomEvent::input(value))
            }
            None => 0,
        }
    }
}
