use crate::ui::route::{DEFAULT_PATH, Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDescriptor {
    pub id: &'static str,
    pub source_location: &'static str,
    pub mount_selector: &'static str,
    pub title: &'static str,
    pub param: Option<String>,
}

struct ViewEntry {
    path: &'static str,
    id: &'static str,
    source_location: &'static str,
    mount_selector: &'static str,
    title: &'static str,
}

const VIEW_TABLE: &[ViewEntry] = &[
    ViewEntry {
        path: "feed",
        id: "feed",
        source_location: "views/feed.html",
        mount_selector: "#feed-view",
        title: "Feed",
    },
    ViewEntry {
        path: "lists",
        id: "lists",
        source_location: "views/lists.html",
        mount_selector: "#lists-view",
        title: "My Lists",
    },
    ViewEntry {
        path: "library",
        id: "library",
        source_location: "views/library.html",
        mount_selector: "#library-view",
        title: "Library",
    },
    ViewEntry {
        path: "search",
        id: "search",
        source_location: "views/search.html",
        mount_selector: "#search-view",
        title: "Search",
    },
    ViewEntry {
        path: "upload",
        id: "upload",
        source_location: "views/upload.html",
        mount_selector: "#upload-view",
        title: "Upload",
    },
    ViewEntry {
        path: "profile",
        id: "profile",
        source_location: "views/profile.html",
        mount_selector: "#profile-view",
        title: "Profile",
    },
    ViewEntry {
        path: "player",
        id: "player",
        source_location: "views/player.html",
        mount_selector: "#player-view",
        title: "Now Playing",
    },
    ViewEntry {
        path: "login",
        id: "login",
        source_location: "views/login.html",
        mount_selector: "#login-view",
        title: "Sign in",
    },
    ViewEntry {
        path: "register",
        id: "register",
        source_location: "views/register.html",
        mount_selector: "#register-view",
        title: "Create account",
    },
];

const COLLECTION: ViewEntry = ViewEntry {
    path: "collection",
    id: "collection",
    source_location: "views/collection.html",
    mount_selector: "#collection-view",
    title: "Collection",
};

impl ViewEntry {
    fn descriptor(&self, param: Option<String>) -> ViewDescriptor {
        ViewDescriptor {
            id: self.id,
            source_location: self.source_location,
            mount_selector: self.mount_selector,
            title: self.title,
            param,
        }
    }
}

fn default_entry() -> &'static ViewEntry {
    VIEW_TABLE
        .iter()
        .find(|entry| entry.path == DEFAULT_PATH)
        .unwrap_or(&VIEW_TABLE[0])
}

pub fn default_descriptor() -> ViewDescriptor {
    default_entry().descriptor(None)
}

/// Never fails: unknown routes get the default view.
pub fn route_to_descriptor(route: &Route) -> ViewDescriptor {
    let path = route.path();

    if let Some(entry) = VIEW_TABLE.iter().find(|entry| entry.path == path) {
        return entry.descriptor(None);
    }

    if let Some(id) = path
        .strip_prefix(COLLECTION.path)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|id| !id.is_empty() && !id.contains('/'))
    {
        return COLLECTION.descriptor(Some(id.to_string()));
    }

    default_descriptor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::route::normalize_route;

    #[test]
    fn static_routes_map_to_their_views() {
        let lists = route_to_descriptor(&normalize_route("#/lists"));
        assert_eq!(lists.id, "lists");
        assert_eq!(lists.mount_selector, "#lists-view");
        assert_eq!(lists.param, None);
    }

    #[test]
    fn collection_routes_carry_their_id() {
        let view = route_to_descriptor(&normalize_route("#/collection/8f2c?sort=new"));
        assert_eq!(view.id, "collection");
        assert_eq!(view.param.as_deref(), Some("8f2c"));
    }

    #[test]
    fn unknown_and_partial_routes_fall_back_to_default() {
        for raw in ["#/nope", "#/collection", "#/collection/", "#/collection/1/2", "#/collectionx/1"] {
            assert_eq!(
                route_to_descriptor(&normalize_route(raw)),
                default_descriptor(),
                "input {raw:?}"
            );
        }
        assert_eq!(default_descriptor().id, "feed");
    }
}
