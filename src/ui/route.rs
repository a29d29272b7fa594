use std::fmt;

pub const DEFAULT_PATH: &str = "feed";
pub const LOGIN_PATH: &str = "login";
pub const REGISTER_PATH: &str = "register";

/// A normalized navigation token of the form `#/<path>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route(String);

impl Route {
    pub fn default_route() -> Self {
        Self::from_path(DEFAULT_PATH)
    }

    pub fn login() -> Self {
        Self::from_path(LOGIN_PATH)
    }

    fn from_path(path: &str) -> Self {
        Self(format!("#/{path}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn path(&self) -> &str {
        &self.0[2..]
    }

    pub fn is_auth_route(&self) -> bool {
        matches!(self.path(), LOGIN_PATH | REGISTER_PATH)
    }

    pub fn requires_auth(&self) -> bool {
        !self.is_auth_route()
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::default_route()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn valid_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')
}

/// Total and idempotent: anything that does not survive cleanup becomes the
/// default route.
pub fn normalize_route(raw: &str) -> Route {
    let trimmed = raw.trim();
    let without_hash = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let cut = without_hash
        .find(['?', '#'])
        .map_or(without_hash, |end| &without_hash[..end]);
    let path = cut.trim_start_matches('/').trim_end_matches('/');

    if path.is_empty() || !path.chars().all(valid_path_char) {
        return Route::default_route();
    }
    Route::from_path(path)
}

pub fn is_auth_route(route: &Route) -> bool {
    route.is_auth_route()
}

pub fn requires_auth(route: &Route) -> bool {
    route.requires_auth()
}
