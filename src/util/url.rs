use url::Url;

#[derive(Debug, Clone)]
pub struct AssetResolver {
    origin: Url,
}

impl AssetResolver {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Absolute http(s) URLs pass through; anything else is joined onto the origin.
    pub fn resolve(&self, path: &str) -> Option<String> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }

        if let Ok(url) = Url::parse(path) {
            return matches!(url.scheme(), "http" | "https").then(|| path.to_string());
        }

        self.origin.join(path).ok().map(|url| url.to_string())
    }
}
