//! Development-mode resource authorization.
//!
//! A whitelist of resource URIs permitted to be served as raw proxy
//! content. Rebuilt each time the model is, and cleared when the cached
//! model is destroyed so stale authorization never survives a rebuild.
//! Only consulted in development mode; in production proxying is disabled
//! entirely regardless of the set's contents.

use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct ResourceAuthorizer {
    authorized: DashSet<String>,
}

impl ResourceAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authorize a resource URI.
    pub fn add(&self, uri: &str) {
        self.authorized.insert(uri.to_string());
    }

    /// Whether a URI may be served raw.
    pub fn is_authorized(&self, uri: &str) -> bool {
        self.authorized.contains(uri)
    }

    /// Drop all authorization.
    pub fn clear(&self) {
        self.authorized.clear();
    }

    /// Read-only snapshot of the authorized URIs, sorted for stable
    /// diagnostics output.
    pub fn snapshot(&self) -> Vec<String> {
        let mut uris: Vec<_> = self.authorized.iter().map(|u| u.clone()).collect();
        uris.sort();
        uris
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_check() {
        let auth = ResourceAuthorizer::new();
        auth.add("js/app.js");
        assert!(auth.is_authorized("js/app.js"));
        assert!(!auth.is_authorized("js/other.js"));
    }

    #[test]
    fn clear_drops_everything() {
        let auth = ResourceAuthorizer::new();
        auth.add("a.js");
        auth.add("b.css");
        auth.clear();
        assert!(!auth.is_authorized("a.js"));
        assert!(auth.snapshot().is_empty());
    }

    #[test]
    fn snapshot_is_sorted() {
        let auth = ResourceAuthorizer::new();
        auth.add("b.css");
        auth.add("a.js");
        assert_eq!(auth.snapshot(), vec!["a.js".to_string(), "b.css".to_string()]);
    }
}
