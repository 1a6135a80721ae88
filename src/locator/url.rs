//! Network locator for absolute http(s) URLs.
//!
//! Usually the last meaningful strategy in a chain. Modification times are
//! unknown for network resources (`None` sentinel); no retry is attempted,
//! a transient failure surfaces as a `LocateError`.

use std::time::{Duration, SystemTime};

use reqwest::blocking::Client;
use url::Url;

use super::{LocateError, UriLocator};

pub struct UrlLocator {
    /// Construction can fail (e.g. the TLS backend fails to initialize);
    /// the failure is kept and surfaced as a `LocateError` on first use
    /// instead of panicking inside the constructor.
    client: Result<Client, String>,
}

impl UrlLocator {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| e.to_string());
        Self { client }
    }

    fn client(&self) -> Result<&Client, LocateError> {
        self.client
            .as_ref()
            .map_err(|reason| LocateError::ClientUnavailable(reason.clone()))
    }
}

impl Default for UrlLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl UriLocator for UrlLocator {
    fn accepts(&self, uri: &str) -> bool {
        // Parseability as an absolute http(s) URL is the validity test.
        Url::parse(uri)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    fn locate(&self, uri: &str) -> Result<String, LocateError> {
        crate::debug!("locate"; "fetching `{}`", uri);
        let http_err = |source| LocateError::Http {
            uri: uri.to_string(),
            source,
        };
        self.client()?
            .get(uri)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?
            .text()
            .map_err(http_err)
    }

    fn last_modified(&self, _uri: &str) -> Option<SystemTime> {
        // Network resources cannot report a reliable modification time.
        None
    }

    fn resolve_relative(&self, base: &str, relative: &str) -> Result<String, LocateError> {
        // The base supplies the authority; a leading slash on the relative
        // part would otherwise reset the path to the root.
        let relative = relative.strip_prefix('/').unwrap_or(relative);
        let base = Url::parse(base).map_err(|e| LocateError::InvalidUri {
            uri: base.to_string(),
            reason: e.to_string(),
        })?;
        let joined = base.join(relative).map_err(|e| LocateError::InvalidUri {
            uri: relative.to_string(),
            reason: e.to_string(),
        })?;
        Ok(joined.into())
    }
}

// ============================================================================
// tests
// ============================================================================
