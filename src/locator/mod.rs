//! Resource location - turning URIs into readable content.
//!
//! A [`UriLocator`] is a strategy that recognizes a URI scheme and reads
//! its content plus modification metadata. Strategies are composed into a
//! [`LocatorChain`]: the first strategy whose `accepts()` returns true is
//! used, and a retrieval failure from that strategy is terminal - validity
//! is a scheme-matching test, not a success probe, so the chain never
//! falls through to later strategies once one has matched.

mod builtin;
mod file;
mod url;
pub mod wildcard;

pub use builtin::BuiltinLocator;
pub use file::FileLocator;
pub use url::UrlLocator;

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Errors raised while locating a resource.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("no locator accepts uri `{0}`")]
    UnsupportedScheme(String),

    #[error("failed to read `{uri}`")]
    Read {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    #[error("wildcard `{0}` matched no entries")]
    EmptyWildcard(String),

    #[error("invalid uri `{uri}`: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("request for `{uri}` failed")]
    Http {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("http client unavailable: {0}")]
    ClientUnavailable(String),

    #[error("unknown builtin resource `{0}`")]
    UnknownBuiltin(String),
}

// ============================================================================
// UriLocator
// ============================================================================

/// Strategy turning a URI into readable bytes plus modification metadata.
///
/// Stateless with respect to the model; safely callable concurrently.
pub trait UriLocator: Send + Sync {
    /// Scheme-matching test. Must not touch the resource itself.
    fn accepts(&self, uri: &str) -> bool;

    /// Read the resource content. Wildcard-aware locators return the
    /// concatenation of all matched entries in lexicographic order.
    fn locate(&self, uri: &str) -> Result<String, LocateError>;

    /// Modification time, or `None` when the scheme cannot report one
    /// ("unknown" is a sentinel meaning always-changed, not an error).
    fn last_modified(&self, uri: &str) -> Option<SystemTime>;

    /// Resolve `relative` against `base`. The default drops the last path
    /// segment of the base and joins; scheme-aware locators override this.
    fn resolve_relative(&self, base: &str, relative: &str) -> Result<String, LocateError> {
        let dir = base.rsplit_once('/').map_or("", |(dir, _)| dir);
        if dir.is_empty() {
            Ok(relative.to_string())
        } else {
            Ok(format!("{dir}/{relative}"))
        }
    }
}

// ============================================================================
// LocatorChain
// ============================================================================

/// Ordered, first-match-wins composition of locator strategies.
pub struct LocatorChain {
    locators: Vec<Box<dyn UriLocator>>,
}

impl LocatorChain {
    /// Build the default chain for a project root: builtin scheme, then
    /// network URLs, then the filesystem (which claims everything else).
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            locators: vec![
                Box::new(BuiltinLocator::new()),
                Box::new(UrlLocator::new()),
                Box::new(FileLocator::new(root)),
            ],
        }
    }

    /// Chain over an explicit list of strategies.
    pub fn new(locators: Vec<Box<dyn UriLocator>>) -> Self {
        Self { locators }
    }

    fn matching(&self, uri: &str) -> Result<&dyn UriLocator, LocateError> {
        self.locators
            .iter()
            .map(Box::as_ref)
            .find(|l| l.accepts(uri))
            .ok_or_else(|| LocateError::UnsupportedScheme(uri.to_string()))
    }

    /// Read `uri` through the first accepting strategy.
    pub fn locate(&self, uri: &str) -> Result<String, LocateError> {
        self.matching(uri)?.locate(uri)
    }

    /// Modification time of `uri`, `None` when unknown or unsupported.
    pub fn last_modified(&self, uri: &str) -> Option<SystemTime> {
        self.locators
            .iter()
            .find(|l| l.accepts(uri))
            .and_then(|l| l.last_modified(uri))
    }

    /// Resolve a relative reference against a base URI, using the strategy
    /// that accepts the base.
    pub fn resolve_relative(&self, base: &str, relative: &str) -> Result<String, LocateError> {
        self.matching(base)?.resolve_relative(base, relative)
    }
}

/// Modification time of a filesystem path, `None` when unreadable.
pub(crate) fn mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

// ============================================================================
// tests
// ============================================================================
