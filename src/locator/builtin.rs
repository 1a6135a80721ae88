//! Locator for compiled-in assets (`builtin:` scheme).

use std::time::SystemTime;

use super::{LocateError, UriLocator};
use crate::embed;

const SCHEME: &str = "builtin:";

pub struct BuiltinLocator;

impl BuiltinLocator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuiltinLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl UriLocator for BuiltinLocator {
    fn accepts(&self, uri: &str) -> bool {
        uri.starts_with(SCHEME)
    }

    fn locate(&self, uri: &str) -> Result<String, LocateError> {
        let name = uri.trim_start_matches(SCHEME);
        embed::find(name)
            .map(|asset| asset.content.to_string())
            .ok_or_else(|| LocateError::UnknownBuiltin(name.to_string()))
    }

    fn last_modified(&self, _uri: &str) -> Option<SystemTime> {
        // Compiled-in content only changes with the binary itself.
        None
    }

    fn resolve_relative(&self, _base: &str, relative: &str) -> Result<String, LocateError> {
        // Builtin assets are flat - a relative reference is another name.
        Ok(format!("{SCHEME}{}", relative.trim_start_matches('/')))
    }
}
