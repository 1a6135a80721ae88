//! Filesystem locator.
//!
//! Accepts plain paths and `file:` URIs; relative paths are resolved
//! against the project root. Wildcard paths expand to the concatenation
//! of all matched files in lexicographic order, with the aggregate
//! modification time being the latest of the matched entries.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{LocateError, UriLocator, mtime, wildcard};

pub struct FileLocator {
    root: PathBuf,
}

impl FileLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Strip a `file:` prefix and anchor relative paths at the root.
    fn resolve(&self, uri: &str) -> PathBuf {
        let path = uri
            .strip_prefix("file://")
            .or_else(|| uri.strip_prefix("file:"))
            .unwrap_or(uri);
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn read(path: &Path) -> Result<String, LocateError> {
        std::fs::read_to_string(path).map_err(|e| LocateError::Read {
            uri: path.display().to_string(),
            source: e,
        })
    }
}

impl UriLocator for FileLocator {
    fn accepts(&self, uri: &str) -> bool {
        // Claims anything without a scheme, plus explicit file: URIs.
        uri.starts_with("file:") || !uri.contains("://")
    }

    fn locate(&self, uri: &str) -> Result<String, LocateError> {
        let path = self.resolve(uri);
        if !wildcard::has_wildcard(uri) {
            return Self::read(&path);
        }

        // A matched entry that fails to read aborts the whole aggregate.
        let mut merged = String::new();
        for file in wildcard::expand(&path)? {
            merged.push_str(&Self::read(&file)?);
        }
        Ok(merged)
    }

    fn last_modified(&self, uri: &str) -> Option<SystemTime> {
        let path = self.resolve(uri);
        if !wildcard::has_wildcard(uri) {
            return mtime(&path);
        }
        wildcard::expand(&path)
            .ok()?
            .iter()
            .filter_map(|p| mtime(p))
            .max()
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn reads_plain_and_file_scheme_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.js"), "var x = 1;").unwrap();

        let locator = FileLocator::new(dir.path());
        assert!(locator.accepts("app.js"));
        assert!(locator.accepts("file:app.js"));
        assert!(!locator.accepts("https://example.com/app.js"));

        assert_eq!(locator.locate("app.js").unwrap(), "var x = 1;");
        assert_eq!(locator.locate("file:app.js").unwrap(), "var x = 1;");
        assert!(locator.last_modified("app.js").is_some());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let locator = FileLocator::new(dir.path());
        assert!(matches!(
            locator.locate("missing.js"),
            Err(LocateError::Read { .. })
        ));
    }

    #[test]
    fn wildcard_aggregates_in_lexicographic_order() {
        let dir = TempDir::new().unwrap();
        // Written out of order on purpose; aggregation must sort.
        fs::write(dir.path().join("b.js"), "B").unwrap();
        thread::sleep(Duration::from_millis(10));
        fs::write(dir.path().join("a.js"), "A").unwrap();
        thread::sleep(Duration::from_millis(10));
        fs::write(dir.path().join("c.js"), "C").unwrap();

        let locator = FileLocator::new(dir.path());
        assert_eq!(locator.locate("*.js").unwrap(), "ABC");

        // Aggregate mtime is the max of the entries - c.js, written last.
        let aggregate = locator.last_modified("*.js").unwrap();
        let newest = mtime(&dir.path().join("c.js")).unwrap();
        assert_eq!(aggregate, newest);
    }

    #[test]
    fn wildcard_with_zero_matches_fails() {
        let dir = TempDir::new().unwrap();
        let locator = FileLocator::new(dir.path());
        assert!(matches!(
            locator.locate("*.js"),
            Err(LocateError::EmptyWildcard(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_entry_aborts_aggregate() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "A").unwrap();
        // A dangling symlink matches the pattern but cannot be read.
        std::os::unix::fs::symlink("missing-target", dir.path().join("b.js")).unwrap();
        fs::write(dir.path().join("c.js"), "C").unwrap();

        let locator = FileLocator::new(dir.path());
        assert!(matches!(
            locator.locate("*.js"),
            Err(LocateError::Read { .. })
        ));
    }

    #[test]
    fn relative_resolution_against_sibling() {
        let locator = FileLocator::new("/root");
        assert_eq!(
            locator
                .resolve_relative("css/main.css", "shared.css")
                .unwrap(),
            "css/shared.css"
        );
    }
}
