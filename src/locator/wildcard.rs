//! Wildcard expansion for filesystem URIs.
//!
//! Patterns use glob tokens: `*` and `?` within one path segment, `**`
//! for recursive matching. Expansion separates the fixed directory prefix
//! from the pattern, lists matching entries under that prefix and returns
//! them in lexicographic order so aggregates are deterministic.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use jwalk::WalkDir;

use super::LocateError;

/// Whether a URI contains glob tokens.
pub fn has_wildcard(uri: &str) -> bool {
    uri.contains('*') || uri.contains('?')
}

/// Split a wildcard path into its fixed directory prefix and the pattern
/// relative to it.
///
/// `assets/js/*.js` -> (`assets/js`, `*.js`)
fn split_prefix(path: &str) -> (&str, &str) {
    let first_token = path
        .find(['*', '?'])
        .expect("split_prefix requires a wildcard path");
    match path[..first_token].rfind('/') {
        Some(slash) => (&path[..slash], &path[slash + 1..]),
        None => ("", path),
    }
}

/// Expand a wildcard path into the matching files, lexicographically
/// ordered. Matches directories are skipped; zero matches is an error.
pub fn expand(path: &Path) -> Result<Vec<PathBuf>, LocateError> {
    let uri = path.to_string_lossy().replace('\\', "/");
    let (prefix, pattern) = split_prefix(&uri);
    let base = if prefix.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(prefix)
    };

    let matcher = Pattern::new(pattern).map_err(|e| LocateError::InvalidUri {
        uri: uri.clone(),
        reason: e.to_string(),
    })?;
    // `*` must not cross directory boundaries; `**` does.
    let options = MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::default()
    };

    let recursive = pattern.contains("**");
    let mut matches = Vec::new();

    if recursive {
        for entry in WalkDir::new(&base).sort(true) {
            let entry = entry.map_err(|e| LocateError::Read {
                uri: uri.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let full = entry.path();
            let rel = full.strip_prefix(&base).unwrap_or(&full);
            if matcher.matches_path_with(rel, options) {
                matches.push(full);
            }
        }
    } else {
        let entries = std::fs::read_dir(&base).map_err(|e| LocateError::Read {
            uri: uri.clone(),
            source: e,
        })?;
        for entry in entries.flatten() {
            // Skip directories only; a matched entry that is not readable
            // (e.g. a dangling symlink) must surface as a read error later.
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
                continue;
            }
            let name = entry.file_name();
            if matcher.matches_path_with(Path::new(&name), options) {
                matches.push(entry.path());
            }
        }
    }

    if matches.is_empty() {
        return Err(LocateError::EmptyWildcard(uri));
    }
    matches.sort();
    Ok(matches)
}

// ============================================================================
// tests
// ============================================================================
