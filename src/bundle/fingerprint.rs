//! Content fingerprints for cache-busting artifact names.

/// Short stable hex digest of bundle content. 8 hex chars is plenty for
/// cache busting and keeps file names readable.
pub fn fingerprint(content: &str) -> String {
    let hash = blake3::hash(content.as_bytes());
    hex::encode(&hash.as_bytes()[..4])
}
