//! Embedded static resources.
//!
//! Small assets compiled into the binary and addressable through the
//! `builtin:` URI scheme, e.g. `builtin:reset.css`. This is the bundler's
//! answer to "resources that ship with the tool rather than the project".

/// One compiled-in asset.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedAsset {
    pub name: &'static str,
    pub content: &'static str,
}

/// All embedded assets, addressable as `builtin:<name>`.
pub const ASSETS: &[EmbeddedAsset] = &[
    EmbeddedAsset {
        name: "reset.css",
        content: include_str!("assets/reset.css"),
    },
    EmbeddedAsset {
        name: "console-guard.js",
        content: include_str!("assets/console-guard.js"),
    },
];

/// Look up an embedded asset by name.
pub fn find(name: &str) -> Option<&'static EmbeddedAsset> {
    ASSETS.iter().find(|a| a.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_assets_resolve() {
        assert!(find("reset.css").is_some());
        assert!(find("console-guard.js").is_some());
        assert!(find("nope.css").is_none());
    }

    #[test]
    fn assets_are_non_empty() {
        for asset in ASSETS {
            assert!(!asset.content.trim().is_empty(), "{} is empty", asset.name);
        }
    }
}
