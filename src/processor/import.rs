//! `@import` inlining for stylesheets (`css_import`).
//!
//! Replaces `@import` statements with the referenced stylesheet's content,
//! resolved relative to the importing resource through the locator chain.
//! Imports are inlined recursively; a cycle is broken by replacing the
//! repeated import with nothing.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use rustc_hash::FxHashSet;

use super::{ProcessError, ResourceProcessor};
use crate::debug;
use crate::locator::LocatorChain;
use crate::model::{Resource, ResourceKind};

/// `@import "x.css";` / `@import url(x.css);` and friends.
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(?:url\s*\(\s*)?["']?([^"'()\s;]+)["']?\s*\)?\s*;"#)
        .expect("hardcoded regex is valid")
});

pub struct CssImport {
    chain: Arc<LocatorChain>,
}

impl CssImport {
    pub fn new(chain: Arc<LocatorChain>) -> Self {
        Self { chain }
    }

    fn inline(
        &self,
        base_uri: &str,
        content: &str,
        seen: &mut FxHashSet<String>,
    ) -> Result<String, ProcessError> {
        let mut out = String::with_capacity(content.len());
        let mut cursor = 0;

        for captures in IMPORT_RE.captures_iter(content) {
            let whole = captures.get(0).expect("capture 0 always present");
            let reference = &captures[1];
            out.push_str(&content[cursor..whole.start()]);
            cursor = whole.end();

            let resolved = self
                .chain
                .resolve_relative(base_uri, reference)
                .map_err(|source| ProcessError::Inline {
                    processor: self.name().to_string(),
                    uri: reference.to_string(),
                    source,
                })?;

            if !seen.insert(resolved.clone()) {
                debug!("css_import"; "skipping recursive import of `{}`", resolved);
                continue;
            }

            let imported =
                self.chain
                    .locate(&resolved)
                    .map_err(|source| ProcessError::Inline {
                        processor: self.name().to_string(),
                        uri: resolved.clone(),
                        source,
                    })?;
            let inlined = self.inline(&resolved, &imported, seen)?;
            out.push_str(&inlined);
        }

        out.push_str(&content[cursor..]);
        Ok(out)
    }
}

impl ResourceProcessor for CssImport {
    fn name(&self) -> &str {
        "css_import"
    }

    fn process(&self, resource: Option<&Resource>, input: &str) -> Result<String, ProcessError> {
        // Only meaningful for stylesheets with a known origin to resolve
        // relative imports against.
        let Some(resource) = resource.filter(|r| r.kind() == ResourceKind::Stylesheet) else {
            return Ok(input.to_string());
        };

        let mut seen = FxHashSet::default();
        seen.insert(resource.uri().to_string());
        self.inline(resource.uri(), input, &mut seen)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn chain_for(dir: &TempDir) -> Arc<LocatorChain> {
        Arc::new(LocatorChain::for_root(dir.path()))
    }

    #[test]
    fn inlines_relative_import() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("shared.css"), "a { color: red; }").unwrap();

        let processor = CssImport::new(chain_for(&dir));
        let resource = Resource::stylesheet("main.css");
        let out = processor
            .process(Some(&resource), "@import \"shared.css\";\nbody {}")
            .unwrap();
        assert_eq!(out, "a { color: red; }\nbody {}");
    }

    #[test]
    fn inlines_url_form_and_nested_imports() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("inner.css"), "i {}").unwrap();
        fs::write(
            dir.path().join("outer.css"),
            "@import url(inner.css);\no {}",
        )
        .unwrap();

        let processor = CssImport::new(chain_for(&dir));
        let resource = Resource::stylesheet("main.css");
        let out = processor
            .process(Some(&resource), "@import url(\"outer.css\");")
            .unwrap();
        assert_eq!(out, "i {}\no {}");
    }

    #[test]
    fn breaks_import_cycles() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "@import \"b.css\";\na {}").unwrap();
        fs::write(dir.path().join("b.css"), "@import \"a.css\";\nb {}").unwrap();

        let processor = CssImport::new(chain_for(&dir));
        let resource = Resource::stylesheet("a.css");
        let out = processor
            .process(Some(&resource), "@import \"b.css\";\na {}")
            .unwrap();
        // a.css itself is the entry; the cycle back into it is dropped.
        assert_eq!(out, "\nb {}\na {}");
    }

    #[test]
    fn missing_import_is_an_error() {
        let dir = TempDir::new().unwrap();
        let processor = CssImport::new(chain_for(&dir));
        let resource = Resource::stylesheet("main.css");
        assert!(matches!(
            processor.process(Some(&resource), "@import \"missing.css\";"),
            Err(ProcessError::Inline { .. })
        ));
    }

    #[test]
    fn scripts_and_merged_content_pass_through() {
        let dir = TempDir::new().unwrap();
        let processor = CssImport::new(chain_for(&dir));
        let script = Resource::script("a.js");
        let input = "@import \"x.css\";";
        assert_eq!(processor.process(Some(&script), input).unwrap(), input);
        assert_eq!(processor.process(None, input).unwrap(), input);
    }
}
