//! Bundle assembly.
//!
//! Turns one group of resources into a single artifact per kind: locate
//! every resource, run the pre-processor list against each one, merge the
//! results, then run the post-processor list over the merged text.

pub mod fingerprint;

use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};

use crate::locator::LocatorChain;
use crate::model::{Group, ResourceKind};
use crate::processor::{ConfigurableProcessors, ResourceProcessor};

// ============================================================================
// types
// ============================================================================

/// A finished artifact for one (group, kind) pair.
#[derive(Debug)]
pub struct Bundle {
    pub name: String,
    pub kind: ResourceKind,
    pub content: String,
    /// Freshness of the newest input, when every input reported one.
    pub last_modified: Option<SystemTime>,
}

impl Bundle {
    /// Output file name, optionally carrying a content fingerprint
    /// (`app.3f19ce07.js` style).
    pub fn file_name(&self, fingerprinted: bool) -> String {
        if fingerprinted {
            format!(
                "{}.{}.{}",
                self.name,
                fingerprint::fingerprint(&self.content),
                self.kind.extension()
            )
        } else {
            format!("{}.{}", self.name, self.kind.extension())
        }
    }
}

// ============================================================================
// bundler
// ============================================================================

pub struct Bundler {
    chain: Arc<LocatorChain>,
    pre: Vec<Arc<dyn ResourceProcessor>>,
    post: Vec<Arc<dyn ResourceProcessor>>,
}

impl Bundler {
    /// Materialize the processor lists up front so a bad spec fails the
    /// build before any resource is read.
    pub fn new(chain: Arc<LocatorChain>, processors: &ConfigurableProcessors) -> Result<Self> {
        let pre = processors.pre_processors()?;
        let post = processors.post_processors()?;
        Ok(Self { chain, pre, post })
    }

    /// Build the artifact for one kind within a group.
    pub fn build_group(&self, group: &Group, kind: ResourceKind) -> Result<Bundle> {
        let mut pieces = Vec::new();
        let mut last_modified: Option<SystemTime> = None;
        let mut freshness_unknown = false;

        for resource in group.resources_of(kind) {
            let mut content = self.chain.locate(resource.uri()).with_context(|| {
                format!("group '{}': failed to read '{}'", group.name(), resource.uri())
            })?;

            for processor in &self.pre {
                content = processor.process(Some(resource), &content).with_context(|| {
                    format!(
                        "group '{}': pre-processor '{}' failed on '{}'",
                        group.name(),
                        processor.name(),
                        resource.uri()
                    )
                })?;
            }

            // Unknown freshness on any input makes the whole bundle unknown
            match self.chain.last_modified(resource.uri()) {
                Some(mtime) if !freshness_unknown => {
                    last_modified = Some(last_modified.map_or(mtime, |acc| acc.max(mtime)));
                }
                Some(_) => {}
                None => {
                    freshness_unknown = true;
                    last_modified = None;
                }
            }
            pieces.push(content);
        }

        let mut content = pieces.join("\n");
        for processor in &self.post {
            content = processor.process(None, &content).with_context(|| {
                format!(
                    "group '{}': post-processor '{}' failed",
                    group.name(),
                    processor.name()
                )
            })?;
        }

        Ok(Bundle {
            name: group.name().to_string(),
            kind,
            content,
            last_modified,
        })
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::fs;
    use std::thread;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::model::Resource;

    fn chain_in(dir: &TempDir) -> Arc<LocatorChain> {
        Arc::new(LocatorChain::for_root(dir.path()))
    }

    fn group_of(name: &str, uris: &[&str]) -> Group {
        let mut group = Group::new(name);
        for uri in uris {
            group.push(Resource::from_uri(*uri));
        }
        group
    }

    #[test]
    fn merges_in_declaration_order_with_newlines() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.js"), "bravo()").unwrap();
        fs::write(dir.path().join("a.js"), "alpha()").unwrap();

        let chain = chain_in(&dir);
        let processors = ConfigurableProcessors::new();
        let bundler = Bundler::new(chain, &processors).unwrap();

        let group = group_of("app", &["b.js", "a.js"]);
        let bundle = bundler.build_group(&group, ResourceKind::Script).unwrap();
        assert_eq!(bundle.content, "bravo()\nalpha()");
        assert_eq!(bundle.name, "app");
    }

    #[test]
    fn pre_processors_run_per_resource() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "alpha()").unwrap();
        fs::write(dir.path().join("b.js"), "bravo()").unwrap();

        let chain = chain_in(&dir);
        let mut processors = ConfigurableProcessors::with_defaults(Arc::clone(&chain));
        processors.set_pre_spec("semicolons");
        let bundler = Bundler::new(chain, &processors).unwrap();

        let group = group_of("app", &["a.js", "b.js"]);
        let bundle = bundler.build_group(&group, ResourceKind::Script).unwrap();
        // Each resource gets its own terminator, not just the merged text
        assert_eq!(bundle.content, "alpha();\nbravo();");
    }

    #[test]
    fn kind_filter_splits_mixed_groups() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.js"), "app()").unwrap();
        fs::write(dir.path().join("app.css"), "body{}").unwrap();

        let chain = chain_in(&dir);
        let processors = ConfigurableProcessors::new();
        let bundler = Bundler::new(chain, &processors).unwrap();

        let group = group_of("site", &["app.js", "app.css"]);
        let js = bundler.build_group(&group, ResourceKind::Script).unwrap();
        let css = bundler.build_group(&group, ResourceKind::Stylesheet).unwrap();
        assert_eq!(js.content, "app()");
        assert_eq!(css.content, "body{}");
        assert_eq!(js.file_name(false), "site.js");
        assert_eq!(css.file_name(false), "site.css");
    }

    #[test]
    fn missing_resource_fails_with_group_context() {
        let dir = TempDir::new().unwrap();
        let bundler = Bundler::new(chain_in(&dir), &ConfigurableProcessors::new()).unwrap();

        let group = group_of("app", &["missing.js"]);
        let err = bundler.build_group(&group, ResourceKind::Script).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("group 'app'"), "{message}");
        assert!(message.contains("missing.js"), "{message}");
    }

    #[test]
    fn bad_processor_spec_fails_at_construction() {
        let dir = TempDir::new().unwrap();
        let chain = chain_in(&dir);
        let mut processors = ConfigurableProcessors::with_defaults(Arc::clone(&chain));
        processors.set_pre_spec("no_such_processor");
        assert!(Bundler::new(chain, &processors).is_err());
    }

    #[test]
    fn last_modified_is_the_newest_input() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "a()").unwrap();
        thread::sleep(Duration::from_millis(10));
        fs::write(dir.path().join("b.js"), "b()").unwrap();

        let chain = chain_in(&dir);
        let bundler = Bundler::new(Arc::clone(&chain), &ConfigurableProcessors::new()).unwrap();
        let group = group_of("app", &["a.js", "b.js"]);
        let bundle = bundler.build_group(&group, ResourceKind::Script).unwrap();
        assert_eq!(bundle.last_modified, chain.last_modified("b.js"));
    }

    #[test]
    fn unknown_input_freshness_makes_bundle_freshness_unknown() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "a()").unwrap();
        fs::write(dir.path().join("c.js"), "c()").unwrap();

        let mut group = Group::new("app");
        group.push(Resource::from_uri("a.js"));
        group.push(Resource::from_uri("builtin:console-guard.js"));
        // A known mtime after the unknown one must not resurrect freshness.
        group.push(Resource::from_uri("c.js"));

        let bundler = Bundler::new(chain_in(&dir), &ConfigurableProcessors::new()).unwrap();
        let bundle = bundler.build_group(&group, ResourceKind::Script).unwrap();
        assert!(bundle.last_modified.is_none());
    }

    #[test]
    fn empty_kind_produces_empty_bundle() {
        let dir = TempDir::new().unwrap();
        let bundler = Bundler::new(chain_in(&dir), &ConfigurableProcessors::new()).unwrap();
        let group = group_of("app", &[]);
        let bundle = bundler.build_group(&group, ResourceKind::Stylesheet).unwrap();
        assert_eq!(bundle.content, "");
        // Zero inputs means no freshness claim at all, not epoch.
        assert!(bundle.last_modified.is_none());
    }
}
