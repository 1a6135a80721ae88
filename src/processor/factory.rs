//! Configuration-driven processor selection.
//!
//! Specs are comma-separated token lists. A token is a registered
//! processor name, or `name.extension` which scopes that processor to
//! resources with a matching URI extension. Dotted tokens are split on
//! the last dot only, so registered names may themselves contain dots -
//! exact-name lookup always takes precedence over scoping.
//!
//! Specs are validated lazily: setting an invalid spec succeeds, the
//! error surfaces the first time the list is materialized.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{CssImport, CssMin, ExtensionScoped, JsMin, ResourceProcessor, Semicolons};
use crate::config::ConfigError;
use crate::locator::LocatorChain;

#[derive(Default)]
pub struct ConfigurableProcessors {
    registry: FxHashMap<String, Arc<dyn ResourceProcessor>>,
    pre_spec: String,
    post_spec: String,
}

impl ConfigurableProcessors {
    /// Empty registry, empty specs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in processors: `css_import`,
    /// `semicolons`, `css_min`, `js_min`.
    pub fn with_defaults(chain: Arc<LocatorChain>) -> Self {
        let mut this = Self::new();
        this.register(Arc::new(CssImport::new(chain)));
        this.register(Arc::new(Semicolons));
        this.register(Arc::new(CssMin));
        this.register(Arc::new(JsMin));
        this
    }

    /// Register a processor under its own name. Last registration wins.
    pub fn register(&mut self, processor: Arc<dyn ResourceProcessor>) {
        self.registry
            .insert(processor.name().to_string(), processor);
    }

    /// Set the pre-processor spec. Not validated here.
    pub fn set_pre_spec(&mut self, spec: impl Into<String>) {
        self.pre_spec = spec.into();
    }

    /// Set the post-processor spec. Not validated here.
    pub fn set_post_spec(&mut self, spec: impl Into<String>) {
        self.post_spec = spec.into();
    }

    /// Materialize the pre-processor list. Extension-scoped tokens are
    /// accepted; unknown names are configuration errors.
    pub fn pre_processors(&self) -> Result<Vec<Arc<dyn ResourceProcessor>>, ConfigError> {
        self.materialize(&self.pre_spec, true)
    }

    /// Materialize the post-processor list. Any dotted token that is not
    /// itself a registered exact name is a configuration error.
    pub fn post_processors(&self) -> Result<Vec<Arc<dyn ResourceProcessor>>, ConfigError> {
        self.materialize(&self.post_spec, false)
    }

    fn materialize(
        &self,
        spec: &str,
        allow_extension_scope: bool,
    ) -> Result<Vec<Arc<dyn ResourceProcessor>>, ConfigError> {
        let mut processors = Vec::new();
        for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            // Exact name first, so registered names may contain dots.
            if let Some(processor) = self.registry.get(token) {
                processors.push(Arc::clone(processor));
                continue;
            }

            let Some((name, extension)) = token.rsplit_once('.') else {
                return Err(ConfigError::UnknownProcessor {
                    name: token.to_string(),
                    spec: spec.to_string(),
                });
            };

            if !allow_extension_scope {
                return Err(ConfigError::ExtensionScopedPost {
                    token: token.to_string(),
                });
            }

            let Some(processor) = self.registry.get(name) else {
                return Err(ConfigError::UnknownProcessor {
                    name: name.to_string(),
                    spec: spec.to_string(),
                });
            };
            processors.push(Arc::new(ExtensionScoped::new(
                Arc::clone(processor),
                extension,
            )));
        }
        Ok(processors)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Resource;
    use crate::processor::ProcessError;

    struct Noop(&'static str);

    impl ResourceProcessor for Noop {
        fn name(&self) -> &str {
            self.0
        }

        fn process(
            &self,
            _resource: Option<&Resource>,
            input: &str,
        ) -> Result<String, ProcessError> {
            Ok(input.to_string())
        }
    }

    fn registry(names: &[&'static str]) -> ConfigurableProcessors {
        let mut factory = ConfigurableProcessors::new();
        for name in names {
            factory.register(Arc::new(Noop(name)));
        }
        factory
    }

    #[test]
    fn empty_spec_yields_empty_list() {
        let factory = registry(&["a"]);
        assert!(factory.pre_processors().unwrap().is_empty());
        assert!(factory.post_processors().unwrap().is_empty());
    }

    #[test]
    fn spec_round_trip_with_extension_scope() {
        let mut factory = registry(&["a", "b", "c"]);
        factory.set_pre_spec("a,b.js,c");

        let pre = factory.pre_processors().unwrap();
        assert_eq!(pre.len(), 3);
        assert_eq!(pre[0].name(), "a");
        assert_eq!(pre[1].name(), "b.js");
        assert_eq!(pre[2].name(), "c");
    }

    #[test]
    fn unknown_name_errors_at_materialization_not_set_time() {
        let mut factory = registry(&["a"]);
        // Setting an invalid spec must succeed.
        factory.set_pre_spec("x");
        assert!(matches!(
            factory.pre_processors(),
            Err(ConfigError::UnknownProcessor { .. })
        ));
    }

    #[test]
    fn registered_names_may_contain_dots() {
        let mut factory = registry(&["vendor.min"]);
        factory.set_pre_spec("vendor.min");
        let pre = factory.pre_processors().unwrap();
        assert_eq!(pre.len(), 1);
        assert_eq!(pre[0].name(), "vendor.min");

        // Scoping a dotted name still splits on the last dot.
        factory.set_pre_spec("vendor.min.js");
        let pre = factory.pre_processors().unwrap();
        assert_eq!(pre[0].name(), "vendor.min.js");
    }

    #[test]
    fn extension_scope_rejected_in_post_list() {
        let mut factory = registry(&["a"]);
        factory.set_post_spec("a.js");
        assert!(matches!(
            factory.post_processors(),
            Err(ConfigError::ExtensionScopedPost { .. })
        ));
    }

    #[test]
    fn bare_names_allowed_in_post_list() {
        let mut factory = registry(&["a", "b"]);
        factory.set_post_spec("a,b");
        assert_eq!(factory.post_processors().unwrap().len(), 2);
    }

    #[test]
    fn exact_dotted_name_allowed_in_post_list() {
        let mut factory = registry(&["vendor.min"]);
        factory.set_post_spec("vendor.min");
        assert_eq!(factory.post_processors().unwrap().len(), 1);
    }
}
