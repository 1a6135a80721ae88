//! Extension-scoped processor decoration.

use std::sync::Arc;

use super::{ProcessError, ResourceProcessor};
use crate::model::Resource;

/// Wraps a processor so it only applies to resources whose URI extension
/// matches; a pass-through no-op for everything else.
///
/// Only meaningful for pre-processors - merged content has no single
/// resource to scope against, which is why the factory rejects scoped
/// tokens in the post list.
pub struct ExtensionScoped {
    inner: Arc<dyn ResourceProcessor>,
    extension: String,
    name: String,
}

impl ExtensionScoped {
    pub fn new(inner: Arc<dyn ResourceProcessor>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let name = format!("{}.{}", inner.name(), extension);
        Self {
            inner,
            extension,
            name,
        }
    }

    fn applies_to(&self, resource: Option<&Resource>) -> bool {
        resource
            .and_then(Resource::uri_extension)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

impl ResourceProcessor for ExtensionScoped {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, resource: Option<&Resource>, input: &str) -> Result<String, ProcessError> {
        if self.applies_to(resource) {
            self.inner.process(resource, input)
        } else {
            Ok(input.to_string())
        }
    }
}
