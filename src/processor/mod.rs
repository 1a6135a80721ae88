//! Content processors for resources and merged bundles.
//!
//! A [`ResourceProcessor`] transforms content. Pre-processors receive the
//! originating [`Resource`]; post-processors run on merged group content
//! and receive `None`. Processors are pure with respect to the pipeline:
//! no shared mutable state across invocations.

mod append;
mod ext;
mod factory;
mod import;
mod minify;

pub use append::Semicolons;
pub use ext::ExtensionScoped;
pub use factory::ConfigurableProcessors;
pub use import::CssImport;
pub use minify::{CssMin, JsMin};

use crate::model::Resource;
use thiserror::Error;

/// Errors raised by processors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The processor rejected its input, e.g. a syntax error in source
    /// content. Not retried; aborts the enclosing build attempt.
    #[error("processor `{processor}` rejected input: {message}")]
    Rejected { processor: String, message: String },

    /// An `@import`-style inline failed to locate the referenced resource.
    #[error("processor `{processor}` failed to inline `{uri}`")]
    Inline {
        processor: String,
        uri: String,
        #[source]
        source: crate::locator::LocateError,
    },
}

/// A content transform, applied per resource (pre) or per merged group
/// (post, with `resource = None`).
pub trait ResourceProcessor: Send + Sync {
    /// Registered name, used in configuration specs and error context.
    fn name(&self) -> &str;

    /// Transform `input`, returning the replacement content.
    fn process(&self, resource: Option<&Resource>, input: &str) -> Result<String, ProcessError>;
}
