//! Bundle model - groups of web resources.
//!
//! A [`BundleModel`] is an ordered collection of named [`Group`]s, each an
//! ordered list of [`Resource`]s. Models are built fresh on every
//! (re)generation and never mutated after publication; callers share them
//! behind an `Arc`.

pub mod cached;
pub mod factory;
pub mod transform;

pub use cached::CachedModelFactory;
pub use factory::{ConfigModelFactory, ModelError, ModelFactory};
pub use transform::ModelTransform;

use rustc_hash::FxHashSet;

// ============================================================================
// Resource
// ============================================================================

/// Kind of a web resource, inferred from its URI extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// JavaScript source.
    Script,
    /// CSS source.
    Stylesheet,
}

impl ResourceKind {
    /// File extension for artifacts of this kind.
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Script => "js",
            Self::Stylesheet => "css",
        }
    }

    /// Infer the kind from a resource URI (`.css` is a stylesheet,
    /// anything else is treated as a script).
    pub fn from_uri(uri: &str) -> Self {
        // Strip a query string before looking at the extension
        let path = uri.split_once('?').map_or(uri, |(p, _)| p);
        if path.to_ascii_lowercase().ends_with(".css") {
            Self::Stylesheet
        } else {
            Self::Script
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A single addressable script or stylesheet input.
///
/// Immutable value; identity is the (uri, kind) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    uri: String,
    kind: ResourceKind,
}

impl Resource {
    /// Create a resource, inferring its kind from the URI extension.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let kind = ResourceKind::from_uri(&uri);
        Self { uri, kind }
    }

    /// Create a script resource.
    pub fn script(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: ResourceKind::Script,
        }
    }

    /// Create a stylesheet resource.
    pub fn stylesheet(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: ResourceKind::Stylesheet,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Extension of the resource URI, if any (used for extension-scoped
    /// processors).
    pub fn uri_extension(&self) -> Option<&str> {
        let path = self.uri.split_once('?').map_or(self.uri.as_str(), |(p, _)| p);
        let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        name.rsplit_once('.').map(|(_, ext)| ext)
    }
}

// ============================================================================
// Group
// ============================================================================

/// A named, ordered bundle of resources emitted as one concatenated
/// artifact per resource kind.
///
/// Order is significant: it determines concatenation order and therefore
/// execution/cascade order at runtime.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    resources: Vec<Resource>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a resource, collapsing an adjacent identical duplicate.
    pub fn push(&mut self, resource: Resource) {
        if self.resources.last() == Some(&resource) {
            return;
        }
        self.resources.push(resource);
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Resources of the given kind, in declaration order.
    pub fn resources_of(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |r| r.kind() == kind)
    }

    /// Kinds present in this group, scripts first.
    pub fn kinds(&self) -> Vec<ResourceKind> {
        [ResourceKind::Script, ResourceKind::Stylesheet]
            .into_iter()
            .filter(|k| self.resources.iter().any(|r| r.kind() == *k))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

// ============================================================================
// BundleModel
// ============================================================================

/// The full group→resources model. Immutable once published.
#[derive(Debug, Clone, Default)]
pub struct BundleModel {
    groups: Vec<Group>,
}

impl BundleModel {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name() == name)
    }

    /// Deduplicated union of all resources across groups, preserving the
    /// order of first appearance.
    pub fn all_resources(&self) -> Vec<&Resource> {
        let mut seen = FxHashSet::default();
        self.groups
            .iter()
            .flat_map(|g| g.resources())
            .filter(|r| seen.insert((r.uri(), r.kind())))
            .collect()
    }
}

// ============================================================================
// tests
// ============================================================================
