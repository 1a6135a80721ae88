//! Model construction from configuration.

use thiserror::Error;

use super::{BundleModel, Group, Resource};
use crate::config::{BundleConfig, GroupDecl};

/// Errors raised while building a model.
///
/// Cloneable so a single failed build attempt can hand the same failure
/// to every caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("invalid group declaration: {0}")]
    InvalidGroup(String),

    #[error("model build failed: {0}")]
    Build(String),
}

/// Produces a fresh model from the current configuration snapshot.
///
/// Pure with respect to caching - the caching layer lives in
/// [`super::CachedModelFactory`].
pub trait ModelFactory: Send + Sync {
    fn create(&self) -> Result<BundleModel, ModelError>;

    /// Release factory-held resources. Default is a no-op.
    fn destroy(&self) {}
}

// ============================================================================
// ConfigModelFactory
// ============================================================================

/// Builds the model from `[[group]]` declarations, preserving declaration
/// order and performing structural validation only - no locating, no
/// processing.
pub struct ConfigModelFactory {
    groups: Vec<GroupDecl>,
}

impl ConfigModelFactory {
    pub fn from_config(config: &BundleConfig) -> Self {
        Self {
            groups: config.groups.clone(),
        }
    }

    pub fn new(groups: Vec<GroupDecl>) -> Self {
        Self { groups }
    }
}

impl ModelFactory for ConfigModelFactory {
    fn create(&self) -> Result<BundleModel, ModelError> {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut groups = Vec::with_capacity(self.groups.len());

        for decl in &self.groups {
            let name = decl.name.trim();
            if name.is_empty() {
                return Err(ModelError::InvalidGroup("empty group name".into()));
            }
            if !seen.insert(name.to_string()) {
                return Err(ModelError::InvalidGroup(format!(
                    "duplicate group name `{name}`"
                )));
            }

            let mut group = Group::new(name);
            for uri in &decl.resources {
                let uri = uri.trim();
                if uri.is_empty() {
                    return Err(ModelError::InvalidGroup(format!(
                        "group `{name}` contains an empty resource uri"
                    )));
                }
                group.push(Resource::from_uri(uri));
            }
            groups.push(group);
        }

        Ok(BundleModel::new(groups))
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, resources: &[&str]) -> GroupDecl {
        GroupDecl {
            name: name.to_string(),
            resources: resources.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn builds_groups_in_declaration_order() {
        let factory = ConfigModelFactory::new(vec![
            decl("vendor", &["v.js"]),
            decl("app", &["a.js", "a.css"]),
        ]);
        let model = factory.create().unwrap();
        let names: Vec<_> = model.groups().iter().map(Group::name).collect();
        assert_eq!(names, vec!["vendor", "app"]);
        assert_eq!(model.group("app").unwrap().resources().len(), 2);
    }

    #[test]
    fn empty_group_is_allowed() {
        let factory = ConfigModelFactory::new(vec![decl("empty", &[])]);
        let model = factory.create().unwrap();
        assert!(model.group("empty").unwrap().is_empty());
    }

    #[test]
    fn empty_name_rejected() {
        let factory = ConfigModelFactory::new(vec![decl("  ", &[])]);
        assert!(matches!(
            factory.create(),
            Err(ModelError::InvalidGroup(_))
        ));
    }

    #[test]
    fn duplicate_name_rejected() {
        let factory = ConfigModelFactory::new(vec![decl("a", &[]), decl("a", &[])]);
        assert!(factory.create().is_err());
    }

    #[test]
    fn empty_resource_uri_rejected() {
        let factory = ConfigModelFactory::new(vec![decl("a", &["  "])]);
        assert!(factory.create().is_err());
    }
}
