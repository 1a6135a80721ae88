//! Group listing.

use anyhow::Result;
use serde_json::json;

use crate::config::BundleConfig;
use crate::log;
use crate::model::{ConfigModelFactory, ModelFactory};

/// Print the configured groups and their resources.
pub fn list_groups(config: &BundleConfig, as_json: bool) -> Result<()> {
    let model = ConfigModelFactory::from_config(config).create()?;

    if as_json {
        let groups: Vec<_> = model
            .groups()
            .iter()
            .map(|group| {
                json!({
                    "name": group.name(),
                    "resources": group
                        .resources()
                        .iter()
                        .map(|r| json!({ "uri": r.uri(), "kind": r.kind().to_string() }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json!({ "groups": groups }))?);
        return Ok(());
    }

    for group in model.groups() {
        log!("list"; "{} ({} resources)", group.name(), group.resources().len());
        for resource in group.resources() {
            log!("list"; "  [{}] {}", resource.kind(), resource.uri());
        }
    }
    Ok(())
}
