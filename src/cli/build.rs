//! Bundle building orchestration.
//!
//! Build pipeline phases:
//! - **Init** - Apply CLI overrides, prepare output directory
//! - **Model** - Produce the bundle model through the cached factory
//! - **Assemble** - Locate, pre-process and merge each (group, kind) pair
//! - **Write** - Emit artifacts, fingerprinted when configured
//! - **Finalize** - Summary logging

use std::fs;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;

use crate::auth::ResourceAuthorizer;
use crate::bundle::{Bundle, Bundler};
use crate::cli::BuildArgs;
use crate::config::BundleConfig;
use crate::lifecycle::{CallbackRegistry, LifecycleCallback};
use crate::locator::LocatorChain;
use crate::model::{CachedModelFactory, ConfigModelFactory, Group, ResourceKind};
use crate::processor::ConfigurableProcessors;
use crate::{debug, log};

/// Fold CLI switches into the loaded config.
pub fn apply_cli_overrides(config: &mut BundleConfig, args: &BuildArgs) {
    if let Some(minify) = args.minify {
        config.build.minify = minify;
    }
    if let Some(fingerprint) = args.fingerprint {
        config.build.fingerprint = fingerprint;
    }
    if args.dev {
        config.build.dev = true;
    }
    if let Some(output) = &args.output {
        config.build.output = output.clone();
    }
}

/// Logs model builds so cache hits are visible under --verbose.
struct BuildLogger;

impl LifecycleCallback for BuildLogger {
    fn on_before_model_created(&self) {
        debug!("model"; "building bundle model");
    }

    fn on_after_model_created(&self) {
        debug!("model"; "bundle model ready");
    }
}

pub fn build_bundles(config: &BundleConfig, args: &BuildArgs) -> Result<()> {
    let started = Instant::now();

    let chain = Arc::new(LocatorChain::for_root(config.get_root()));
    let mut processors = ConfigurableProcessors::with_defaults(Arc::clone(&chain));
    processors.set_pre_spec(config.pre_processor_spec());
    processors.set_post_spec(config.post_processor_spec());

    let authorizer = Arc::new(ResourceAuthorizer::new());
    let callbacks = Arc::new(CallbackRegistry::new());
    callbacks.register(Arc::new(BuildLogger));

    let factory = CachedModelFactory::new(
        Box::new(ConfigModelFactory::from_config(config)),
        Arc::clone(&callbacks),
        Arc::clone(&authorizer),
        config.build.dev,
    );
    let model = factory.create()?;
    if let Some(duration) = factory.last_build_duration() {
        debug!("model"; "model built in {duration:.2?}");
    }
    if config.build.dev {
        debug!("model"; "{} resources authorized for proxying", authorizer.snapshot().len());
    }

    let bundler = Bundler::new(chain, &processors)?;
    let output_dir = prepare_output_dir(config, args.clean)?;

    // Expand the group selection into one job per (group, kind)
    let jobs = collect_jobs(model.groups(), &args.groups)?;
    let bundles: Vec<Bundle> = jobs
        .par_iter()
        .map(|(group, kind)| bundler.build_group(group, *kind))
        .collect::<Result<_>>()?;

    for bundle in &bundles {
        let file_name = bundle.file_name(config.build.fingerprint);
        let path = output_dir.join(&file_name);
        fs::write(&path, &bundle.content)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        debug!("build"; "wrote {} ({} bytes)", file_name, bundle.content.len());
    }

    let noun = if bundles.len() == 1 { "bundle" } else { "bundles" };
    log!(
        "build";
        "{} {noun} written to {} in {:.2?}",
        bundles.len(),
        output_dir.display(),
        started.elapsed()
    );
    Ok(())
}

fn prepare_output_dir(config: &BundleConfig, clean: bool) -> Result<std::path::PathBuf> {
    let output_dir = config.output_dir();
    if clean && output_dir.exists() {
        fs::remove_dir_all(&output_dir)
            .with_context(|| format!("failed to clean '{}'", output_dir.display()))?;
    }
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create '{}'", output_dir.display()))?;
    Ok(output_dir)
}

fn collect_jobs<'m>(
    groups: &'m [Group],
    selected: &[String],
) -> Result<Vec<(&'m Group, ResourceKind)>> {
    let groups: Vec<&Group> = if selected.is_empty() {
        groups.iter().collect()
    } else {
        selected
            .iter()
            .map(|name| {
                groups
                    .iter()
                    .find(|g| g.name() == name)
                    .ok_or_else(|| anyhow!("unknown group '{name}'"))
            })
            .collect::<Result<_>>()?
    };

    Ok(groups
        .into_iter()
        .flat_map(|group| group.kinds().into_iter().map(move |kind| (group, kind)))
        .collect())
}
