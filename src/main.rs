//! Bundlr - a group-based web resource bundler.

mod auth;
mod bundle;
mod cli;
mod config;
mod embed;
mod lifecycle;
mod locator;
mod logger;
mod model;
mod processor;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::BundleConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let mut config = BundleConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Build { build_args } => {
            logger::set_verbose(build_args.verbose);
            cli::build::apply_cli_overrides(&mut config, build_args);
            cli::build::build_bundles(&config, build_args)
        }
        Commands::List { json } => cli::list::list_groups(&config, *json),
    }
}
