//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Bundlr web resource bundler CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: bundlr.toml)
    #[arg(short = 'C', long, default_value = "bundlr.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build bundle artifacts from the configured groups
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// List the configured groups and their resources
    #[command(visible_alias = "l")]
    List {
        /// Emit machine-readable JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Build command arguments
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Groups to build (all groups when omitted)
    #[arg(value_name = "GROUP")]
    pub groups: Vec<String>,

    /// Clean output directory completely before building
    #[arg(short, long)]
    pub clean: bool,

    /// Minify bundle content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Fingerprint artifact names with a content hash
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub fingerprint: Option<bool>,

    /// Development mode (authorizes raw resource proxying)
    #[arg(short, long)]
    pub dev: bool,

    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Verbose diagnostic output
    #[arg(short, long)]
    pub verbose: bool,
}
