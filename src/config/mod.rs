//! Configuration management for `bundlr.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                            |
//! |-------------|----------------------------------------------------|
//! | `[build]`   | Output dir, dev mode, minify, processor specs      |
//! | `[[group]]` | Named resource groups, in declaration order        |
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "dist"
//! minify = true
//!
//! [[group]]
//! name = "app"
//! resources = ["js/*.js", "css/main.css", "https://cdn.example.com/lib.js"]
//! ```

mod error;

pub use error::ConfigError;

use crate::log;
use anyhow::Result;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing bundlr.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildSection,

    /// Resource groups, in declaration order
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupDecl>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            build: BuildSection::default(),
            groups: Vec::new(),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Output directory, relative to the project root
    pub output: PathBuf,

    /// Development mode - enables proxy authorization of model resources
    pub dev: bool,

    /// Minify bundled scripts and stylesheets
    pub minify: bool,

    /// Append a content-hash fingerprint to bundle filenames
    pub fingerprint: bool,

    /// Explicit pre-processor spec, e.g. `"css_import,js_min.js"`.
    /// Defaults are derived from `minify` when absent.
    pub pre_processors: Option<String>,

    /// Explicit post-processor spec. Empty by default.
    pub post_processors: Option<String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
            dev: false,
            minify: true,
            fingerprint: false,
            pre_processors: None,
            post_processors: None,
        }
    }
}

/// One `[[group]]` declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupDecl {
    /// Group name - must be non-empty and unique within the model
    pub name: String,

    /// Resource URIs, in concatenation order
    #[serde(default)]
    pub resources: Vec<String>,
}

// ============================================================================
// loading
// ============================================================================

impl BundleConfig {
    /// Load configuration from a file path with unknown field detection.
    ///
    /// The project root is the config file's parent directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = path.to_path_buf();
        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Structural validation of the group declarations.
    ///
    /// Processor spec strings are deliberately not validated here; they are
    /// checked when the processor lists are materialized.
    pub fn validate(&self) -> Result<()> {
        let mut seen = rustc_hash::FxHashSet::default();
        for group in &self.groups {
            if group.name.trim().is_empty() {
                return Err(
                    ConfigError::Validation("group with empty name".into()).into(),
                );
            }
            if !seen.insert(group.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate group name `{}`",
                    group.name
                ))
                .into());
            }
        }
        Ok(())
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Get the root directory path.
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Absolute output directory, with tilde expansion.
    pub fn output_dir(&self) -> PathBuf {
        let raw = self.build.output.to_string_lossy();
        let expanded = shellexpand::tilde(raw.as_ref());
        let path = PathBuf::from(expanded.as_ref());
        if path.is_absolute() {
            path
        } else {
            self.root_join(path)
        }
    }

    /// Effective pre-processor spec.
    ///
    /// When not set explicitly, derived from the `minify` flag:
    /// `css_import` and `semicolons.js` always run, the minifiers only
    /// when minification is on.
    pub fn pre_processor_spec(&self) -> String {
        match &self.build.pre_processors {
            Some(spec) => spec.clone(),
            None if self.build.minify => {
                "css_import,semicolons.js,css_min.css,js_min.js".to_string()
            }
            None => "css_import,semicolons.js".to_string(),
        }
    }

    /// Effective post-processor spec (empty unless configured).
    pub fn post_processor_spec(&self) -> String {
        self.build.post_processors.clone().unwrap_or_default()
    }
}

// ============================================================================
// tests
// ============================================================================
