//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
///
/// Processor-spec errors (`UnknownProcessor`, `ExtensionScopedPost`) are
/// raised lazily, the first time a processor list is materialized, not
/// when the spec string is set.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),

    #[error("unknown processor `{name}` in spec `{spec}`")]
    UnknownProcessor { name: String, spec: String },

    #[error(
        "extension-scoped token `{token}` is not allowed for post-processors \
         (merged content has no single resource to scope against)"
    )]
    ExtensionScopedPost { token: String },
}
