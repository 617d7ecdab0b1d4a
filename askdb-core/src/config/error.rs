use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
///
/// All of them are fatal: the process must not start serving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required environment variable '{name}'")]
    MissingEnv { name: &'static str },

    #[error("environment variable '{name}' is invalid: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unknown model provider '{0}' (expected 'openai' or 'ollama')")]
    UnknownProvider(String),
}
