use super::error::ConfigError;
use std::str::FromStr;

pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_NAME: &str = "DB_NAME";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const LANGSMITH_API_KEY: &str = "LANGSMITH_API_KEY";
pub const LANGSMITH_TRACING: &str = "LANGSMITH_TRACING";
pub const LANGSMITH_ENDPOINT: &str = "LANGSMITH_ENDPOINT";
pub const LANGSMITH_PROJECT: &str = "LANGSMITH_PROJECT";

/// Lookup over some source of environment variables.
///
/// The process environment is the production source; tests hand in a map.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Reads a variable that must be present. Empty values count as present.
pub fn required(env: &dyn EnvSource, name: &'static str) -> Result<String, ConfigError> {
    env.var(name).ok_or(ConfigError::MissingEnv { name })
}

/// Reads a variable that must be present and non-blank.
pub fn required_non_empty(env: &dyn EnvSource, name: &'static str) -> Result<String, ConfigError> {
    let value = required(env, name)?;
    if value.trim().is_empty() {
        return Err(ConfigError::MissingEnv { name });
    }
    Ok(value)
}

pub fn optional(env: &dyn EnvSource, name: &str) -> Option<String> {
    env.var(name).filter(|value| !value.trim().is_empty())
}

pub fn parsed_or<T>(env: &dyn EnvSource, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(env, name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| ConfigError::InvalidEnv {
                name,
                reason: format!("'{raw}': {err}"),
            }),
    }
}

/// Accepts the usual truthy spellings (`true`, `1`, `yes`, `on`).
pub fn flag(env: &dyn EnvSource, name: &str) -> bool {
    optional(env, name)
        .map(|raw| {
            matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}
