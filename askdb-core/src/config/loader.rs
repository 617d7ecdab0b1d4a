use super::app::{
    AgentSettings, AppConfig, DatabaseConfig, MemorySettings, ModelConfig, PromptSettings,
    ProviderKind, ServerSettings, TracingSettings,
};
use super::defaults::*;
use super::env::{self, EnvSource, ProcessEnv};
use super::error::ConfigError;
use super::CONFIG_PATH;
use dotenvy::from_filename;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use std::time::Duration;
use tracing::debug;

static ENV_LOADER: Once = Once::new();

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub model: RawModel,
    #[serde(default)]
    pub agent: RawAgent,
    #[serde(default)]
    pub memory: RawMemory,
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub database: RawDatabase,
    #[serde(default)]
    pub prompt: RawPrompt,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct RawModel {
    pub provider: Option<String>,
    pub endpoint: Option<String>,
    pub api_path: Option<String>,
    pub name: Option<String>,
    pub retry_attempts: Option<u32>,
    pub retry_backoff_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct RawAgent {
    pub dialect: Option<String>,
    pub max_rows: Option<usize>,
    pub sample_rows: Option<usize>,
    pub max_steps: Option<usize>,
    pub max_corrections: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub schema_cache_ttl_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct RawMemory {
    pub session_ttl_secs: Option<u64>,
    pub max_messages: Option<usize>,
    pub sweep_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct RawServer {
    pub bind: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct RawDatabase {
    pub max_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct RawPrompt {
    pub template: Option<String>,
    pub extra_instructions: Option<String>,
    pub custom_instruction: Option<String>,
}

/// Ensures environment variables are loaded from `.env` (and `config/.env`).
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(".env");
        let _ = from_filename("config/.env");
    });
}

/// Load configuration from the process environment plus an optional TOML file.
///
/// An explicit `path` must exist. When `path` is `None` the default location
/// is used if present and defaults apply otherwise.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    let raw = match path {
        Some(path) => read_raw(path)?,
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_raw(default_path)?
            } else {
                debug!(path = CONFIG_PATH, "No config file found, using defaults");
                RawConfig::default()
            }
        }
    };
    build(raw, &ProcessEnv)
}

/// Builds configuration from TOML text and an arbitrary environment source.
pub fn load_from_str(content: &str, env: &dyn EnvSource) -> Result<AppConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: Path::new("<inline>").to_path_buf(),
        source,
    })?;
    build(raw, env)
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    debug!(path = %path.display(), "Reading askdb configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn build(raw: RawConfig, source: &dyn EnvSource) -> Result<AppConfig, ConfigError> {
    let database = DatabaseConfig {
        host: env::required_non_empty(source, env::DB_HOST)?,
        port: env::parsed_or(source, env::DB_PORT, DEFAULT_DB_PORT)?,
        user: env::required_non_empty(source, env::DB_USER)?,
        password: env::required(source, env::DB_PASSWORD)?,
        database: env::required_non_empty(source, env::DB_NAME)?,
        max_connections: positive(
            "database.max_connections",
            raw.database
                .max_connections
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
        )?,
        acquire_timeout: Duration::from_secs(
            raw.database
                .acquire_timeout_secs
                .unwrap_or(DEFAULT_DB_ACQUIRE_TIMEOUT_SECS),
        ),
    };

    let provider: ProviderKind = raw
        .model
        .provider
        .as_deref()
        .unwrap_or(DEFAULT_PROVIDER)
        .parse()?;
    let api_key = match provider {
        ProviderKind::OpenAi => Some(env::required_non_empty(source, env::OPENAI_API_KEY)?),
        ProviderKind::Ollama => env::optional(source, env::OPENAI_API_KEY),
    };
    let endpoint = raw.model.endpoint.unwrap_or_else(|| match provider {
        ProviderKind::OpenAi => DEFAULT_OPENAI_ENDPOINT.to_string(),
        ProviderKind::Ollama => DEFAULT_OLLAMA_ENDPOINT.to_string(),
    });
    let model = ModelConfig {
        provider,
        endpoint,
        api_path: raw.model.api_path,
        model: non_blank(
            "model.name",
            raw.model.name.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        )?,
        api_key,
        retry_attempts: raw
            .model
            .retry_attempts
            .unwrap_or(DEFAULT_MODEL_RETRY_ATTEMPTS),
        retry_backoff: Duration::from_millis(
            raw.model
                .retry_backoff_ms
                .unwrap_or(DEFAULT_MODEL_RETRY_BACKOFF_MS),
        ),
        timeout: Duration::from_secs(positive(
            "model.timeout_secs",
            raw.model.timeout_secs.unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS),
        )?),
    };

    let agent = AgentSettings {
        dialect: non_blank(
            "agent.dialect",
            raw.agent
                .dialect
                .unwrap_or_else(|| DEFAULT_DIALECT.to_string()),
        )?,
        max_rows: positive(
            "agent.max_rows",
            raw.agent.max_rows.unwrap_or(DEFAULT_MAX_ROWS),
        )?,
        sample_rows: raw.agent.sample_rows.unwrap_or(DEFAULT_SAMPLE_ROWS),
        max_steps: positive(
            "agent.max_steps",
            raw.agent.max_steps.unwrap_or(DEFAULT_MAX_STEPS),
        )?,
        max_corrections: raw.agent.max_corrections.unwrap_or(DEFAULT_MAX_CORRECTIONS),
        request_timeout: Duration::from_secs(positive(
            "agent.request_timeout_secs",
            raw.agent
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )?),
        schema_cache_ttl: Duration::from_secs(
            raw.agent
                .schema_cache_ttl_secs
                .unwrap_or(DEFAULT_SCHEMA_CACHE_TTL_SECS),
        ),
    };

    let memory = MemorySettings {
        session_ttl: Duration::from_secs(positive(
            "memory.session_ttl_secs",
            raw.memory
                .session_ttl_secs
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
        )?),
        max_messages: positive(
            "memory.max_messages",
            raw.memory.max_messages.unwrap_or(DEFAULT_MAX_MESSAGES),
        )?,
        sweep_interval: Duration::from_secs(positive(
            "memory.sweep_interval_secs",
            raw.memory
                .sweep_interval_secs
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
        )?),
    };

    let server = ServerSettings {
        bind: raw.server.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
    };

    let prompt = PromptSettings {
        template: raw
            .prompt
            .template
            .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string()),
        extra_instructions: raw
            .prompt
            .extra_instructions
            .unwrap_or_else(|| DEFAULT_EXTRA_INSTRUCTIONS.to_string()),
        custom_instruction: raw
            .prompt
            .custom_instruction
            .filter(|value| !value.trim().is_empty()),
    };

    let tracing = TracingSettings {
        enabled: env::flag(source, env::LANGSMITH_TRACING),
        endpoint: env::optional(source, env::LANGSMITH_ENDPOINT),
        project: env::optional(source, env::LANGSMITH_PROJECT),
        api_key: env::optional(source, env::LANGSMITH_API_KEY),
    };

    Ok(AppConfig {
        database,
        model,
        agent,
        memory,
        server,
        prompt,
        tracing,
    })
}

fn positive<T>(field: &'static str, value: T) -> Result<T, ConfigError>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be greater than zero, got {value}"),
        });
    }
    Ok(value)
}

fn non_blank(field: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}
