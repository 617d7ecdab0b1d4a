use super::defaults::{DEFAULT_EXTRA_INSTRUCTIONS, DEFAULT_PROMPT_TEMPLATE};
use super::error::ConfigError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Fully resolved application configuration.
///
/// Secrets and connection details come from the environment, every other
/// tunable from the optional TOML file with defaults filled in.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub model: ModelConfig,
    pub agent: AgentSettings,
    pub memory: MemorySettings,
    pub server: ServerSettings,
    pub prompt: PromptSettings,
    pub tracing: TracingSettings,
}

impl AppConfig {
    /// Load configuration from a file path (or the default path if None) and
    /// the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    pub fn prompt_template(&self) -> &str {
        &self.prompt.template
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Connection URL with the password masked, safe for logs.
    pub fn redacted_url(&self) -> String {
        format!(
            "mysql://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.redacted_url())
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Ollama,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Ollama => "ollama",
        }
    }

    pub fn requires_api_key(self) -> bool {
        matches!(self, ProviderKind::OpenAi)
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct ModelConfig {
    pub provider: ProviderKind,
    pub endpoint: String,
    pub api_path: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub retry_attempts: u32,
    pub retry_backoff: Duration,
    pub timeout: Duration,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("api_path", &self.api_path)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_backoff", &self.retry_backoff)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub dialect: String,
    pub max_rows: usize,
    pub sample_rows: usize,
    pub max_steps: usize,
    pub max_corrections: usize,
    pub request_timeout: Duration,
    pub schema_cache_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct MemorySettings {
    pub session_ttl: Duration,
    pub max_messages: usize,
    pub sweep_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Clone)]
pub struct PromptSettings {
    pub template: String,
    pub extra_instructions: String,
    pub custom_instruction: Option<String>,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            extra_instructions: DEFAULT_EXTRA_INSTRUCTIONS.to_string(),
            custom_instruction: None,
        }
    }
}

/// Run-tracing settings read from `LANGSMITH_*` variables.
#[derive(Clone, Default)]
pub struct TracingSettings {
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub project: Option<String>,
    pub api_key: Option<String>,
}

impl fmt::Debug for TracingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingSettings")
            .field("enabled", &self.enabled)
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}
