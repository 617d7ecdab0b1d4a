pub mod app;
pub mod defaults;
pub mod env;
pub mod error;
pub mod loader;

/// Default config file path - can be overridden via CLI argument
pub const CONFIG_PATH: &str = "config/askdb.toml";

pub use app::{
    AgentSettings, AppConfig, DatabaseConfig, MemorySettings, ModelConfig, PromptSettings,
    ProviderKind, ServerSettings, TracingSettings,
};
pub use error::ConfigError;
pub use loader::{ensure_env_loaded, load_from_str};
