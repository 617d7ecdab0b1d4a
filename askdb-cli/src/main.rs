mod cli;

use askdb_core::application::agent::Agent;
use askdb_core::application::client::{ChatClient, RetryPolicy};
use askdb_core::application::memory::ConversationStore;
use askdb_core::application::service::{AskRequest, AskService};
use askdb_core::application::tooling::{RegistryLimits, SqlDatabase, ToolRegistry};
use askdb_core::config::{AppConfig, TracingSettings};
use askdb_core::infrastructure::database::MySqlDatabase;
use askdb_core::model::ConfiguredModelProvider;
use askdb_core::server;
use clap::Parser;
use cli::{Cli, RunMode};
use std::error::Error;
use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();
    info!("Starting askdb");
    debug!(mode = ?cli.mode, config = ?cli.config, "CLI arguments parsed");

    let config_path = cli
        .config
        .as_deref()
        .map(|path| PathBuf::from(shellexpand::tilde(path).into_owned()));
    let config = AppConfig::load(config_path.as_deref())?;
    match &config_path {
        Some(path) => info!(path = %path.display(), "Loaded configuration from file"),
        None => info!("Loaded configuration from default path"),
    }
    log_tracing_settings(&config.tracing);

    let service = Arc::new(build_service(&config).await?);

    match cli.mode {
        RunMode::Serve => {
            let addr: SocketAddr = match cli.addr {
                Some(addr) => addr,
                None => config.server.bind.parse()?,
            };
            let sweeper = service.store().spawn_sweeper(config.memory.sweep_interval);
            info!(%addr, "Starting REST server");
            let result = server::serve(service, addr).await;
            sweeper.abort();
            result?;
        }
        RunMode::Ask => {
            let question = read_question(&cli.question)?;
            let mut request = AskRequest::new(question);
            if let Some(session) = cli.session.clone() {
                request = request.in_session(session);
            }
            let answer = service.ask(request).await;
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
    }
    info!("askdb finished");
    Ok(())
}

async fn build_service(
    config: &AppConfig,
) -> Result<AskService<ConfiguredModelProvider>, Box<dyn Error>> {
    let database = MySqlDatabase::connect(&config.database, config.agent.dialect.clone()).await?;
    let database: Arc<dyn SqlDatabase> = Arc::new(database);

    let registry = Arc::new(ToolRegistry::new(
        database,
        RegistryLimits {
            max_rows: config.agent.max_rows,
            sample_rows: config.agent.sample_rows,
            table_cache_ttl: config.agent.schema_cache_ttl,
        },
    ));

    let provider = ConfiguredModelProvider::from_config(&config.model);
    info!(
        provider = provider.id(),
        model = config.model.model.as_str(),
        endpoint = config.model.endpoint.as_str(),
        "Model provider ready"
    );
    let client = ChatClient::new(
        provider,
        config.model.model.clone(),
        RetryPolicy::new(config.model.retry_attempts, config.model.retry_backoff),
    );

    let agent = Agent::new(Arc::new(client), registry, &config.prompt);
    let store = Arc::new(ConversationStore::new(
        config.memory.session_ttl,
        config.memory.max_messages,
    ));

    Ok(AskService::new(agent, store, config.agent.clone())
        .with_trace_project(config.tracing.project.clone()))
}

fn read_question(words: &[String]) -> Result<String, Box<dyn Error>> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim().to_string())
}

fn log_tracing_settings(settings: &TracingSettings) {
    if settings.enabled {
        info!(
            project = settings.project.as_deref(),
            endpoint = settings.endpoint.as_deref(),
            api_key_set = settings.api_key.is_some(),
            "Run tracing enabled; spans carry the project name"
        );
    } else if settings.api_key.is_some() {
        warn!("LANGSMITH_API_KEY is set but LANGSMITH_TRACING is off");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}
