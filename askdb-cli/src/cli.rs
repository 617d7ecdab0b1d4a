use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(
    name = "askdb",
    version,
    about = "Ask questions about a MySQL database in plain language"
)]
pub struct Cli {
    /// Path to the TOML config file (defaults to config/askdb.toml when present)
    #[arg(long)]
    pub config: Option<String>,
    /// Listen address; overrides `server.bind`
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    #[arg(long, short, value_enum, default_value_t = RunMode::Serve)]
    pub mode: RunMode,
    /// Session to continue in `ask` mode
    #[arg(long)]
    pub session: Option<String>,
    /// Question for `ask` mode; read from stdin when omitted
    #[arg(trailing_var_arg = true)]
    pub question: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RunMode {
    /// REST API server
    Serve,
    /// Answer one question and exit
    Ask,
}
