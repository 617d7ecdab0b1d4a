//! # askdb-core
//!
//! Answers natural-language questions from a relational database. A
//! language model drives a small set of read-only database tools
//! (`list_tables`, `get_schema`, `validate_query`, `run_query`) until it can
//! answer, ask for clarification or refuse.
//!
//! ## Features
//!
//! - `mysql` (default) - [`infrastructure::database::MySqlDatabase`] over an sqlx pool
//! - `rest` (default) - axum server exposing `POST /ask`

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{agent, client, memory, policy, service, tooling};
pub use config::{AppConfig, ConfigError};
pub use domain::{AnswerStatus, types};
pub use infrastructure::model;
#[cfg(feature = "rest")]
pub use infrastructure::server;
