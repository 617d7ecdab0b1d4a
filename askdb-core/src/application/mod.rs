//! # Application Module
//!
//! Question answering on top of the model and database boundaries.
//!
//! ## Submodules
//!
//! - [`agent`] - The tool-calling loop that turns one question into an answer
//! - [`client`] - Model calls with retry on transient failures
//! - [`memory`] - Per-session conversation history
//! - [`policy`] - SQL guard, memory commands and system prompt rendering
//! - [`service`] - Request facade used by the REST server and the CLI
//! - [`tooling`] - The database tools exposed to the model

pub mod agent;
pub mod client;
pub mod memory;
pub mod policy;
pub mod service;
pub mod tooling;

#[cfg(test)]
pub(crate) mod test_support;
