//! Model infrastructure module
//!
//! # Structure
//! - `types` - Request, Response, Error types
//! - `traits` - ModelProvider, ModelClient traits
//! - `adapter` - Message format adapters
//! - `factory` - Provider factory for creating clients
//! - `clients` - OpenAI-compatible and Ollama clients
//! - `provider` - ConfiguredModelProvider

pub mod adapter;
pub mod clients;
pub mod factory;
pub mod provider;
pub mod traits;
pub mod types;

pub use provider::ConfiguredModelProvider;
pub use traits::{ModelClient, ModelProvider};
pub use types::{ModelError, ModelRequest, ModelResponse};
