//! # Agent Module
//!
//! Drives one question through the reasoning/acting loop: the model is asked
//! for a JSON directive, tool calls are executed through the
//! [`ToolRegistry`](crate::application::tooling::ToolRegistry) and fed back,
//! and the loop ends on a final answer, a clarification or a refusal.
//!
//! ## Agent Loop
//!
//! 1. Send system prompt, history and the pending turn to the model
//! 2. Parse the JSON directive (malformed replies get a bounded number of
//!    corrections)
//! 3. If a tool call is requested, execute it and continue
//! 4. Otherwise return the answer with its status
//!
//! Tool calls are capped by [`AgentOptions::max_steps`]; reaching the cap
//! ends the run as incomplete.

mod directive;
mod errors;
mod models;
mod runner;
mod runtime;


pub use directive::AgentDirective;
pub use errors::AgentError;
pub use models::{AgentOptions, AgentOutcome, AgentStep};
pub use runner::Agent;
pub use runtime::ToolRuntime;
