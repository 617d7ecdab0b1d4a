//! Safety and formatting rules applied around the agent loop.

pub mod guard;
pub mod memory_command;
pub mod prompt;

pub use guard::{ReadKind, StatementClass, classify};
pub use memory_command::is_memory_clear;
pub use prompt::{PromptContext, render_system_prompt};

pub const MEMORY_CLEARED_ANSWER: &str =
    "Memory cleared. Our previous conversation has been forgotten.";
