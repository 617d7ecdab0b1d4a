pub mod answer;
pub mod message;
pub mod tool;
pub mod types;

pub use answer::AnswerStatus;
pub use message::{ConversationRole, Message};
pub use tool::{SideEffectClass, ToolInvocation, ToolName, ToolOutcome, ToolSpec};
pub use types::{ChatMessage, MessageRole};
