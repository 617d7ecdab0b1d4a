mod conversation;
mod store;

pub use conversation::Conversation;
pub use store::ConversationStore;
