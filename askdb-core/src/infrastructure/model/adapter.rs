use crate::domain::ChatMessage;
use serde_json::{Value, json};

/// Converts chat messages into provider wire formats.
pub struct MessageAdapter;

impl MessageAdapter {
    /// `[{"role": "...", "content": "..."}]`, shared by OpenAI-compatible
    /// endpoints and Ollama.
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": msg.content.clone()
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_lowercase_strings() {
        let messages = vec![ChatMessage::system("rules"), ChatMessage::user("hi")];
        assert_eq!(
            MessageAdapter::to_openai_format(&messages),
            vec![
                json!({"role": "system", "content": "rules"}),
                json!({"role": "user", "content": "hi"}),
            ]
        );
    }
}
