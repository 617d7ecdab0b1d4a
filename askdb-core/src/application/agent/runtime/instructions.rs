use super::{ToolRuntime, json};
use crate::application::policy::{PromptContext, render_system_prompt};
use crate::config::PromptSettings;
use crate::domain::{ChatMessage, ConversationRole, Message, ToolOutcome};

impl ToolRuntime {
    /// Policy text from the configured template followed by the response
    /// protocol.
    pub fn compose_system_prompt(&self, prompt: &PromptSettings) -> String {
        let catalogue = self.registry().catalogue();
        let policy = render_system_prompt(
            &prompt.template,
            &PromptContext {
                dialect: self.registry().dialect(),
                top_k: self.registry().max_rows(),
                tool_catalogue: &catalogue,
                extra_instructions: &prompt.extra_instructions,
                custom_instruction: prompt.custom_instruction.as_deref(),
            },
        );

        let protocol = [
            "All responses must be a single valid JSON object without commentary or code fences.",
            "To call a tool respond with: {\"action\":\"call_tool\",\"tool\":\"tool_name\",\"input\":{...}}. Call exactly one tool per response.",
            "Tool results arrive as {\"tool_result\":{...}} messages.",
            "If the question is ambiguous, or answering it would require changing data, respond with: {\"action\":\"clarify\",\"question\":\"...\"}.",
            "If the request must not be fulfilled, for example it asks for passwords or credentials, respond with: {\"action\":\"refuse\",\"response\":\"...\"}.",
            "When you are ready to give the final answer to the user, respond with: {\"action\":\"final\",\"response\":\"...\"}.",
            "Answer in the language the user wrote in.",
        ];

        format!("{policy}\n\n{}", protocol.join(" "))
    }

    /// Replays stored messages in the shape the model itself produced them.
    pub fn render_history(&self, messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|message| match message.role {
                ConversationRole::User => ChatMessage::user(message.content.clone()),
                ConversationRole::Assistant => match &message.tool_call {
                    Some(invocation) => ChatMessage::assistant(invocation.to_directive().to_string()),
                    None => ChatMessage::assistant(
                        json!({ "action": "final", "response": message.content }).to_string(),
                    ),
                },
                ConversationRole::Tool => match &message.tool_result {
                    Some(outcome) => ChatMessage::user(tool_result_payload(outcome)),
                    None => ChatMessage::user(message.content.clone()),
                },
            })
            .collect()
    }

    pub fn correction_message(&self, reason: &str) -> String {
        json!({
            "error": reason,
            "instruction": "Your previous response could not be used. Reply again with exactly one JSON object using one of the actions call_tool, clarify, refuse or final.",
        })
        .to_string()
    }
}

pub(crate) fn tool_result_payload(outcome: &ToolOutcome) -> String {
    json!({
        "tool_result": {
            "tool": outcome.tool.as_str(),
            "success": outcome.success,
            "output": outcome.payload,
            "error": outcome.error,
            "notice": outcome.notice,
        }
    })
    .to_string()
}
