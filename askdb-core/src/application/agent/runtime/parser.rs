use super::{AgentDirective, AgentError, ToolRuntime, Value};
use serde_json::Map;

impl ToolRuntime {
    pub fn parse_agent_action(&self, content: &str) -> Result<AgentDirective, AgentError> {
        parse_directive(content)
    }
}

pub(crate) fn parse_directive(content: &str) -> Result<AgentDirective, AgentError> {
    match extract_json(content) {
        Some(value) => parse_action_value(value),
        None => Err(AgentError::InvalidResponse(
            "expected a JSON object in the response".into(),
        )),
    }
}

fn parse_action_value(value: Value) -> Result<AgentDirective, AgentError> {
    match value {
        Value::Object(map) => {
            let action = map
                .get("action")
                .and_then(Value::as_str)
                .map(|action| action.trim().to_ascii_lowercase());
            match action.as_deref() {
                Some("call_tool") | Some("tool") => call_tool(&map),
                None if map.contains_key("tool") => call_tool(&map),
                Some("final") | Some("final_answer") | Some("answer") => {
                    text_field(&map, &["response", "answer"], "final").map(|response| {
                        AgentDirective::Final { response }
                    })
                }
                Some("clarify") | Some("clarification") => {
                    text_field(&map, &["question", "response"], "clarify")
                        .map(|question| AgentDirective::Clarify { question })
                }
                Some("refuse") | Some("refusal") => {
                    text_field(&map, &["response", "reason"], "refuse")
                        .map(|response| AgentDirective::Refuse { response })
                }
                Some(other) => Err(AgentError::InvalidResponse(format!(
                    "unknown action value: {other}"
                ))),
                None => Err(AgentError::InvalidResponse(
                    "missing action field in the response".into(),
                )),
            }
        }
        Value::String(text) => parse_directive(&text),
        other => Err(AgentError::InvalidResponse(format!(
            "unsupported response type: {other}"
        ))),
    }
}

fn call_tool(map: &Map<String, Value>) -> Result<AgentDirective, AgentError> {
    let tool = map
        .get("tool")
        .and_then(Value::as_str)
        .filter(|tool| !tool.trim().is_empty())
        .ok_or_else(|| AgentError::InvalidResponse("call_tool action missing tool field".into()))?;
    let input = match map.get("input").cloned() {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(Value::String(text)) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        Some(other) => other,
    };
    Ok(AgentDirective::CallTool {
        tool: tool.to_string(),
        input,
    })
}

fn text_field(
    map: &Map<String, Value>,
    keys: &[&str],
    action: &str,
) -> Result<String, AgentError> {
    keys.iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AgentError::InvalidResponse(format!("{action} action missing {} field", keys[0]))
        })
}

/// Finds a JSON value in a reply that may be wrapped in a code fence or prose.
fn extract_json(content: &str) -> Option<Value> {
    let trimmed = content.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(start) = trimmed.find("```") {
        let fenced = &trimmed[start + 3..];
        let fenced = fenced
            .strip_prefix("json")
            .or_else(|| fenced.strip_prefix("JSON"))
            .unwrap_or(fenced);
        if let Some(end) = fenced.find("```") {
            if let Ok(value) = serde_json::from_str::<Value>(fenced[..end].trim()) {
                return Some(value);
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
                return Some(value);
            }
        }
    }

    None
}
