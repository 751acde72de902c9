//! Flat function-calling wire format (OpenAI Chat Completions and the
//! compatible DeepSeek, Groq and OpenRouter endpoints).

use serde_json::{Map, Value, json};
use shipwright_application::ports::llm_client::{LlmRequest, ProviderError};
use shipwright_application::ports::tool_schema::ToolSchemaPort;
use shipwright_domain::{ContentBlock, LlmConfig, LlmResponse, Message, Role, StopReason, ToolDefinition};
use tracing::warn;

use super::system_payload;

pub fn endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url)
}

/// `{type: function, function: {name, description, parameters}}`
pub(super) fn function_tools(tools: &[ToolDefinition], schema: &dyn ToolSchemaPort) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": schema.parameters_schema(tool),
                }
            })
        })
        .collect()
}

fn assistant_message(message: &Message) -> Value {
    if message.tool_calls.is_empty() {
        return json!({"role": "assistant", "content": message.content});
    }

    let calls: Vec<Value> = message
        .tool_calls
        .iter()
        .map(|call| {
            json!({
                "id": call.id,
                "type": "function",
                "function": {
                    "name": call.tool_name,
                    "arguments": call.arguments_json().to_string(),
                }
            })
        })
        .collect();

    let content = if message.content.is_empty() {
        Value::Null
    } else {
        json!(message.content)
    };
    json!({"role": "assistant", "content": content, "tool_calls": calls})
}

pub fn normalize(config: &LlmConfig, request: &LlmRequest, schema: &dyn ToolSchemaPort) -> Value {
    let mut wire = Vec::new();

    if let Some(system) = system_payload(request) {
        wire.push(json!({"role": "system", "content": system}));
    }

    for message in &request.messages {
        match message.role {
            Role::System => {}
            Role::User => wire.push(json!({"role": "user", "content": message.content})),
            Role::Assistant => wire.push(assistant_message(message)),
            Role::Tool => {
                for record in &message.tool_results {
                    wire.push(json!({
                        "role": "tool",
                        "tool_call_id": record.tool_call_id,
                        "name": record.tool_name,
                        "content": record.result.observation(),
                    }));
                }
            }
        }
    }

    let mut body = json!({
        "model": config.model,
        "messages": wire,
        "max_tokens": config.effective_max_tokens(),
    });

    if let Some(temperature) = config.temperature {
        body["temperature"] = json!(temperature);
    }
    if !request.tools.is_empty() {
        body["tools"] = json!(function_tools(&request.tools, schema));
        body["tool_choice"] = json!("auto");
    }

    body
}

/// Decode a JSON-encoded arguments string. An empty string means no arguments.
fn decode_arguments(raw: &str) -> Option<Map<String, Value>> {
    if raw.trim().is_empty() {
        return Some(Map::new());
    }
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

pub fn parse(body: &Value) -> Result<LlmResponse, ProviderError> {
    let choice = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| ProviderError::InvalidResponse("missing choices".to_string()))?;
    let message = choice
        .get("message")
        .ok_or_else(|| ProviderError::InvalidResponse("missing message".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = message.get("content").and_then(Value::as_str)
        && !text.is_empty()
    {
        content.push(ContentBlock::Text(text.to_string()));
    }

    for call in message
        .get("tool_calls")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let id = call.get("id").and_then(Value::as_str).unwrap_or_default();
        let function = call.get("function");
        let name = function
            .and_then(|f| f.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let raw = function
            .and_then(|f| f.get("arguments"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        match decode_arguments(raw) {
            Some(arguments) => content.push(ContentBlock::ToolUse {
                id: id.to_string(),
                name: name.to_string(),
                input: arguments.into_iter().collect(),
            }),
            None => warn!(tool = name, arguments = raw, "Dropping tool call with unparseable arguments"),
        }
    }

    let stop_reason = match choice.get("finish_reason").and_then(Value::as_str) {
        Some("tool_calls") => StopReason::ToolUse,
        Some("length") => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    };

    Ok(LlmResponse {
        content,
        stop_reason,
        model: body.get("model").and_then(Value::as_str).map(str::to_string),
    })
}
