//! Local wire format (Ollama `/api/chat`).
//!
//! Tool calls arrive without ids, so the adapter numbers them `call_1`,
//! `call_2`, ... within each response.

use serde_json::{Map, Value, json};
use shipwright_application::ports::llm_client::{LlmRequest, ProviderError};
use shipwright_application::ports::tool_schema::ToolSchemaPort;
use shipwright_domain::{ContentBlock, LlmConfig, LlmResponse, Message, Role, StopReason};
use tracing::warn;

use super::openai::function_tools;
use super::system_payload;

pub fn endpoint(base_url: &str) -> String {
    format!("{}/api/chat", base_url)
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
                "function": {
                    "name": call.tool_name,
                    "arguments": call.arguments_json(),
                }
            })
        })
        .collect();
    json!({"role": "assistant", "content": message.content, "tool_calls": calls})
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
                        "tool_name": record.tool_name,
                        "content": record.result.observation(),
                    }));
                }
            }
        }
    }

    let mut options = json!({"num_predict": config.effective_max_tokens()});
    if let Some(temperature) = config.temperature {
        options["temperature"] = json!(temperature);
    }

    let mut body = json!({
        "model": config.model,
        "messages": wire,
        "stream": false,
        "options": options,
    });

    if !request.tools.is_empty() {
        body["tools"] = json!(function_tools(&request.tools, schema));
    }

    body
}

/// Some models return arguments as an object, others as a JSON string.
fn decode_arguments(raw: Option<&Value>) -> Option<Map<String, Value>> {
    match raw {
        None | Some(Value::Null) => Some(Map::new()),
        Some(Value::Object(map)) => Some(map.clone()),
        Some(Value::String(s)) if s.trim().is_empty() => Some(Map::new()),
        Some(Value::String(s)) => match serde_json::from_str(s) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        Some(_) => None,
    }
}

pub fn parse(body: &Value) -> Result<LlmResponse, ProviderError> {
    let message = body
        .get("message")
        .ok_or_else(|| ProviderError::InvalidResponse("missing message".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = message.get("content").and_then(Value::as_str)
        && !text.is_empty()
    {
        content.push(ContentBlock::Text(text.to_string()));
    }

    let mut next_id = 1;
    for call in message
        .get("tool_calls")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let function = call.get("function");
        let name = function
            .and_then(|f| f.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        match decode_arguments(function.and_then(|f| f.get("arguments"))) {
            Some(arguments) => {
                content.push(ContentBlock::ToolUse {
                    id: format!("call_{}", next_id),
                    name: name.to_string(),
                    input: arguments.into_iter().collect(),
                });
                next_id += 1;
            }
            None => warn!(tool = name, "Dropping tool call with unparseable arguments"),
        }
    }

    let has_calls = content.iter().any(|b| b.as_tool_use().is_some());
    let stop_reason = if body.get("done_reason").and_then(Value::as_str) == Some("length") {
        StopReason::MaxTokens
    } else if has_calls {
        StopReason::ToolUse
    } else {
        StopReason::EndTurn
    };

    Ok(LlmResponse {
        content,
        stop_reason,
        model: body.get("model").and_then(Value::as_str).map(str::to_string),
    })
}
