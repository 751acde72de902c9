//! Block-content wire format (Anthropic Messages API).
//!
//! Tool results travel as `tool_result` blocks inside a user turn. The API
//! requires strictly alternating roles, so a turn that follows one of the
//! same role is merged into it as extra content blocks.

use serde_json::{Value, json};
use shipwright_application::ports::llm_client::{LlmRequest, ProviderError};
use shipwright_application::ports::tool_schema::ToolSchemaPort;
use shipwright_domain::{ContentBlock, LlmConfig, LlmResponse, Message, Role, StopReason};
use tracing::warn;

use super::system_payload;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Sent as the first user turn when history does not start with one.
pub const PLACEHOLDER_GREETING: &str = "Hello.";

pub fn endpoint(base_url: &str) -> String {
    format!("{}/v1/messages", base_url)
}

fn assistant_content(message: &Message) -> Value {
    if message.tool_calls.is_empty() {
        return json!(message.content);
    }

    let mut blocks = Vec::new();
    if !message.content.is_empty() {
        blocks.push(json!({"type": "text", "text": message.content}));
    }
    for call in &message.tool_calls {
        blocks.push(json!({
            "type": "tool_use",
            "id": call.id,
            "name": call.tool_name,
            "input": call.arguments_json(),
        }));
    }
    json!(blocks)
}

fn tool_result_content(message: &Message) -> Value {
    let blocks: Vec<Value> = message
        .tool_results
        .iter()
        .map(|record| {
            let mut block = json!({
                "type": "tool_result",
                "tool_use_id": record.tool_call_id,
                "content": record.result.observation(),
            });
            if !record.result.success {
                block["is_error"] = json!(true);
            }
            block
        })
        .collect();
    json!(blocks)
}

/// String content as a block list.
fn into_blocks(content: Value) -> Vec<Value> {
    match content {
        Value::Array(blocks) => blocks,
        Value::String(text) if text.is_empty() => Vec::new(),
        Value::String(text) => vec![json!({"type": "text", "text": text})],
        other => vec![other],
    }
}

/// Append a turn, merging it into the previous one when the roles match.
fn push_turn(wire: &mut Vec<Value>, role: &str, content: Value) {
    if let Some(last) = wire.last_mut()
        && last["role"] == role
    {
        let mut blocks = into_blocks(last["content"].take());
        blocks.extend(into_blocks(content));
        last["content"] = json!(blocks);
        return;
    }
    wire.push(json!({"role": role, "content": content}));
}

pub fn normalize(config: &LlmConfig, request: &LlmRequest, schema: &dyn ToolSchemaPort) -> Value {
    let mut wire: Vec<Value> = Vec::new();

    for message in &request.messages {
        match message.role {
            Role::System => {}
            Role::User => push_turn(&mut wire, "user", json!(message.content)),
            Role::Assistant => push_turn(&mut wire, "assistant", assistant_content(message)),
            Role::Tool => push_turn(&mut wire, "user", tool_result_content(message)),
        }
    }

    if wire.first().is_none_or(|m| m["role"] != "user") {
        wire.insert(0, json!({"role": "user", "content": PLACEHOLDER_GREETING}));
    }

    let mut body = json!({
        "model": config.model,
        "max_tokens": config.effective_max_tokens(),
        "messages": wire,
    });

    if let Some(system) = system_payload(request) {
        body["system"] = json!(system);
    }
    if let Some(temperature) = config.temperature {
        body["temperature"] = json!(temperature);
    }
    if !request.tools.is_empty() {
        body["tools"] = json!(schema.all_tools_schema(&request.tools));
    }

    body
}

pub fn parse(body: &Value) -> Result<LlmResponse, ProviderError> {
    let blocks = body
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::InvalidResponse("missing content array".to_string()))?;

    let mut content = Vec::new();
    for block in blocks {
        match block.get("type").and_then(Value::as_str) {
            Some("text") => {
                let text = block.get("text").and_then(Value::as_str).unwrap_or_default();
                content.push(ContentBlock::Text(text.to_string()));
            }
            Some("tool_use") => {
                let id = block.get("id").and_then(Value::as_str).unwrap_or_default();
                let name = block.get("name").and_then(Value::as_str).unwrap_or_default();
                match block.get("input") {
                    Some(Value::Object(input)) => content.push(ContentBlock::ToolUse {
                        id: id.to_string(),
                        name: name.to_string(),
                        input: input.clone().into_iter().collect(),
                    }),
                    other => warn!(tool = name, input = ?other, "Dropping tool call with malformed input"),
                }
            }
            _ => {}
        }
    }

    let stop_reason = match body.get("stop_reason").and_then(Value::as_str) {
        Some("tool_use") => StopReason::ToolUse,
        Some("max_tokens") => StopReason::MaxTokens,
        Some("stop_sequence") => StopReason::StopSequence,
        _ => StopReason::EndTurn,
    };

    Ok(LlmResponse {
        content,
        stop_reason,
        model: body.get("model").and_then(Value::as_str).map(str::to_string),
    })
}
