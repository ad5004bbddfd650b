//! Parser for non-streaming `/chat/completions` response bodies.

use serde::Deserialize;

use super::config::ToolCallFormat;
use super::errors::InferenceError;
use super::tool_call_parser::{parse_native_json_tool_call, parse_pythonic_tool_calls};
use super::types::{ChatResponse, ToolCall};

#[derive(Deserialize)]
struct CompletionBody {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
    /// Chain-of-thought from reasoning models. Accepted so deserialization
    /// does not fail, never surfaced.
    #[allow(dead_code)]
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<CompletionToolCall>>,
}

#[derive(Deserialize)]
struct CompletionToolCall {
    id: Option<String>,
    function: CompletionFunction,
}

#[derive(Deserialize)]
struct CompletionFunction {
    name: String,
    /// Usually a JSON-encoded string; some runtimes send an object.
    #[serde(default)]
    arguments: serde_json::Value,
}

/// Parse a response body into one `ChatResponse`.
///
/// Native `tool_calls` win. For the pythonic format, text-based calls are
/// extracted from `content` when no native calls are present.
pub fn parse_completion_response(
    body: &str,
    format: ToolCallFormat,
) -> Result<ChatResponse, InferenceError> {
    let resp: CompletionBody =
        serde_json::from_str(body).map_err(|e| InferenceError::ResponseError {
            reason: format!("failed to parse completion response: {e}"),
        })?;

    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or(InferenceError::ResponseError {
            reason: "empty choices array".into(),
        })?;

    let content = choice.message.content.filter(|c| !c.trim().is_empty());

    let mut tool_calls = Vec::new();
    for tc in choice.message.tool_calls.unwrap_or_default() {
        tool_calls.push(parse_wire_tool_call(tc)?);
    }

    if tool_calls.is_empty() && format == ToolCallFormat::Pythonic {
        if let Some(ref text) = content {
            tool_calls = parse_pythonic_tool_calls(text)?;
        }
    }

    let finish_reason = if tool_calls.is_empty() {
        choice.finish_reason
    } else {
        Some("tool_calls".into())
    };

    Ok(ChatResponse {
        content,
        tool_calls,
        finish_reason,
    })
}

fn parse_wire_tool_call(tc: CompletionToolCall) -> Result<ToolCall, InferenceError> {
    match tc.function.arguments {
        serde_json::Value::String(raw) => {
            parse_native_json_tool_call(tc.id.as_deref(), &tc.function.name, &raw)
        }
        serde_json::Value::Null => parse_native_json_tool_call(tc.id.as_deref(), &tc.function.name, ""),
        other => {
            let mut call = parse_native_json_tool_call(tc.id.as_deref(), &tc.function.name, "")?;
            call.arguments = other;
            Ok(call)
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
