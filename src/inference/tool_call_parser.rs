//! Tool call parsing: normalizes model output to `ToolCall` structs.
//!
//! Supports two formats (per the model's `tool_call_format` in the config):
//!
//! 1. **native_json**: standard OpenAI JSON tool calls (Mistral, Qwen, Llama).
//!    The model returns `tool_calls` with a function name and JSON-encoded
//!    arguments.
//!
//! 2. **pythonic**: text-based calls for models without native tool support.
//!    The model emits lines like:
//!    ```text
//!    Tool: search
//!    Arguments: {"query": "weather in Paris"}
//!    ```

use uuid::Uuid;

use super::errors::InferenceError;
use super::types::ToolCall;

/// Generate a tool call ID for calls the model did not label.
pub fn new_call_id() -> String {
    format!("call_{}", Uuid::new_v4())
}

// ─── Native JSON Parsing ─────────────────────────────────────────────────────

/// Parse one native tool call from its name and JSON-encoded arguments.
///
/// Empty argument strings are treated as `{}`; some runtimes send that for
/// zero-argument tools.
pub fn parse_native_json_tool_call(
    id: Option<&str>,
    name: &str,
    arguments_json: &str,
) -> Result<ToolCall, InferenceError> {
    let call_id = id
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(new_call_id);

    if name.is_empty() {
        return Err(InferenceError::ToolCallParseError {
            raw_response: arguments_json.to_string(),
            reason: "empty tool name".into(),
        });
    }

    let arguments = if arguments_json.trim().is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(arguments_json).map_err(|e| InferenceError::ToolCallParseError {
            raw_response: arguments_json.to_string(),
            reason: format!("invalid JSON arguments: {e}"),
        })?
    };

    Ok(ToolCall {
        id: call_id,
        name: name.to_string(),
        arguments,
    })
}

// ─── Pythonic Format Parsing ─────────────────────────────────────────────────

/// Extract tool calls from text content that uses the Pythonic format.
///
/// Returns all tool calls found in the text, in order. A `Tool:` line without
/// a following `Arguments:` line gets empty arguments.
pub fn parse_pythonic_tool_calls(text: &str) -> Result<Vec<ToolCall>, InferenceError> {
    let mut calls = Vec::new();
    let lines: Vec<&str> = text.lines().collect();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        if let Some(name) = line.strip_prefix("Tool:").or_else(|| line.strip_prefix("tool:")) {
            let tool_name = name.trim().to_string();

            if tool_name.is_empty() {
                i += 1;
                continue;
            }

            let next_args = lines.get(i + 1).and_then(|next| {
                let next = next.trim();
                next.strip_prefix("Arguments:")
                    .or_else(|| next.strip_prefix("arguments:"))
            });

            let arguments = match next_args {
                Some(args_str) => {
                    i += 1;
                    let args_str = args_str.trim();
                    serde_json::from_str(args_str).map_err(|e| {
                        InferenceError::ToolCallParseError {
                            raw_response: args_str.to_string(),
                            reason: format!("invalid Pythonic arguments JSON: {e}"),
                        }
                    })?
                }
                None => serde_json::Value::Object(serde_json::Map::new()),
            };

            calls.push(ToolCall {
                id: new_call_id(),
                name: tool_name,
                arguments,
            });
        }

        i += 1;
    }

    Ok(calls)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
