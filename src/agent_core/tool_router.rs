//! ToolRouter: dispatches model tool calls to registered tool handlers.
//!
//! The registry is the bridge between the LLM's tool call decisions and the
//! concrete tools (currently just web search). It handles:
//! - Declaring the tool set to the model (`definitions`)
//! - Lookup by name, with unknown names reported as a tool error
//! - Converting every outcome, success or failure, into result text
//!
//! Dispatch never fails: a failed tool call still produces a result so the
//! conversation stays well-formed and the model can comment on the failure.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::inference::types::{ToolCall, ToolDefinition};

use super::errors::ToolError;

// ─── Tool trait ─────────────────────────────────────────────────────────────

/// A capability the model can invoke by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call this tool.
    fn name(&self) -> &str;

    /// OpenAI function definition declared to the model.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool with the model-supplied arguments.
    async fn invoke(&self, arguments: &serde_json::Value) -> Result<String, ToolError>;
}

/// Outcome of one dispatched tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    pub tool_call_id: String,
    pub success: bool,
    /// Tool output on success, a human-readable error message otherwise.
    pub content: String,
}

// ─── ToolRegistry ───────────────────────────────────────────────────────────

/// Name → handler map, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A tool with the same name replaces the old one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        if let Some(slot) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            tracing::warn!(tool = %tool.name(), "replacing registered tool");
            *slot = tool;
        } else {
            tracing::debug!(tool = %tool.name(), "registered tool");
            self.tools.push(tool);
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions for every registered tool, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    // ─── Dispatch ───────────────────────────────────────────────────────

    /// Dispatch a single tool call. Never fails; errors become result text.
    pub async fn dispatch(&self, tool_call: &ToolCall) -> ToolCallResult {
        let start = Instant::now();

        let outcome = match self.get(&tool_call.name) {
            Some(tool) => tool.invoke(&tool_call.arguments).await,
            None => Err(ToolError::UnknownTool {
                name: tool_call.name.clone(),
            }),
        };

        let elapsed = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(content) => {
                tracing::info!(
                    tool = %tool_call.name,
                    call_id = %tool_call.id,
                    elapsed_ms = elapsed,
                    result_len = content.len(),
                    "tool call succeeded"
                );
                ToolCallResult {
                    tool_call_id: tool_call.id.clone(),
                    success: true,
                    content,
                }
            }
            Err(e) => {
                tracing::warn!(
                    tool = %tool_call.name,
                    call_id = %tool_call.id,
                    elapsed_ms = elapsed,
                    error = %e,
                    "tool call failed"
                );
                ToolCallResult {
                    tool_call_id: tool_call.id.clone(),
                    success: false,
                    content: format_tool_error(&tool_call.name, &e),
                }
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

/// Human-readable error text placed in the tool-result turn.
pub fn format_tool_error(tool_name: &str, err: &ToolError) -> String {
    format!("Error running tool '{tool_name}': {err}")
}

// ─── Tests ──────────────────────────────────────────────────────────────────
