//! Shared types for the agent core.
//!
//! Conversation turns and the events emitted to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::inference::types::{ChatMessage, Role, ToolCall};

// ─── Turns ──────────────────────────────────────────────────────────────────

/// One entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    /// Fixed instruction text; always the first turn.
    System { content: String },
    /// Text typed by the human.
    User { content: String },
    /// Model output: text, tool requests, or both.
    Assistant {
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_requests: Vec<ToolCall>,
    },
    /// Outcome of one tool request, matched by `tool_call_id`.
    ToolResult {
        content: String,
        tool_call_id: String,
    },
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Turn::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Turn::Assistant {
            content: Some(content.into()),
            tool_requests: Vec::new(),
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Turn::ToolResult {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }

    /// The wire role for this turn.
    pub fn role(&self) -> Role {
        match self {
            Turn::System { .. } => Role::System,
            Turn::User { .. } => Role::User,
            Turn::Assistant { .. } => Role::Assistant,
            Turn::ToolResult { .. } => Role::Tool,
        }
    }

    /// Text content, if any.
    pub fn content(&self) -> Option<&str> {
        match self {
            Turn::System { content } | Turn::User { content } => Some(content),
            Turn::Assistant { content, .. } => content.as_deref(),
            Turn::ToolResult { content, .. } => Some(content),
        }
    }

    /// Tool requests carried by an assistant turn (empty for other roles).
    pub fn tool_requests(&self) -> &[ToolCall] {
        match self {
            Turn::Assistant { tool_requests, .. } => tool_requests,
            _ => &[],
        }
    }

    /// Convert to the OpenAI wire message.
    pub fn to_chat_message(&self) -> ChatMessage {
        match self {
            Turn::System { content } | Turn::User { content } => ChatMessage {
                role: self.role(),
                content: Some(content.clone()),
                tool_call_id: None,
                tool_calls: None,
            },
            Turn::Assistant {
                content,
                tool_requests,
            } => ChatMessage {
                role: Role::Assistant,
                content: content.clone(),
                tool_call_id: None,
                tool_calls: if tool_requests.is_empty() {
                    None
                } else {
                    Some(tool_requests.iter().map(ToolCall::to_response).collect())
                },
            },
            Turn::ToolResult {
                content,
                tool_call_id,
            } => ChatMessage {
                role: Role::Tool,
                content: Some(content.clone()),
                tool_call_id: Some(tool_call_id.clone()),
                tool_calls: None,
            },
        }
    }
}

// ─── Events ─────────────────────────────────────────────────────────────────

/// Notification sent to the presentation layer as the conversation changes.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationEvent {
    /// A turn was appended at `index` (0 is the system turn).
    TurnAppended { index: usize, turn: Turn },
    /// The conversation was truncated back to the system turn.
    Reset,
}

// ─── Tests ──────────────────────────────────────────────────────────────────
