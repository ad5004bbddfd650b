//! Conversation: the in-memory, append-only turn log for one session.
//!
//! Invariants:
//! - Index 0 is always the system turn, and it never changes.
//! - Turns are only appended; the one exception is [`Conversation::reset`],
//!   which truncates back to the system turn.

use crate::inference::types::{ChatMessage, ChatResponse};

use super::types::Turn;

/// Default system prompt for the web-search chat assistant.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful chat assistant with the ability to search the web and provide accurate information. You should:
1. Engage in natural conversation
2. Search the web when needed to provide accurate information
3. Maintain context of the conversation
4. Be concise but informative in your responses
5. Acknowledge when you need to search for information";

/// Ordered turn log owned by a single session.
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Start a conversation containing only the system turn.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::System {
                content: system_prompt.into(),
            }],
        }
    }

    pub fn system_prompt(&self) -> &str {
        self.turns[0].content().unwrap_or_default()
    }

    /// All turns, system turn first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Total number of turns, including the system turn.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always `false`: the system turn is never removed.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of turns excluding the system turn.
    pub fn message_count(&self) -> usize {
        self.turns.len() - 1
    }

    /// The most recently appended turn.
    pub fn last(&self) -> &Turn {
        // Never empty, see invariants.
        &self.turns[self.turns.len() - 1]
    }

    // ─── Appends ────────────────────────────────────────────────────────

    /// Append a user turn. Returns its index.
    pub fn append_user(&mut self, content: &str) -> usize {
        self.push(Turn::user(content))
    }

    /// Append the model's reply as an assistant turn. Returns its index.
    pub fn append_assistant(&mut self, reply: ChatResponse) -> usize {
        self.push(Turn::Assistant {
            content: reply.content,
            tool_requests: reply.tool_calls,
        })
    }

    /// Append a tool-result turn. Returns its index.
    pub fn append_tool_result(&mut self, tool_call_id: &str, content: &str) -> usize {
        self.push(Turn::tool_result(tool_call_id, content))
    }

    fn push(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    /// Truncate back to the system turn. Idempotent.
    pub fn reset(&mut self) {
        self.turns.truncate(1);
    }

    // ─── Model Input ────────────────────────────────────────────────────

    /// Build the `Vec<ChatMessage>` to send to the inference client.
    pub fn build_chat_messages(&self) -> Vec<ChatMessage> {
        self.turns.iter().map(Turn::to_chat_message).collect()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
