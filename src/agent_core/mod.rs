//! Agent Core: orchestration layer for LocalChat.
//!
//! Submodules:
//! - `conversation`: the append-only turn log and its wire conversion
//! - `orchestrator`: the single-hop submit / reset / reconfigure cycle
//! - `tool_router`: tool trait and name-based dispatch registry
//! - `types`: turns and conversation events
//! - `errors`: agent-level error types

pub mod conversation;
pub mod errors;
pub mod orchestrator;
pub mod tool_router;
pub mod types;

// Re-exports for convenience
pub use conversation::{Conversation, DEFAULT_SYSTEM_PROMPT};
pub use errors::{AgentError, ToolError};
pub use orchestrator::{Orchestrator, SubmitOutcome};
pub use tool_router::{Tool, ToolCallResult, ToolRegistry};
pub use types::{ConversationEvent, Turn};
