//! Agent Core error types.

use thiserror::Error;

use crate::inference::InferenceError;

/// Errors surfaced by the orchestrator to the session boundary.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The model client failed. Not retried; the conversation keeps every
    /// turn appended before the failing call.
    #[error("model invocation failed: {source}")]
    ModelInvocation {
        #[from]
        source: InferenceError,
    },

    /// Rejected configuration change. Nothing was mutated.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Errors raised by a tool handler.
///
/// These never leave the orchestrator: the registry renders them into the
/// content of a tool-result turn.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The model asked for a tool that is not registered.
    #[error("unknown tool: {name}")]
    UnknownTool {
        name: String,
    },

    /// The arguments did not match the tool's schema.
    #[error("invalid arguments for '{tool}': {reason}")]
    InvalidArguments {
        tool: String,
        reason: String,
    },

    /// The tool ran and failed.
    #[error("{tool} failed: {reason}")]
    ExecutionFailed {
        tool: String,
        reason: String,
    },
}
