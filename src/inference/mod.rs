//! Inference Client: OpenAI-compatible API client for local LLM inference.
//!
//! This module handles all communication with the local model endpoint:
//! - Non-streaming chat completions with a declared tool set
//! - Tool call parsing (native JSON + Pythonic formats)
//! - Model configuration types and temperature validation
//!
//! The client speaks the OpenAI Chat Completions API, so the model is
//! interchangeable via config. Switching from Mistral NeMo to Llama is a
//! config change, not a code change.

pub mod client;
pub mod config;
pub mod errors;
pub mod response;
pub mod tool_call_parser;
pub mod types;

// Re-exports for convenience
pub use client::{ChatModel, InferenceClient, ModelProvider, OpenAiCompatProvider};
pub use config::{ModelConfig, ModelsConfig, ToolCallFormat};
pub use errors::InferenceError;
pub use types::{ChatMessage, ChatResponse, Role, ToolCall, ToolDefinition};
