//! Web search: the single tool the assistant can call.
//!
//! - `client`: DuckDuckGo HTML results client and result formatting
//! - `tool`: the `search` [`Tool`](crate::agent_core::Tool) implementation
//! - `config`: the `search` section of the config file

pub mod client;
pub mod config;
pub mod errors;
pub mod tool;

pub use client::{SearchClient, SearchResult};
pub use config::SearchConfig;
pub use errors::SearchError;
pub use tool::{WebSearchTool, SEARCH_TOOL_NAME};
