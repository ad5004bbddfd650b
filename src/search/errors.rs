//! Search error types.

use thiserror::Error;

use crate::agent_core::errors::ToolError;

use super::tool::SEARCH_TOOL_NAME;

/// Errors from the web search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query was empty after trimming.
    #[error("search query is empty")]
    EmptyQuery,

    /// The request could not be sent or timed out.
    #[error("search request failed: {reason}")]
    Request {
        reason: String,
    },

    /// The backend answered with a non-2xx status.
    #[error("search backend returned HTTP {status}")]
    HttpError {
        status: u16,
    },

    /// The results page could not be parsed.
    #[error("could not parse search response: {reason}")]
    Parse {
        reason: String,
    },

    /// The backend served a bot-check page instead of results.
    #[error("search backend refused the query (bot check)")]
    Blocked,
}

impl From<SearchError> for ToolError {
    fn from(err: SearchError) -> Self {
        ToolError::ExecutionFailed {
            tool: SEARCH_TOOL_NAME.to_string(),
            reason: err.to_string(),
        }
    }
}
