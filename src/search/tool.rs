//! The `search` tool exposed to the model.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agent_core::errors::ToolError;
use crate::agent_core::tool_router::Tool;
use crate::inference::types::ToolDefinition;

use super::client::SearchClient;

/// Name the model uses to request a web search.
pub const SEARCH_TOOL_NAME: &str = "search";

const SEARCH_TOOL_DESCRIPTION: &str = "Searches the web for relevant information. \
Use it for current events, facts you are unsure about, or anything that needs up-to-date data.";

/// Web search backed by [`SearchClient`].
#[derive(Debug, Clone)]
pub struct WebSearchTool {
    client: SearchClient,
}

impl WebSearchTool {
    pub fn new(client: SearchClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            SEARCH_TOOL_NAME,
            SEARCH_TOOL_DESCRIPTION,
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query."
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn invoke(&self, arguments: &Value) -> Result<String, ToolError> {
        let query = extract_query(arguments)?;
        Ok(self.client.search(&query).await?)
    }
}

/// Pull the query out of the model's arguments.
///
/// Accepts `{"query": "..."}` or a bare JSON string.
pub fn extract_query(arguments: &Value) -> Result<String, ToolError> {
    match arguments {
        Value::String(s) => Ok(s.clone()),
        Value::Object(map) => match map.get("query") {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(ToolError::InvalidArguments {
                tool: SEARCH_TOOL_NAME.to_string(),
                reason: format!("'query' must be a string, got {other}"),
            }),
            None => Err(ToolError::InvalidArguments {
                tool: SEARCH_TOOL_NAME.to_string(),
                reason: "missing required argument 'query'".to_string(),
            }),
        },
        other => Err(ToolError::InvalidArguments {
            tool: SEARCH_TOOL_NAME.to_string(),
            reason: format!("expected an object with 'query', got {other}"),
        }),
    }
}
