//! Session commands: clearing history and chat statistics.

use crate::agent_core::Orchestrator;

/// Clear the chat history back to the system prompt.
pub fn clear_history(orchestrator: &mut Orchestrator) {
    orchestrator.reset();
}

/// Statistics shown for `/stats`.
pub fn chat_statistics(orchestrator: &Orchestrator) -> String {
    let model = orchestrator.model_config();
    let tools = orchestrator.tools().names();
    let tools = if tools.is_empty() {
        "none".to_string()
    } else {
        tools.join(", ")
    };
    format!(
        "📊 Chat Statistics\n  Messages in conversation: {}\n  Model: {} ({})\n  Temperature: {:.1}\n  Tools: {tools}",
        orchestrator.message_count(),
        model.display_name,
        model.model_id(),
        model.temperature,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::agent_core::ToolRegistry;
    use crate::commands::testing::{offline_session, offline_session_with};
    use crate::search::{SearchClient, SearchConfig, WebSearchTool};

    #[test]
    fn test_statistics_on_fresh_session() {
        let orch = offline_session();
        let stats = chat_statistics(&orch);
        assert!(stats.contains("Messages in conversation: 0"));
        assert!(stats.contains("Mistral NeMo (mistral-nemo:latest)"));
        assert!(stats.contains("Temperature: 0.7"));
        assert!(stats.contains("Tools: none"));
    }

    #[test]
    fn test_statistics_lists_registered_tools() {
        let client = SearchClient::new(SearchConfig::default()).unwrap();
        let tools = ToolRegistry::new().with_tool(Arc::new(WebSearchTool::new(client)));
        let orch = offline_session_with(tools);

        assert!(chat_statistics(&orch).ends_with("Tools: search"));
    }

    #[test]
    fn test_clear_on_fresh_session_is_noop() {
        let mut orch = offline_session();
        clear_history(&mut orch);
        assert_eq!(orch.message_count(), 0);
        assert_eq!(orch.conversation().len(), 1);
    }
}
