//! Conversation orchestrator: one request/response/tool cycle per user input.
//!
//! ```text
//! submit(text)
//!   ├─ append User
//!   ├─ model call #1 ──► append Assistant (R1)
//!   ├─ for each tool request in R1 (in order, one at a time):
//!   │     dispatch ──► append ToolResult
//!   └─ if any ToolResult was appended:
//!         model call #2 ──► append Assistant (R2)   (R2's tool requests are not run)
//! ```
//!
//! Single-hop by construction: there is no loop back to tool execution after
//! the second model call. Every append is pushed to the event channel as it
//! happens, so the presentation layer renders incrementally.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::inference::config::validate_temperature;
use crate::inference::{ChatModel, ChatResponse, InferenceError, ModelConfig, ModelProvider};

use super::conversation::Conversation;
use super::errors::AgentError;
use super::tool_router::ToolRegistry;
use super::types::ConversationEvent;

/// What a successful `submit` appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Number of turns appended (0 for blank input).
    pub turns_appended: usize,
    /// Tool calls executed from the first reply.
    pub tools_invoked: usize,
    /// Of those, how many ended in an error result.
    pub tool_failures: usize,
    /// Tool requests in the final reply that were left unexecuted.
    pub ignored_tool_requests: usize,
}

/// Per-session orchestrator. Owns the conversation and the bound model.
pub struct Orchestrator {
    conversation: Conversation,
    provider: Arc<dyn ModelProvider>,
    model: Box<dyn ChatModel>,
    tools: ToolRegistry,
    events: Option<mpsc::UnboundedSender<ConversationEvent>>,
}

impl Orchestrator {
    /// Create a session with only the system turn, binding `model_config`.
    pub fn new(
        system_prompt: impl Into<String>,
        provider: Arc<dyn ModelProvider>,
        model_config: &ModelConfig,
        tools: ToolRegistry,
    ) -> Result<Self, AgentError> {
        validate_temperature(model_config.temperature).map_err(invalid_config)?;
        let model = provider.bind(model_config)?;

        tracing::info!(
            model = %model_config.model_id(),
            temperature = model_config.temperature,
            tools = ?tools.names(),
            "session created"
        );

        Ok(Self {
            conversation: Conversation::new(system_prompt),
            provider,
            model,
            tools,
            events: None,
        })
    }

    /// Open the event channel. Replaces any previous subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ConversationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    // ─── Read-only queries ──────────────────────────────────────────────

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Turns excluding the system turn (for the statistics display).
    pub fn message_count(&self) -> usize {
        self.conversation.message_count()
    }

    pub fn model_config(&self) -> &ModelConfig {
        self.model.config()
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    // ─── Operations ─────────────────────────────────────────────────────

    /// Process one user message through the single-hop tool cycle.
    ///
    /// Blank input (after trimming) is a no-op. A model failure is returned
    /// as [`AgentError::ModelInvocation`]; turns appended before the failing
    /// call remain and nothing is appended for the failed step.
    pub async fn submit(&mut self, user_text: &str) -> Result<SubmitOutcome, AgentError> {
        if user_text.trim().is_empty() {
            tracing::debug!("ignoring blank input");
            return Ok(SubmitOutcome::default());
        }

        let mut outcome = SubmitOutcome::default();

        let idx = self.conversation.append_user(user_text);
        self.emit_appended(idx);
        outcome.turns_appended += 1;

        // 1. First model call
        let first = self.call_model().await?;
        let tool_calls = first.tool_calls.clone();
        let idx = self.conversation.append_assistant(first);
        self.emit_appended(idx);
        outcome.turns_appended += 1;

        if tool_calls.is_empty() {
            return Ok(outcome);
        }

        // 2. Tool round, strictly sequential in emission order
        for call in &tool_calls {
            tracing::info!(tool = %call.name, call_id = %call.id, "executing tool call");
            let result = self.tools.dispatch(call).await;
            let idx = self
                .conversation
                .append_tool_result(&result.tool_call_id, &result.content);
            self.emit_appended(idx);
            outcome.turns_appended += 1;
            outcome.tools_invoked += 1;
            if !result.success {
                outcome.tool_failures += 1;
            }
        }

        // 3. Final model call; its tool requests are never executed
        let last = self.call_model().await?;
        if last.has_tool_calls() {
            outcome.ignored_tool_requests = last.tool_calls.len();
            tracing::info!(
                count = last.tool_calls.len(),
                "final reply requested more tools; not executed (single hop)"
            );
        }
        let idx = self.conversation.append_assistant(last);
        self.emit_appended(idx);
        outcome.turns_appended += 1;

        Ok(outcome)
    }

    /// Truncate the conversation back to the system turn. Idempotent.
    pub fn reset(&mut self) {
        let dropped = self.conversation.message_count();
        self.conversation.reset();
        tracing::info!(dropped, "conversation reset");
        self.emit(ConversationEvent::Reset);
    }

    /// Change the sampling temperature.
    ///
    /// Returns `Ok(true)` if a new model was bound, `Ok(false)` if the value
    /// was unchanged. An out-of-range value fails with
    /// [`AgentError::InvalidConfig`] and mutates nothing.
    pub fn reconfigure(&mut self, temperature: f32) -> Result<bool, AgentError> {
        validate_temperature(temperature).map_err(invalid_config)?;

        let current = self.model.config();
        if current.temperature == temperature {
            return Ok(false);
        }

        let new_config = current.with_temperature(temperature);
        let model = self.provider.bind(&new_config)?;

        tracing::info!(
            from = current.temperature,
            to = temperature,
            model = %new_config.model_id(),
            "model rebound"
        );
        self.model = model;
        Ok(true)
    }

    // ─── Helpers ────────────────────────────────────────────────────────

    async fn call_model(&self) -> Result<ChatResponse, AgentError> {
        let messages = self.conversation.build_chat_messages();
        let tools = self.tools.definitions();
        self.model.chat(messages, tools).await.map_err(|e| {
            tracing::error!(error = %e, "model call failed");
            AgentError::from(e)
        })
    }

    fn emit_appended(&self, index: usize) {
        let turn = self.conversation.turns()[index].clone();
        self.emit(ConversationEvent::TurnAppended { index, turn });
    }

    fn emit(&self, event: ConversationEvent) {
        if let Some(ref tx) = self.events {
            if tx.send(event).is_err() {
                tracing::debug!("event receiver dropped");
            }
        }
    }
}

fn invalid_config(err: InferenceError) -> AgentError {
    let reason = match err {
        InferenceError::ConfigError { reason } => reason,
        other => other.to_string(),
    };
    AgentError::InvalidConfig { reason }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::agent_core::errors::ToolError;
    use crate::agent_core::tool_router::Tool;
    use crate::agent_core::types::Turn;
    use crate::inference::config::ToolCallFormat;
    use crate::inference::{ChatMessage, ToolCall, ToolDefinition};

    // ─── Scripted model ─────────────────────────────────────────────────

    #[derive(Debug, Clone)]
    struct RecordedCall {
        temperature: f32,
        message_count: usize,
        tool_names: Vec<String>,
    }

    #[derive(Default)]
    struct Script {
        replies: VecDeque<Result<ChatResponse, InferenceError>>,
        calls: Vec<RecordedCall>,
        binds: Vec<f32>,
    }

    #[derive(Clone, Default)]
    struct ScriptedProvider {
        script: Arc<Mutex<Script>>,
    }

    impl ScriptedProvider {
        fn with_replies(replies: Vec<Result<ChatResponse, InferenceError>>) -> Self {
            let provider = Self::default();
            provider.script.lock().unwrap().replies = replies.into();
            provider
        }

        fn push(&self, reply: Result<ChatResponse, InferenceError>) {
            self.script.lock().unwrap().replies.push_back(reply);
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.script.lock().unwrap().calls.clone()
        }

        fn binds(&self) -> Vec<f32> {
            self.script.lock().unwrap().binds.clone()
        }
    }

    struct ScriptedModel {
        config: ModelConfig,
        script: Arc<Mutex<Script>>,
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn chat(
            &self,
            messages: Vec<ChatMessage>,
            tools: Vec<ToolDefinition>,
        ) -> Result<ChatResponse, InferenceError> {
            let mut script = self.script.lock().unwrap();
            script.calls.push(RecordedCall {
                temperature: self.config.temperature,
                message_count: messages.len(),
                tool_names: tools.iter().map(|t| t.function.name.clone()).collect(),
            });
            script.replies.pop_front().unwrap_or_else(|| {
                Err(InferenceError::ResponseError {
                    reason: "script exhausted".into(),
                })
            })
        }

        fn config(&self) -> &ModelConfig {
            &self.config
        }
    }

    impl ModelProvider for ScriptedProvider {
        fn bind(&self, config: &ModelConfig) -> Result<Box<dyn ChatModel>, InferenceError> {
            self.script.lock().unwrap().binds.push(config.temperature);
            Ok(Box::new(ScriptedModel {
                config: config.clone(),
                script: Arc::clone(&self.script),
            }))
        }
    }

    // ─── Fake search tool ───────────────────────────────────────────────

    struct FakeSearch {
        outcome: Result<String, String>,
        queries: Arc<Mutex<Vec<String>>>,
    }

    impl FakeSearch {
        fn returning(text: &str) -> (Arc<Self>, Arc<Mutex<Vec<String>>>) {
            Self::build(Ok(text.to_string()))
        }

        fn failing(reason: &str) -> (Arc<Self>, Arc<Mutex<Vec<String>>>) {
            Self::build(Err(reason.to_string()))
        }

        fn build(outcome: Result<String, String>) -> (Arc<Self>, Arc<Mutex<Vec<String>>>) {
            let queries = Arc::new(Mutex::new(Vec::new()));
            (
                Arc::new(Self {
                    outcome,
                    queries: Arc::clone(&queries),
                }),
                queries,
            )
        }
    }

    #[async_trait]
    impl Tool for FakeSearch {
        fn name(&self) -> &str {
            "search"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::function("search", "Searches the web.", serde_json::json!({}))
        }

        async fn invoke(&self, arguments: &serde_json::Value) -> Result<String, ToolError> {
            let query = arguments["query"].as_str().unwrap_or_default().to_string();
            self.queries.lock().unwrap().push(query);
            self.outcome.clone().map_err(|reason| ToolError::ExecutionFailed {
                tool: "search".into(),
                reason,
            })
        }
    }

    // ─── Helpers ────────────────────────────────────────────────────────

    fn model_config(temperature: f32) -> ModelConfig {
        ModelConfig {
            display_name: "Test".into(),
            model_name: Some("test:latest".into()),
            base_url: "http://localhost:11111/v1".into(),
            temperature,
            max_tokens: 256,
            tool_call_format: ToolCallFormat::NativeJson,
        }
    }

    fn search_call(id: &str, query: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: "search".into(),
            arguments: serde_json::json!({"query": query}),
        }
    }

    fn session(provider: &ScriptedProvider, search: Arc<FakeSearch>) -> Orchestrator {
        let tools = ToolRegistry::new().with_tool(search);
        Orchestrator::new("sys", Arc::new(provider.clone()), &model_config(0.7), tools).unwrap()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ConversationEvent>) -> Vec<ConversationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    // ─── Scenarios ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_weather_scenario_with_search() {
        let call = search_call("call_1", "weather in Paris");
        let provider = ScriptedProvider::with_replies(vec![
            Ok(ChatResponse::tool_calls(vec![call.clone()])),
            Ok(ChatResponse::text("It's 18°C and cloudy in Paris.")),
        ]);
        let (search, queries) = FakeSearch::returning("18°C, cloudy");
        let mut orch = session(&provider, search);

        let outcome = orch.submit("What's the weather in Paris?").await.unwrap();

        assert_eq!(
            orch.conversation().turns(),
            &[
                Turn::System { content: "sys".into() },
                Turn::user("What's the weather in Paris?"),
                Turn::Assistant {
                    content: None,
                    tool_requests: vec![call],
                },
                Turn::tool_result("call_1", "18°C, cloudy"),
                Turn::assistant("It's 18°C and cloudy in Paris."),
            ]
        );
        assert_eq!(*queries.lock().unwrap(), vec!["weather in Paris".to_string()]);
        assert_eq!(
            outcome,
            SubmitOutcome {
                turns_appended: 4,
                tools_invoked: 1,
                tool_failures: 0,
                ignored_tool_requests: 0,
            }
        );

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].message_count, 2);
        assert_eq!(calls[1].message_count, 4);
        assert_eq!(calls[1].tool_names, vec!["search".to_string()]);
    }

    #[tokio::test]
    async fn test_plain_greeting_without_tools() {
        let provider =
            ScriptedProvider::with_replies(vec![Ok(ChatResponse::text("Hello! How can I help?"))]);
        let (search, queries) = FakeSearch::returning("unused");
        let mut orch = session(&provider, search);

        let outcome = orch.submit("Hi there").await.unwrap();

        assert_eq!(outcome.turns_appended, 2);
        assert_eq!(
            &orch.conversation().turns()[1..],
            &[Turn::user("Hi there"), Turn::assistant("Hello! How can I help?")]
        );
        assert_eq!(provider.calls().len(), 1);
        assert!(queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_input_is_noop() {
        let provider = ScriptedProvider::default();
        let (search, _) = FakeSearch::returning("unused");
        let mut orch = session(&provider, search);
        let mut rx = orch.subscribe();

        assert_eq!(orch.submit("").await.unwrap().turns_appended, 0);
        assert_eq!(orch.submit("   ").await.unwrap().turns_appended, 0);
        assert_eq!(orch.submit("\n\t").await.unwrap().turns_appended, 0);

        assert_eq!(orch.conversation().len(), 1);
        assert!(provider.calls().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_ordering_across_submits() {
        let provider = ScriptedProvider::with_replies(vec![
            Ok(ChatResponse::text("first answer")),
            Ok(ChatResponse::tool_calls(vec![search_call("c1", "q")])),
            Ok(ChatResponse::text("second answer")),
        ]);
        let (search, _) = FakeSearch::returning("found");
        let mut orch = session(&provider, search);

        orch.submit("one").await.unwrap();
        orch.submit("two").await.unwrap();

        let roles: Vec<&str> = orch
            .conversation()
            .turns()
            .iter()
            .map(|t| match t {
                Turn::System { .. } => "system",
                Turn::User { .. } => "user",
                Turn::Assistant { .. } => "assistant",
                Turn::ToolResult { .. } => "tool",
            })
            .collect();
        assert_eq!(
            roles,
            vec!["system", "user", "assistant", "user", "assistant", "tool", "assistant"]
        );
        assert_eq!(orch.message_count(), 6);
    }

    #[tokio::test]
    async fn test_multiple_tool_requests_run_in_order() {
        let provider = ScriptedProvider::with_replies(vec![
            Ok(ChatResponse::tool_calls(vec![
                search_call("c1", "first"),
                search_call("c2", "second"),
            ])),
            Ok(ChatResponse::text("done")),
        ]);
        let (search, queries) = FakeSearch::returning("r");
        let mut orch = session(&provider, search);

        let outcome = orch.submit("compare").await.unwrap();

        assert_eq!(outcome.tools_invoked, 2);
        assert_eq!(
            *queries.lock().unwrap(),
            vec!["first".to_string(), "second".to_string()]
        );
        let turns = orch.conversation().turns();
        assert_eq!(turns[3], Turn::tool_result("c1", "r"));
        assert_eq!(turns[4], Turn::tool_result("c2", "r"));
        assert_eq!(turns[5], Turn::assistant("done"));
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_single_hop_ignores_second_tool_request() {
        let provider = ScriptedProvider::with_replies(vec![
            Ok(ChatResponse::tool_calls(vec![search_call("c1", "first")])),
            Ok(ChatResponse::tool_calls(vec![search_call("c2", "again")])),
        ]);
        let (search, queries) = FakeSearch::returning("r");
        let mut orch = session(&provider, search);

        let outcome = orch.submit("dig deeper").await.unwrap();

        assert_eq!(provider.calls().len(), 2);
        assert_eq!(*queries.lock().unwrap(), vec!["first".to_string()]);
        assert_eq!(outcome.ignored_tool_requests, 1);
        assert_eq!(orch.conversation().len(), 5);
        assert_eq!(orch.conversation().last().tool_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_tool_failure_is_contained() {
        let provider = ScriptedProvider::with_replies(vec![
            Ok(ChatResponse::tool_calls(vec![search_call("c1", "q")])),
            Ok(ChatResponse::text("Sorry, the search failed.")),
        ]);
        let (search, _) = FakeSearch::failing("network unreachable");
        let mut orch = session(&provider, search);

        let outcome = orch.submit("look it up").await.unwrap();

        assert_eq!(outcome.turns_appended, 4);
        assert_eq!(outcome.tool_failures, 1);
        match &orch.conversation().turns()[3] {
            Turn::ToolResult {
                content,
                tool_call_id,
            } => {
                assert_eq!(tool_call_id, "c1");
                assert!(content.contains("Error"));
                assert!(content.contains("network unreachable"));
            }
            other => panic!("expected tool result, got {other:?}"),
        }
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_still_gets_final_call() {
        let provider = ScriptedProvider::with_replies(vec![
            Ok(ChatResponse::tool_calls(vec![ToolCall {
                id: "c1".into(),
                name: "calculator".into(),
                arguments: serde_json::json!({"expr": "1+1"}),
            }])),
            Ok(ChatResponse::text("I can't calculate, but it's 2.")),
        ]);
        let (search, queries) = FakeSearch::returning("unused");
        let mut orch = session(&provider, search);

        orch.submit("1+1?").await.unwrap();

        let result = &orch.conversation().turns()[3];
        assert!(result.content().unwrap().contains("unknown tool: calculator"));
        assert!(queries.lock().unwrap().is_empty());
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_first_model_failure_keeps_user_turn_only() {
        let provider = ScriptedProvider::with_replies(vec![Err(InferenceError::ConnectionFailed {
            endpoint: "http://localhost:11434/v1".into(),
            reason: "connection refused".into(),
        })]);
        let (search, _) = FakeSearch::returning("unused");
        let mut orch = session(&provider, search);

        let err = orch.submit("hello?").await.unwrap_err();

        assert!(matches!(err, AgentError::ModelInvocation { .. }));
        assert_eq!(
            &orch.conversation().turns()[1..],
            &[Turn::user("hello?")]
        );
    }

    #[tokio::test]
    async fn test_second_model_failure_keeps_tool_results() {
        let provider = ScriptedProvider::with_replies(vec![
            Ok(ChatResponse::tool_calls(vec![search_call("c1", "q")])),
            Err(InferenceError::Timeout { duration_secs: 180 }),
        ]);
        let (search, _) = FakeSearch::returning("r");
        let mut orch = session(&provider, search);

        assert!(orch.submit("q?").await.is_err());
        assert_eq!(orch.conversation().len(), 4);
        assert_eq!(orch.conversation().last(), &Turn::tool_result("c1", "r"));

        // The session stays usable after a model failure.
        provider.push(Ok(ChatResponse::text("recovered")));
        orch.submit("still there?").await.unwrap();
        assert_eq!(orch.conversation().last(), &Turn::assistant("recovered"));
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let provider = ScriptedProvider::with_replies(vec![Ok(ChatResponse::text("hi"))]);
        let (search, _) = FakeSearch::returning("unused");
        let mut orch = session(&provider, search);

        orch.reset();
        assert_eq!(orch.conversation().len(), 1);

        orch.submit("hello").await.unwrap();
        orch.reset();
        orch.reset();

        assert_eq!(
            orch.conversation().turns(),
            &[Turn::System { content: "sys".into() }]
        );
        assert_eq!(orch.message_count(), 0);
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_reconfigure_rebinds_and_keeps_conversation() {
        let provider = ScriptedProvider::with_replies(vec![
            Ok(ChatResponse::text("a")),
            Ok(ChatResponse::text("b")),
        ]);
        let (search, _) = FakeSearch::returning("unused");
        let mut orch = session(&provider, search);

        orch.submit("first").await.unwrap();
        let before = orch.conversation().turns().to_vec();

        assert!(orch.reconfigure(0.2).unwrap());
        assert!(orch.reconfigure(0.9).unwrap());
        assert_eq!(orch.conversation().turns(), before.as_slice());
        assert!((orch.model_config().temperature - 0.9).abs() < f32::EPSILON);

        orch.submit("second").await.unwrap();
        let calls = provider.calls();
        assert!((calls[0].temperature - 0.7).abs() < f32::EPSILON);
        assert!((calls[1].temperature - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_reconfigure_same_value_does_not_rebind() {
        let provider = ScriptedProvider::default();
        let (search, _) = FakeSearch::returning("unused");
        let mut orch = session(&provider, search);

        assert!(!orch.reconfigure(0.7).unwrap());
        assert_eq!(provider.binds(), vec![0.7]);
    }

    #[test]
    fn test_reconfigure_rejects_out_of_range() {
        let provider = ScriptedProvider::default();
        let (search, _) = FakeSearch::returning("unused");
        let mut orch = session(&provider, search);

        for bad in [1.5, -0.1, f32::NAN] {
            let err = orch.reconfigure(bad).unwrap_err();
            assert!(matches!(err, AgentError::InvalidConfig { .. }));
        }
        assert!((orch.model_config().temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(provider.binds().len(), 1);
    }

    #[test]
    fn test_new_rejects_invalid_temperature() {
        let provider = ScriptedProvider::default();
        let result = Orchestrator::new(
            "sys",
            Arc::new(provider.clone()),
            &model_config(2.0),
            ToolRegistry::new(),
        );
        assert!(matches!(result, Err(AgentError::InvalidConfig { .. })));
        assert!(provider.binds().is_empty());
    }

    #[tokio::test]
    async fn test_events_follow_append_order() {
        let provider = ScriptedProvider::with_replies(vec![
            Ok(ChatResponse::tool_calls(vec![search_call("c1", "q")])),
            Ok(ChatResponse::text("answer")),
        ]);
        let (search, _) = FakeSearch::returning("r");
        let mut orch = session(&provider, search);
        let mut rx = orch.subscribe();

        orch.submit("question").await.unwrap();
        orch.reset();

        let events = drain(&mut rx);
        assert_eq!(events.len(), 5);
        for (i, event) in events[..4].iter().enumerate() {
            match event {
                ConversationEvent::TurnAppended { index, .. } => assert_eq!(*index, i + 1),
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(
            events[2],
            ConversationEvent::TurnAppended {
                index: 3,
                turn: Turn::tool_result("c1", "r"),
            }
        );
        assert_eq!(events[4], ConversationEvent::Reset);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let provider_a = ScriptedProvider::with_replies(vec![Ok(ChatResponse::text("a"))]);
        let provider_b = ScriptedProvider::default();
        let (search_a, _) = FakeSearch::returning("unused");
        let (search_b, _) = FakeSearch::returning("unused");
        let mut a = session(&provider_a, search_a);
        let mut b = session(&provider_b, search_b);

        a.submit("only in a").await.unwrap();
        b.reconfigure(0.1).unwrap();

        assert_eq!(a.message_count(), 2);
        assert_eq!(b.message_count(), 0);
        assert!((a.model_config().temperature - 0.7).abs() < f32::EPSILON);
    }
}
