//! OpenAI-compatible inference client.
//!
//! Sends chat completion requests to a local LLM endpoint (Ollama by default)
//! and parses back a single assistant reply. The orchestrator talks to it
//! through the [`ChatModel`] trait so a scripted model can stand in for tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;

use super::config::ModelConfig;
use super::errors::InferenceError;
use super::response::parse_completion_response;
use super::types::{ChatCompletionRequest, ChatMessage, ChatResponse, ToolDefinition};

// ─── Constants ───────────────────────────────────────────────────────────────

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Total request timeout.
///
/// Local models can take a long time to process a large context before the
/// first token, so this is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A model bound to one configuration (model id + temperature).
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the full conversation plus the declared tools, get one reply.
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Result<ChatResponse, InferenceError>;

    /// The configuration this model is bound to.
    fn config(&self) -> &ModelConfig;
}

/// Creates bound [`ChatModel`] instances.
///
/// Changing the temperature binds a fresh model rather than mutating the
/// old one.
pub trait ModelProvider: Send + Sync {
    fn bind(&self, config: &ModelConfig) -> Result<Box<dyn ChatModel>, InferenceError>;
}

/// Provider that binds [`InferenceClient`]s.
#[derive(Debug, Default, Clone)]
pub struct OpenAiCompatProvider;

impl ModelProvider for OpenAiCompatProvider {
    fn bind(&self, config: &ModelConfig) -> Result<Box<dyn ChatModel>, InferenceError> {
        Ok(Box::new(InferenceClient::new(config.clone())?))
    }
}

// ─── InferenceClient ─────────────────────────────────────────────────────────

/// Client for the local LLM inference endpoint.
pub struct InferenceClient {
    http: HttpClient,
    model: ModelConfig,
}

impl InferenceClient {
    /// Create a client for one model. Does NOT check connectivity; that
    /// happens on the first request (or [`health_check`](Self::health_check)).
    pub fn new(model: ModelConfig) -> Result<Self, InferenceError> {
        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| InferenceError::ConnectionFailed {
                endpoint: model.base_url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { http, model })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.model.base_url.trim_end_matches('/'))
    }

    /// Build the request body for one call.
    fn build_request(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> ChatCompletionRequest {
        let tools = if tools.is_empty() { None } else { Some(tools) };
        ChatCompletionRequest {
            model: self.model.model_id().to_string(),
            messages,
            tool_choice: tools.as_ref().map(|_| "auto".to_string()),
            tools,
            temperature: self.model.temperature,
            max_tokens: self.model.max_tokens,
            stream: false,
        }
    }

    /// Send a non-streaming chat completion request.
    pub async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Result<ChatResponse, InferenceError> {
        let url = self.completions_url();
        let body = self.build_request(messages, tools);

        // Log the request metadata (not the full body, it can be huge)
        tracing::info!(
            url = %url,
            model = %body.model,
            temperature = body.temperature,
            message_count = body.messages.len(),
            tool_count = body.tools.as_ref().map(|t| t.len()).unwrap_or(0),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body_text, "model endpoint returned error");
            return Err(InferenceError::HttpError {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let body_text = response.text().await.map_err(|e| InferenceError::ResponseError {
            reason: format!("failed to read response body: {e}"),
        })?;

        let reply = parse_completion_response(&body_text, self.model.tool_call_format)?;

        tracing::info!(
            has_content = reply.content.is_some(),
            tool_calls = reply.tool_calls.len(),
            finish_reason = reply.finish_reason.as_deref().unwrap_or("none"),
            "received chat completion"
        );

        Ok(reply)
    }

    /// Check if the model endpoint is reachable.
    ///
    /// Sends a lightweight `GET /models`. Does not consume inference tokens.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/models", self.model.base_url.trim_end_matches('/'));

        match self.http.get(&url).timeout(CONNECT_TIMEOUT).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "health check failed");
                false
            }
        }
    }
}

#[async_trait]
impl ChatModel for InferenceClient {
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Result<ChatResponse, InferenceError> {
        self.chat_completion(messages, tools).await
    }

    fn config(&self) -> &ModelConfig {
        &self.model
    }
}

/// Classify a `reqwest` send error.
fn map_send_error(url: &str, e: reqwest::Error) -> InferenceError {
    if e.is_timeout() {
        InferenceError::Timeout {
            duration_secs: REQUEST_TIMEOUT.as_secs(),
        }
    } else {
        InferenceError::ConnectionFailed {
            endpoint: url.to_string(),
            reason: e.to_string(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
