//! OpenAI-compatible chat completion client.
//!
//! Works with the OpenAI API and any compatible endpoint set through
//! `OPENAI_API_BASE`. One client is built at startup and shared by every
//! request; the model is chosen per call.

use std::time::{Duration, Instant};

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
    Client,
};
use async_trait::async_trait;
use namecheck_config::ServerConfig;
use namecheck_core::{ModelId, PredictionError};
use tracing::{debug, info};

/// Token usage and timing metrics from an LLM call.
#[derive(Debug, Clone, Default)]
pub struct LlmMetrics {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub elapsed_ms: u64,
}

/// Complete response from an LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub metrics: LlmMetrics,
}

/// A single-shot text completion against an external model.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Sends a system + user prompt to `model` and returns its text reply.
    async fn complete(
        &self,
        model: ModelId,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<LlmResponse, PredictionError>;
}

/// Converts any provider error into a transient upstream error.
fn upstream_err(e: impl ToString) -> PredictionError {
    PredictionError::Upstream(e.to_string())
}

/// Builds the message list for a simple system + user request.
fn build_messages(
    system_prompt: &str,
    user_input: &str,
) -> Result<Vec<ChatCompletionRequestMessage>, PredictionError> {
    Ok(vec![
        ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(upstream_err)?,
        ),
        ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_input)
                .build()
                .map_err(upstream_err)?,
        ),
    ])
}

/// Extracts content and metrics from a completion response.
fn extract_response(
    response: CreateChatCompletionResponse,
    elapsed_ms: u64,
) -> Result<LlmResponse, PredictionError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .ok_or_else(|| PredictionError::Upstream("No response content".into()))?;

    let (input_tokens, output_tokens) = response
        .usage
        .map(|u| (u.prompt_tokens, u.completion_tokens))
        .unwrap_or((0, 0));

    info!(
        "LLM: {}ms, tokens: {}/{} (in/out)",
        elapsed_ms, input_tokens, output_tokens
    );
    debug!("Raw reply: {}", content);

    Ok(LlmResponse {
        content,
        metrics: LlmMetrics { input_tokens, output_tokens, elapsed_ms },
    })
}

/// Client for OpenAI-compatible chat completion APIs.
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    timeout: Duration,
    max_tokens: u32,
    temperature: f32,
}

impl LlmClient {
    /// Creates a client from the service configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        let mut openai = OpenAIConfig::new().with_api_key(config.api_key.as_str());
        if let Some(base) = &config.api_base {
            openai = openai.with_api_base(base.as_str());
        }

        Self {
            client: Client::with_config(openai),
            timeout: config.upstream_timeout,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(
        &self,
        model: ModelId,
        system_prompt: &str,
        user_input: &str,
    ) -> Result<LlmResponse, PredictionError> {
        let start = Instant::now();
        let messages = build_messages(system_prompt, user_input)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model.as_str())
            .messages(messages)
            .max_completion_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(upstream_err)?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| PredictionError::Timeout(self.timeout))?
            .map_err(upstream_err)?;

        extract_response(response, start.elapsed().as_millis() as u64)
    }
}
