//! AI client — one chat-completion request per call.
//!
//! Steps:
//! 1. Resolve the API key (fail fast, no network, when there is none)
//! 2. Build `{model, [system, user], temperature, max_tokens}`
//! 3. POST once; no retries, no caching
//! 4. Read `choices[0].message.content`
//!
//! Every failure comes back as a value. Nothing here panics or
//! propagates to the host process.

use std::sync::Arc;

use super::prompts::{MAX_TOKENS, MODEL, TEMPERATURE};
use super::provider::{resolve_api_key, KeySource, SystemKeySource};
use super::transport::{ChatTransport, ReqwestTransport};
use super::types::{AiResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::Configuration;
use crate::text::truncate_chars;

const CHECK_SYSTEM_PROMPT: &str = "You are a connectivity check.";
const CHECK_USER_TEXT: &str = "Reply with just: ok";

/// Failure taxonomy of a completion call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AiError {
    #[error("API key not configured")]
    MissingCredential,

    /// Non-2xx reply. The raw body is kept for diagnosis.
    #[error("API error: {body}")]
    Http { status: u16, body: String },

    #[error("No response from AI")]
    EmptyResponse,

    #[error("Request failed: {0}")]
    Transport(String),
}

impl AiError {
    /// Stable tag carried across the messaging bridge.
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::MissingCredential => "missingCredential",
            AiError::Http { .. } => "http",
            AiError::EmptyResponse => "emptyResponse",
            AiError::Transport(_) => "transport",
        }
    }
}

/// Stateless chat-completion client. Cheap to clone.
#[derive(Clone)]
pub struct AiClient {
    transport: Arc<dyn ChatTransport>,
    keys: Arc<dyn KeySource>,
}

impl Default for AiClient {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestTransport::new()), Arc::new(SystemKeySource))
    }
}

impl AiClient {
    pub fn new(transport: Arc<dyn ChatTransport>, keys: Arc<dyn KeySource>) -> Self {
        Self { transport, keys }
    }

    /// Run one completion and normalize the outcome.
    pub async fn complete(
        &self,
        user_text: &str,
        system_prompt: &str,
        config: &Configuration,
    ) -> AiResponse {
        self.try_complete(user_text, system_prompt, config).await.into()
    }

    pub async fn try_complete(
        &self,
        user_text: &str,
        system_prompt: &str,
        config: &Configuration,
    ) -> Result<String, AiError> {
        let provider = config.api_provider;
        let api_key = match resolve_api_key(config, self.keys.as_ref()) {
            Some(k) => {
                log::info!("[AI] API key found ({} chars)", k.len());
                k
            }
            None => {
                log::warn!("[AI] No API key for provider {} — not calling", provider);
                return Err(AiError::MissingCredential);
            }
        };

        let request = build_request(user_text, system_prompt);
        let body = serde_json::to_value(&request)
            .map_err(|e| AiError::Transport(format!("Failed to encode request: {}", e)))?;

        log::info!(
            "[AI] Provider: {}, model: {}, text length: {}",
            provider,
            MODEL,
            user_text.len()
        );
        let start = std::time::Instant::now();

        let reply = self
            .transport
            .post_json(provider.endpoint(), &api_key, &body)
            .await
            .map_err(|e| {
                log::error!("[AI] HTTP request failed: {}", e);
                AiError::Transport(e)
            })?;

        log::info!(
            "[AI] Reply {} in {}ms ({} bytes)",
            reply.status,
            start.elapsed().as_millis(),
            reply.body.len()
        );

        if !reply.is_success() {
            log::error!(
                "[AI] API returned {}: {}",
                reply.status,
                truncate_chars(&reply.body, 200)
            );
            return Err(AiError::Http {
                status: reply.status,
                body: reply.body,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&reply.body).map_err(|e| {
            log::error!("[AI] Could not parse response body: {}", e);
            AiError::EmptyResponse
        })?;
        parsed.first_text().ok_or_else(|| {
            log::warn!("[AI] Response had no completion text");
            AiError::EmptyResponse
        })
    }

    /// Send a minimal request and report whether the provider answered.
    pub async fn test_connection(&self, config: &Configuration) -> Result<(), AiError> {
        let outcome = self
            .try_complete(CHECK_USER_TEXT, CHECK_SYSTEM_PROMPT, config)
            .await;
        log::info!(
            "[SETTINGS] Test {} — {}",
            config.api_provider,
            if outcome.is_ok() { "ok" } else { "failed" }
        );
        outcome.map(|_| ())
    }
}

/// Body for one call: exactly two messages, system first.
pub fn build_request(user_text: &str, system_prompt: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: MODEL.to_string(),
        messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(user_text)],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}
