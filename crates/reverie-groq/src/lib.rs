// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq provider adapter for the Reverie assistant.
//!
//! Implements [`LanguageModel`] against the Groq OpenAI-compatible chat
//! API and [`Transcriber`] against its Whisper transcription endpoint.

pub mod client;
pub mod types;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use tracing::{debug, info};

use reverie_config::model::GroqConfig;
use reverie_core::types::{
    AdapterType, ChatRequest, ChatResponse, ChatStreamChunk, HealthStatus, TokenUsage,
};
use reverie_core::{Adapter, LanguageModel, ReverieError, Transcriber};

use crate::client::GroqClient;
use crate::types::{ApiMessage, ChatCompletionRequest};

/// Groq provider implementing [`LanguageModel`] and [`Transcriber`].
///
/// API key resolution order: config -> `GROQ_API_KEY` env var -> error.
pub struct GroqProvider {
    client: GroqClient,
    model: String,
    audio_model: String,
}

impl GroqProvider {
    /// Creates a new Groq provider from the given configuration.
    pub fn new(config: &GroqConfig) -> Result<Self, ReverieError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = GroqClient::new(&api_key)?;

        info!(model = config.model, "Groq provider initialized");

        Ok(Self {
            client,
            model: config.model.clone(),
            audio_model: config.audio_model.clone(),
        })
    }

    /// Creates a provider with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: GroqClient, model: String, audio_model: String) -> Self {
        Self {
            client,
            model,
            audio_model,
        }
    }

    /// Converts a core [`ChatRequest`] into the Groq wire format.
    ///
    /// The system prompt travels as a leading `system` message per the
    /// OpenAI-compatible schema.
    fn to_api_request(&self, request: &ChatRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ApiMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|entry| ApiMessage {
            role: entry.role.to_string(),
            content: entry.content.clone(),
        }));

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        }
    }
}

#[async_trait]
impl Adapter for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ReverieError> {
        // A full check would make a lightweight API call, but we avoid
        // consuming tokens on health checks.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ReverieError> {
        debug!("Groq provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl LanguageModel for GroqProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ReverieError> {
        let api_request = self.to_api_request(&request);
        let response = self.client.complete_chat(&api_request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ReverieError::Provider {
                message: "API response contained no choices".into(),
                source: None,
            })?;

        let usage = response.usage.unwrap_or_default();
        Ok(ChatResponse {
            id: response.id,
            content,
            model: response.model,
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }

    async fn stream(
        &self,
        request: ChatRequest,
    ) -> Result<
        Pin<Box<dyn Stream<Item = Result<ChatStreamChunk, ReverieError>> + Send>>,
        ReverieError,
    > {
        let api_request = self.to_api_request(&request);
        self.client.stream_chat(&api_request).await
    }
}

#[async_trait]
impl Transcriber for GroqProvider {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, ReverieError> {
        self.client
            .transcribe_audio(&self.audio_model, audio, file_name)
            .await
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, ReverieError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("GROQ_API_KEY").map_err(|_| {
        ReverieError::Config(
            "Groq API key not found. Set groq.api_key in config or GROQ_API_KEY environment variable.".into(),
        )
    })
}
