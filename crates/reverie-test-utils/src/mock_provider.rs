// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language-model adapter for deterministic testing.
//!
//! `MockProvider` implements `LanguageModel` with pre-configured responses,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;

use reverie_core::types::{
    AdapterType, ChatRequest, ChatResponse, ChatStreamChunk, HealthStatus, TokenUsage,
};
use reverie_core::{Adapter, LanguageModel, ReverieError};

/// A mock language model that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// Pop the next response, or return the default.
    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ReverieError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl LanguageModel for MockProvider {
    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse, ReverieError> {
        let text = self.next_response().await;
        Ok(ChatResponse {
            id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
            content: text,
            model: "mock-model".to_string(),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            },
        })
    }

    async fn stream(
        &self,
        _request: ChatRequest,
    ) -> Result<
        Pin<Box<dyn futures::Stream<Item = Result<ChatStreamChunk, ReverieError>> + Send>>,
        ReverieError,
    > {
        let text = self.next_response().await;

        // Split the scripted response into word-sized deltas, then a
        // final chunk carrying the finish reason.
        let mut chunks: Vec<Result<ChatStreamChunk, ReverieError>> = text
            .split_inclusive(' ')
            .map(|piece| {
                Ok(ChatStreamChunk {
                    delta: piece.to_string(),
                    finish_reason: None,
                })
            })
            .collect();
        chunks.push(Ok(ChatStreamChunk {
            delta: String::new(),
            finish_reason: Some("stop".to_string()),
        }));

        Ok(Box::pin(stream::iter(chunks)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn req() -> ChatRequest {
        ChatRequest {
            system: None,
            messages: vec![],
            max_tokens: 100,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(req()).await.unwrap();
        assert_eq!(resp.content, "mock response");
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let provider =
            MockProvider::with_responses(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(provider.complete(req()).await.unwrap().content, "first");
        assert_eq!(provider.complete(req()).await.unwrap().content, "second");
        // Queue exhausted, falls back to default
        assert_eq!(
            provider.complete(req()).await.unwrap().content,
            "mock response"
        );
    }

    #[tokio::test]
    async fn stream_reassembles_to_full_response() {
        let provider = MockProvider::with_responses(vec!["streamed text here".to_string()]);
        let mut stream = provider.stream(req()).await.unwrap();

        let mut assembled = String::new();
        let mut finish = None;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.unwrap();
            assembled.push_str(&chunk.delta);
            if chunk.finish_reason.is_some() {
                finish = chunk.finish_reason;
            }
        }

        assert_eq!(assembled, "streamed text here");
        assert_eq!(finish.as_deref(), Some("stop"));
    }
}
