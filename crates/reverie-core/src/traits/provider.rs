// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language-model capability trait for hosted LLM integrations.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::ReverieError;
use crate::traits::adapter::Adapter;
use crate::types::{ChatRequest, ChatResponse, ChatStreamChunk};

/// Capability for generating assistant replies from a prompt plus context.
///
/// The memory core never depends on a model's internals; this trait is the
/// whole contract. Implementations handle both single-shot completion and
/// streaming responses.
#[async_trait]
pub trait LanguageModel: Adapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ReverieError>;

    /// Sends a completion request and returns a stream of response chunks.
    async fn stream(
        &self,
        request: ChatRequest,
    ) -> Result<
        Pin<Box<dyn Stream<Item = Result<ChatStreamChunk, ReverieError>> + Send>>,
        ReverieError,
    >;
}
