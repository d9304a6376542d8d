// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-message pipeline shared by the shell and any future surface.
//!
//! One turn runs classify -> reconstruct context -> stream the model's
//! reply -> persist the exchange. Sentiment and persistence failures are
//! soft: the reply still reaches the user, with a notice where it matters.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, warn};

use reverie_core::types::{ChatRequest, ContextEntry, Role, Sentiment, UserId};
use reverie_core::{LanguageModel, ReverieError, SentimentClassifier};
use reverie_memory::{MemoryManager, SaveOutcome};

/// What happened during one shell turn.
#[derive(Debug)]
pub struct TurnReport {
    /// Sentiment of the user's message, if the classifier answered.
    pub sentiment: Option<Sentiment>,
    /// The model's complete reply, as streamed.
    pub reply: String,
    /// Which memory tiers acknowledged the save.
    pub outcome: SaveOutcome,
}

/// Runs the classify/context/generate/persist pipeline for one message.
pub struct TurnEngine {
    provider: Arc<dyn LanguageModel>,
    classifier: Arc<dyn SentimentClassifier>,
    memory: Arc<MemoryManager>,
    system_prompt: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl TurnEngine {
    pub fn new(
        provider: Arc<dyn LanguageModel>,
        classifier: Arc<dyn SentimentClassifier>,
        memory: Arc<MemoryManager>,
        system_prompt: Option<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            classifier,
            memory,
            system_prompt,
            max_tokens,
            temperature,
        }
    }

    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    /// Process one user message, invoking `on_delta` for every streamed
    /// text fragment as it arrives.
    ///
    /// Provider errors abort the turn before anything is persisted, so a
    /// failed generation never leaves a half-turn in the log.
    pub async fn run_turn(
        &self,
        user: &UserId,
        input: &str,
        on_delta: &mut (dyn FnMut(&str) + Send),
    ) -> Result<TurnReport, ReverieError> {
        let sentiment = match self.classifier.classify(input).await {
            Ok(sentiment) => Some(sentiment),
            Err(err) => {
                warn!(error = %err, "sentiment classification skipped");
                None
            }
        };

        let mut messages = self.memory.get_context(user).await;
        messages.push(ContextEntry {
            role: Role::User,
            content: input.to_string(),
        });
        debug!(user = %user, entries = messages.len(), "context assembled");

        let request = ChatRequest {
            system: self.system_prompt.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let mut stream = self.provider.stream(request).await?;
        let mut reply = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if !chunk.delta.is_empty() {
                on_delta(&chunk.delta);
                reply.push_str(&chunk.delta);
            }
        }

        let outcome = self.memory.save_turn(user, input, &reply).await;
        if outcome.fallback_only() {
            warn!(user = %user, "turn held in process memory only");
        }

        Ok(TurnReport {
            sentiment,
            reply,
            outcome,
        })
    }
}
