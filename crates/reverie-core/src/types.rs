// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Reverie assistant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque, stable identity of an authenticated user.
///
/// Used verbatim as the partition key in every storage tier; no format
/// constraints beyond being a stable string per session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Borrow the underlying key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of a single context entry handed to the language model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One user/assistant exchange.
///
/// Immutable once written: the memory tiers support append,
/// delete-most-recent, and delete-all only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// The user's utterance (already transcribed if it arrived as voice).
    pub user_message: String,
    /// The model's full generated reply.
    pub ai_response: String,
    /// UTC instant assigned once at save time, shared by all tier writes.
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Expand this turn into its two role-tagged context entries,
    /// in (user, assistant) order.
    pub fn context_entries(&self) -> [ContextEntry; 2] {
        [
            ContextEntry {
                role: Role::User,
                content: self.user_message.clone(),
            },
            ContextEntry {
                role: Role::Assistant,
                content: self.ai_response.clone(),
            },
        ]
    }
}

/// A single role-tagged message derived from a [`ConversationTurn`]
/// for model consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub role: Role,
    pub content: String,
}

/// Opaque handle to one stored document in the durable tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TurnId(pub String);

/// A turn as read back from the durable tier, with its document handle.
#[derive(Debug, Clone)]
pub struct StoredTurn {
    pub id: TurnId,
    pub turn: ConversationTurn,
}

/// Display-oriented view of a recent turn for the sidebar history list.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentTurn {
    pub user_message: String,
    pub ai_response: String,
    /// Short human-readable timestamp, e.g. "Mar 01, 14:30".
    pub timestamp_label: String,
}

/// Sentiment label produced by a classifier capability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// Sentiment label plus confidence score in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f32,
}

/// Output of an object-detector capability: annotated image plus labels.
#[derive(Debug, Clone)]
pub struct DetectionOutput {
    /// Encoded annotated image (same format as the input).
    pub annotated_image: Vec<u8>,
    /// Human-readable labels, one per detection.
    pub labels: Vec<String>,
}

/// Verified identity returned by an auth capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a capability trait.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Cache,
    Durable,
    Sentiment,
    Transcriber,
    Detector,
    Auth,
}

// --- Provider types ---

/// A request to a language-model capability.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Optional system prompt prepended to the conversation.
    pub system: Option<String>,
    /// Chronological context window plus the latest user message.
    pub messages: Vec<ContextEntry>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// A full (non-streaming) response from a language-model capability.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub id: String,
    /// The complete generated reply text.
    pub content: String,
    /// Model identifier that produced the response.
    pub model: String,
    pub usage: TokenUsage,
}

/// A single chunk from a streaming language-model response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatStreamChunk {
    /// Incremental text delta; may be empty for bookkeeping chunks.
    pub delta: String,
    /// Set on the final chunk (e.g. "stop").
    pub finish_reason: Option<String>,
}

/// Token accounting for one provider call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn role_round_trips_through_display_and_fromstr() {
        use std::str::FromStr;
        for role in [Role::User, Role::Assistant] {
            let s = role.to_string();
            assert_eq!(Role::from_str(&s).expect("should parse back"), role);
        }
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).expect("should serialize");
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn turn_expands_to_user_then_assistant() {
        let turn = ConversationTurn {
            user_message: "hi".to_string(),
            ai_response: "hello!".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        };
        let [first, second] = turn.context_entries();
        assert_eq!(first.role, Role::User);
        assert_eq!(first.content, "hi");
        assert_eq!(second.role, Role::Assistant);
        assert_eq!(second.content, "hello!");
    }

    #[test]
    fn sentiment_label_round_trip() {
        use std::str::FromStr;
        assert_eq!(SentimentLabel::Positive.to_string(), "POSITIVE");
        assert_eq!(
            SentimentLabel::from_str("NEGATIVE").unwrap(),
            SentimentLabel::Negative
        );
    }

    #[test]
    fn user_id_is_used_verbatim() {
        let id = UserId::from("alice@example com/..");
        assert_eq!(id.as_str(), "alice@example com/..");
        assert_eq!(id.to_string(), "alice@example com/..");
    }

    #[test]
    fn adapter_type_serialization() {
        let cache = AdapterType::Cache;
        let json = serde_json::to_string(&cache).expect("should serialize");
        let parsed: AdapterType = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(cache, parsed);
    }
}
