// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Reverie conversational assistant.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Reverie workspace. Storage tiers, the
//! LLM provider, and the classifier collaborators all implement traits
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{with_timeout, ReverieError};
pub use types::{ContextEntry, ConversationTurn, RecentTurn, Role, StoredTurn, TurnId, UserId};

// Re-export all capability traits at crate root.
pub use traits::{
    Adapter, AuthService, CacheTier, DurableTier, LanguageModel, ObjectDetector,
    SentimentClassifier, Transcriber,
};
