// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability trait definitions for the Reverie adapter architecture.
//!
//! All adapters extend the [`Adapter`] base trait and use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod adapter;
pub mod auth;
pub mod classifier;
pub mod provider;
pub mod storage;

// Re-export all traits at the traits module level for convenience.
pub use adapter::Adapter;
pub use auth::AuthService;
pub use classifier::{ObjectDetector, SentimentClassifier, Transcriber};
pub use provider::LanguageModel;
pub use storage::{CacheTier, DurableTier};
