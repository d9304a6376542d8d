// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Reverie assistant.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// The primary error type used across all Reverie adapter traits and core operations.
#[derive(Debug, Error)]
pub enum ReverieError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Fast-cache tier errors (connection refused, timeout, command failure).
    #[error("cache tier error: {message}")]
    Cache {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Durable-store tier errors (server selection, query failure, serialization).
    #[error("durable tier error: {message}")]
    Durable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// LLM provider errors (API failure, token limits, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication errors (account store unreachable, hash failure).
    #[error("auth error: {0}")]
    Auth(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ReverieError {
    /// Shorthand for a cache-tier error with a boxed source.
    pub fn cache(message: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        ReverieError::Cache {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for a durable-tier error with a boxed source.
    pub fn durable(message: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        ReverieError::Durable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Run a fallible future under a deadline. If the deadline elapses before
/// the future resolves, the result is [`ReverieError::Timeout`] carrying
/// the duration that was allowed.
pub async fn with_timeout<T, F>(duration: Duration, future: F) -> Result<T, ReverieError>
where
    F: Future<Output = Result<T, ReverieError>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(ReverieError::Timeout { duration }),
    }
}
