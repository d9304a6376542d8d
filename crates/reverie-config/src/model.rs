// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Reverie assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Reverie configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReverieConfig {
    /// Assistant identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Tiered conversation memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Groq API settings.
    #[serde(default)]
    pub groq: GroqConfig,

    /// Account store settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Assistant identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline system prompt string for the language model.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
        }
    }
}

fn default_agent_name() -> String {
    "reverie".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Tiered conversation memory configuration.
///
/// The two connection strings are the only inputs the memory manager needs
/// to decide which external tiers exist: an absent string degrades that
/// tier to permanently-unavailable for the process lifetime, which is a
/// supported mode, not an error.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Fast-cache connection URL (e.g. `redis://127.0.0.1:6379`).
    /// `None` disables the cache tier.
    #[serde(default)]
    pub cache_url: Option<String>,

    /// Durable-store connection URI (e.g. `mongodb://127.0.0.1:27017`).
    /// `None` disables the durable tier.
    #[serde(default)]
    pub durable_uri: Option<String>,

    /// Database name in the durable store.
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection name for the conversation log.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Number of most-recent turns injected into the model prompt.
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Number of turns shown in the recent-history view.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Per-tier connect/operation timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            cache_url: None,
            durable_uri: None,
            database: default_database(),
            collection: default_collection(),
            context_window: default_context_window(),
            recent_limit: default_recent_limit(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_database() -> String {
    "reverie".to_string()
}

fn default_collection() -> String {
    "conversations".to_string()
}

fn default_context_window() -> usize {
    5
}

fn default_recent_limit() -> usize {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

/// Groq API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroqConfig {
    /// Groq API key. `None` disables the provider (shell runs memory-only).
    #[serde(default)]
    pub api_key: Option<String>,

    /// Default chat model for LLM requests.
    #[serde(default = "default_model")]
    pub model: String,

    /// Speech-to-text model for audio transcription.
    #[serde(default = "default_audio_model")]
    pub audio_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            audio_model: default_audio_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_audio_model() -> String {
    "whisper-large-v3-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

/// Account store configuration.
///
/// Accounts live in the same durable store as the conversation log
/// (`memory.durable_uri`); only the collection name is configurable here.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Collection name for user accounts.
    #[serde(default = "default_users_collection")]
    pub users_collection: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            users_collection: default_users_collection(),
        }
    }
}

fn default_users_collection() -> String {
    "users".to_string()
}
