// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis implementation of the fast cache tier.
//!
//! Each user's log lives in one Redis list keyed `conversation:<user_id>`,
//! newest-first: saves `LPUSH`, reads `LRANGE 0 limit-1`, undo `LPOP`,
//! clear `DEL`. Entries are JSON records with an RFC 3339 timestamp.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use reverie_core::types::{AdapterType, ConversationTurn, HealthStatus, UserId};
use reverie_core::{with_timeout, Adapter, CacheTier, ReverieError};

/// Wire format of one cached turn.
///
/// The timestamp travels as an RFC 3339 string so entries stay readable
/// with `redis-cli` and survive schema-oblivious tooling.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    user_message: String,
    ai_response: String,
    timestamp: String,
}

impl CacheRecord {
    fn from_turn(turn: &ConversationTurn) -> Self {
        Self {
            user_message: turn.user_message.clone(),
            ai_response: turn.ai_response.clone(),
            timestamp: turn.timestamp.to_rfc3339(),
        }
    }

    fn into_turn(self) -> ConversationTurn {
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| {
                warn!(raw = %self.timestamp, "unparseable cached timestamp, substituting now");
                Utc::now()
            });
        ConversationTurn {
            user_message: self.user_message,
            ai_response: self.ai_response,
            timestamp,
        }
    }
}

/// Decode one list entry. Corrupt entries are dropped with a warning
/// rather than failing the whole read.
fn decode_entry(raw: &str) -> Option<ConversationTurn> {
    match serde_json::from_str::<CacheRecord>(raw) {
        Ok(record) => Some(record.into_turn()),
        Err(err) => {
            warn!(error = %err, "skipping corrupt cache entry");
            None
        }
    }
}

fn encode_entry(turn: &ConversationTurn) -> Result<String, ReverieError> {
    serde_json::to_string(&CacheRecord::from_turn(turn))
        .map_err(|e| ReverieError::cache("failed to encode cache record", e))
}

/// The Redis list key for a user's conversation log.
fn conversation_key(user: &UserId) -> String {
    format!("conversation:{user}")
}

/// Redis-backed fast cache.
///
/// The connection is established lazily on first use and cached for the
/// process lifetime. A failed connect leaves the cell empty, so the next
/// call attempts a fresh connect rather than pinning the tier down.
pub struct RedisCache {
    client: redis::Client,
    conn: OnceCell<MultiplexedConnection>,
    connect_timeout: Duration,
}

impl RedisCache {
    /// Create a cache client for the given `redis://` URL.
    ///
    /// No network activity happens here; the URL is only parsed.
    pub fn new(url: &str, connect_timeout: Duration) -> Result<Self, ReverieError> {
        let client = redis::Client::open(url)
            .map_err(|e| ReverieError::cache(format!("invalid cache URL `{url}`"), e))?;
        Ok(Self {
            client,
            conn: OnceCell::new(),
            connect_timeout,
        })
    }

    /// Connect once, probe with PING, and cache the multiplexed connection.
    /// The whole connect-and-probe sequence runs under the connect timeout
    /// so a silently dropping host cannot stall the first command.
    async fn conn(&self) -> Result<MultiplexedConnection, ReverieError> {
        let conn = self
            .conn
            .get_or_try_init(|| {
                with_timeout(self.connect_timeout, async {
                    let mut conn = self
                        .client
                        .get_multiplexed_tokio_connection_with_response_timeouts(
                            self.connect_timeout,
                            self.connect_timeout,
                        )
                        .await
                        .map_err(|e| ReverieError::cache("cache connect failed", e))?;
                    redis::cmd("PING")
                        .query_async::<String>(&mut conn)
                        .await
                        .map_err(|e| ReverieError::cache("cache ping failed", e))?;
                    debug!("fast cache connected");
                    Ok(conn)
                })
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl Adapter for RedisCache {
    fn name(&self) -> &str {
        "redis-cache"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Cache
    }

    async fn health_check(&self) -> Result<HealthStatus, ReverieError> {
        let mut conn = self.conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| ReverieError::cache("cache ping failed", e))?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CacheTier for RedisCache {
    async fn push_front(
        &self,
        user: &UserId,
        turn: &ConversationTurn,
    ) -> Result<(), ReverieError> {
        let entry = encode_entry(turn)?;
        let mut conn = self.conn().await?;
        let _: () = conn
            .lpush(conversation_key(user), entry)
            .await
            .map_err(|e| ReverieError::cache("LPUSH failed", e))?;
        Ok(())
    }

    async fn read_range(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, ReverieError> {
        let mut conn = self.conn().await?;
        let raw: Vec<String> = conn
            .lrange(conversation_key(user), 0, limit as isize - 1)
            .await
            .map_err(|e| ReverieError::cache("LRANGE failed", e))?;
        Ok(raw.iter().filter_map(|s| decode_entry(s)).collect())
    }

    async fn pop_front(&self, user: &UserId) -> Result<Option<ConversationTurn>, ReverieError> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn
            .lpop(conversation_key(user), None)
            .await
            .map_err(|e| ReverieError::cache("LPOP failed", e))?;
        Ok(raw.as_deref().and_then(decode_entry))
    }

    async fn delete_key(&self, user: &UserId) -> Result<(), ReverieError> {
        let mut conn = self.conn().await?;
        let _: () = conn
            .del(conversation_key(user))
            .await
            .map_err(|e| ReverieError::cache("DEL failed", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_turn() -> ConversationTurn {
        ConversationTurn {
            user_message: "what is rust?".to_string(),
            ai_response: "a systems language".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn key_uses_conversation_prefix() {
        assert_eq!(
            conversation_key(&UserId::from("alice")),
            "conversation:alice"
        );
    }

    #[test]
    fn record_round_trips() {
        let turn = sample_turn();
        let encoded = encode_entry(&turn).expect("should encode");
        let decoded = decode_entry(&encoded).expect("should decode");
        assert_eq!(decoded, turn);
    }

    #[test]
    fn record_carries_rfc3339_timestamp() {
        let encoded = encode_entry(&sample_turn()).expect("should encode");
        assert!(encoded.contains("2026-03-01T14:30:00+00:00"));
    }

    #[test]
    fn corrupt_entry_is_skipped() {
        assert!(decode_entry("{not json").is_none());
        assert!(decode_entry(r#"{"wrong": "shape"}"#).is_none());
    }

    #[test]
    fn unparseable_timestamp_falls_back_to_now() {
        let raw = r#"{"user_message":"hi","ai_response":"hello","timestamp":"not-a-date"}"#;
        let turn = decode_entry(raw).expect("record shape is valid");
        assert_eq!(turn.user_message, "hi");
        // Substituted timestamp is recent, not epoch.
        assert!(turn.timestamp > Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn invalid_url_is_rejected_without_io() {
        let result = RedisCache::new("not-a-url", Duration::from_secs(1));
        assert!(result.is_err());
    }
}
