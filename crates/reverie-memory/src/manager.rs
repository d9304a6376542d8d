// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The memory manager: tier orchestration for the conversation log.
//!
//! Three tiers, one logical log. Writes go to both external tiers,
//! best-effort; the in-process fallback catches a turn only when neither
//! external tier acknowledged it. Reads take the first REACHABLE tier's
//! answer as final, even when that answer is empty.
//! A tier only "falls through" when it is unreachable, never when it is
//! merely empty, so a flushed cache reads as a fresh conversation rather
//! than silently resurrecting history from the durable store.
//!
//! No operation here returns an error for a tier outage. Degradation is
//! logged and absorbed; the caller sees reduced recall, not a failure.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use reverie_config::model::MemoryConfig;
use reverie_core::types::{ContextEntry, ConversationTurn, RecentTurn, UserId};
use reverie_core::{CacheTier, DurableTier};

use crate::cache::RedisCache;
use crate::durable::MongoDurable;
use crate::fallback::FallbackStore;

/// Format for the short human-readable history label, e.g. "Mar 01, 14:30".
const RECENT_LABEL_FORMAT: &str = "%b %d, %H:%M";

/// Which tiers acknowledged a save. The fallback catches the turn when
/// both external tiers miss it, so a save never wholly fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub cache_ok: bool,
    pub durable_ok: bool,
    pub fallback_ok: bool,
}

impl SaveOutcome {
    /// True when at least one tier, the fallback included, holds the turn.
    pub fn persisted(&self) -> bool {
        self.cache_ok || self.durable_ok || self.fallback_ok
    }

    /// True when only the in-process fallback holds the turn, meaning it
    /// will not survive a restart.
    pub fn fallback_only(&self) -> bool {
        !self.cache_ok && !self.durable_ok
    }
}

/// Orchestrates the fast cache, the durable store, and the in-process
/// fallback behind one conversation-log API.
///
/// Either external tier may be absent (not configured) or unreachable
/// (configured but down); the manager treats both the same way at read
/// time and degrades through the remaining tiers.
pub struct MemoryManager {
    cache: Option<Arc<dyn CacheTier>>,
    durable: Option<Arc<dyn DurableTier>>,
    fallback: FallbackStore,
    context_window: usize,
    recent_limit: usize,
}

impl MemoryManager {
    pub fn new(
        cache: Option<Arc<dyn CacheTier>>,
        durable: Option<Arc<dyn DurableTier>>,
        context_window: usize,
        recent_limit: usize,
    ) -> Self {
        Self {
            cache,
            durable,
            fallback: FallbackStore::new(),
            context_window,
            recent_limit,
        }
    }

    /// Build a manager from configuration. Tiers without a connection
    /// string are left unconfigured; a malformed cache URL downgrades to
    /// no cache rather than failing startup.
    pub fn from_config(config: &MemoryConfig) -> Self {
        let timeout = Duration::from_secs(config.connect_timeout_secs);

        let cache: Option<Arc<dyn CacheTier>> = match config.cache_url.as_deref() {
            Some(url) => match RedisCache::new(url, timeout) {
                Ok(cache) => Some(Arc::new(cache)),
                Err(err) => {
                    warn!(error = %err, "fast cache disabled");
                    None
                }
            },
            None => None,
        };

        let durable: Option<Arc<dyn DurableTier>> = config.durable_uri.as_deref().map(|uri| {
            Arc::new(MongoDurable::new(
                uri,
                &config.database,
                &config.collection,
                timeout,
            )) as Arc<dyn DurableTier>
        });

        Self::new(cache, durable, config.context_window, config.recent_limit)
    }

    pub fn cache(&self) -> Option<&Arc<dyn CacheTier>> {
        self.cache.as_ref()
    }

    pub fn durable(&self) -> Option<&Arc<dyn DurableTier>> {
        self.durable.as_ref()
    }

    /// Record one completed exchange in every reachable tier.
    ///
    /// A single timestamp is assigned here and shared by all tier writes,
    /// so recency ordering agrees across tiers. Tier failures are absorbed
    /// per tier; the other tier's write still proceeds. The fallback keeps
    /// the turn only when neither external tier acknowledged it, so history
    /// deleted from the external tiers cannot resurface from a stale
    /// in-process copy.
    pub async fn save_turn(
        &self,
        user: &UserId,
        user_message: &str,
        ai_response: &str,
    ) -> SaveOutcome {
        let turn = ConversationTurn {
            user_message: user_message.to_string(),
            ai_response: ai_response.to_string(),
            timestamp: Utc::now(),
        };

        let mut outcome = SaveOutcome {
            cache_ok: false,
            durable_ok: false,
            fallback_ok: false,
        };

        if let Some(cache) = &self.cache {
            match cache.push_front(user, &turn).await {
                Ok(()) => outcome.cache_ok = true,
                Err(err) => warn!(user = %user, error = %err, "cache write skipped"),
            }
        }

        if let Some(durable) = &self.durable {
            match durable.insert_turn(user, &turn).await {
                Ok(()) => outcome.durable_ok = true,
                Err(err) => warn!(user = %user, error = %err, "durable write skipped"),
            }
        }

        if !outcome.cache_ok && !outcome.durable_ok {
            self.fallback.append(user, turn);
            outcome.fallback_ok = true;
        }
        outcome
    }

    /// Reconstruct the model's context window: the most recent turns in
    /// chronological order, each expanded to (user, assistant) entries.
    ///
    /// The caller appends the in-flight user message after these.
    pub async fn get_context(&self, user: &UserId) -> Vec<ContextEntry> {
        let newest_first = self.read_newest_first(user, self.context_window).await;
        newest_first
            .into_iter()
            .rev()
            .flat_map(|turn| turn.context_entries())
            .collect()
    }

    /// Recent turns for the history view, newest-first, with short
    /// display timestamps.
    pub async fn load_recent(&self, user: &UserId) -> Vec<RecentTurn> {
        self.read_newest_first(user, self.recent_limit)
            .await
            .into_iter()
            .map(|turn| RecentTurn {
                timestamp_label: turn.timestamp.format(RECENT_LABEL_FORMAT).to_string(),
                user_message: turn.user_message,
                ai_response: turn.ai_response,
            })
            .collect()
    }

    /// Strict read precedence: the first reachable tier's answer is final.
    /// An `Err` means unreachable and falls through; `Ok(vec![])` does not.
    async fn read_newest_first(&self, user: &UserId, limit: usize) -> Vec<ConversationTurn> {
        // Zero means zero; the backends would read it as "everything"
        // (LRANGE 0 -1, unlimited Mongo find).
        if limit == 0 {
            return Vec::new();
        }

        if let Some(cache) = &self.cache {
            match cache.read_range(user, limit).await {
                Ok(turns) => return turns,
                Err(err) => {
                    warn!(user = %user, error = %err, "cache read failed, trying durable");
                }
            }
        }

        if let Some(durable) = &self.durable {
            match durable.find_recent(user, limit).await {
                Ok(turns) => return turns,
                Err(err) => {
                    warn!(user = %user, error = %err, "durable read failed, using fallback");
                }
            }
        }

        debug!(user = %user, "serving history from in-process fallback");
        self.fallback.recent(user, limit)
    }

    /// Remove the most recent turn ("undo") from every tier that has
    /// one, the fallback included. Returns `true` if any tier removed a
    /// turn. A deleted turn must not resurface later, so the fallback
    /// copy goes too.
    pub async fn delete_last(&self, user: &UserId) -> bool {
        let mut removed = false;

        if let Some(cache) = &self.cache {
            match cache.pop_front(user).await {
                Ok(popped) => removed |= popped.is_some(),
                Err(err) => warn!(user = %user, error = %err, "cache undo skipped"),
            }
        }

        if let Some(durable) = &self.durable {
            match durable.find_latest(user).await {
                Ok(Some(stored)) => match durable.delete_by_id(&stored.id).await {
                    Ok(deleted) => removed |= deleted,
                    Err(err) => warn!(user = %user, error = %err, "durable undo skipped"),
                },
                Ok(None) => {}
                Err(err) => warn!(user = %user, error = %err, "durable undo skipped"),
            }
        }

        removed |= self.fallback.pop_last(user).is_some();

        removed
    }

    /// Erase the user's entire history from every tier, best-effort.
    /// The fallback is always cleared, whatever the external tiers did.
    pub async fn clear_all(&self, user: &UserId) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.delete_key(user).await {
                warn!(user = %user, error = %err, "cache clear skipped");
            }
        }

        if let Some(durable) = &self.durable {
            if let Err(err) = durable.delete_all(user).await {
                warn!(user = %user, error = %err, "durable clear skipped");
            }
        }

        self.fallback.clear(user);
    }
}
