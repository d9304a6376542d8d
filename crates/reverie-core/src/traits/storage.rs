// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage tier traits for the tiered conversation memory.
//!
//! Two independent backends hold the same logical per-user conversation
//! log: a low-latency key-ordered list store (the fast cache) and a
//! document store (the durable source of truth). Both traits speak in
//! newest-first order, matching how the backends physically store entries;
//! the memory manager reverses when chronological order is required.
//!
//! Implementations own their connection lifecycle: lazy connect-once with
//! a liveness probe, cached for the process lifetime. Any returned error
//! is interpreted by the manager as "tier unavailable for this call";
//! it is never retried within the same request and never surfaced to callers.

use async_trait::async_trait;

use crate::error::ReverieError;
use crate::traits::adapter::Adapter;
use crate::types::{ConversationTurn, StoredTurn, TurnId, UserId};

/// The fast cache: a recency-bounded duplicate of the conversation log,
/// read first on the hot path. May lag or diverge from the durable tier;
/// no reconciliation between tiers is attempted.
#[async_trait]
pub trait CacheTier: Adapter {
    /// Serializes the turn and prepends it to the user's list.
    ///
    /// The list grows unbounded; trimming is a deployment concern.
    async fn push_front(&self, user: &UserId, turn: &ConversationTurn)
        -> Result<(), ReverieError>;

    /// Returns up to `limit` most-recent turns, newest-first.
    ///
    /// An empty vec means "reachable, user has no cached history" and is
    /// a final answer, distinct from an `Err`, which means unreachable.
    async fn read_range(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, ReverieError>;

    /// Removes and returns the single most-recent turn, or `None` if the
    /// user's list is empty.
    async fn pop_front(&self, user: &UserId) -> Result<Option<ConversationTurn>, ReverieError>;

    /// Removes the user's entire list.
    async fn delete_key(&self, user: &UserId) -> Result<(), ReverieError>;
}

/// The durable store: the canonical, unbounded conversation log and the
/// source of truth when tiers diverge.
#[async_trait]
pub trait DurableTier: Adapter {
    /// Appends one turn document for the user.
    async fn insert_turn(&self, user: &UserId, turn: &ConversationTurn)
        -> Result<(), ReverieError>;

    /// Returns up to `limit` turns, newest-first.
    async fn find_recent(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, ReverieError>;

    /// Returns the single newest stored turn with its document handle,
    /// or `None` if the user has no history.
    async fn find_latest(&self, user: &UserId) -> Result<Option<StoredTurn>, ReverieError>;

    /// Removes exactly one document. Returns whether a document was removed.
    async fn delete_by_id(&self, id: &TurnId) -> Result<bool, ReverieError>;

    /// Removes every document for the user.
    async fn delete_all(&self, user: &UserId) -> Result<(), ReverieError>;
}
