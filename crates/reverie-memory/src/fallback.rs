// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process fallback store, the tier of last resort.
//!
//! A plain per-user map of chronological turns, held in memory and lost on
//! process exit. Written on every save so it always holds what this process
//! has seen, ready for reads when both external tiers are down.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use reverie_core::types::{ConversationTurn, UserId};

/// Per-user conversation log held in process memory.
///
/// All methods take `&self`; interior mutability via a std `Mutex` since no
/// lock is ever held across an await point.
#[derive(Default)]
pub struct FallbackStore {
    turns: Mutex<HashMap<String, Vec<ConversationTurn>>>,
}

impl FallbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the map, recovering from a poisoned lock: the map itself
    /// cannot be left in an inconsistent state by any panicking path here.
    fn locked(&self) -> MutexGuard<'_, HashMap<String, Vec<ConversationTurn>>> {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a turn to the user's log, oldest-first.
    pub fn append(&self, user: &UserId, turn: ConversationTurn) {
        self.locked()
            .entry(user.as_str().to_string())
            .or_default()
            .push(turn);
    }

    /// Up to `limit` most-recent turns, newest-first.
    pub fn recent(&self, user: &UserId, limit: usize) -> Vec<ConversationTurn> {
        self.locked()
            .get(user.as_str())
            .map(|log| log.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Remove and return the most-recent turn, or `None` if the user has no
    /// history.
    pub fn pop_last(&self, user: &UserId) -> Option<ConversationTurn> {
        self.locked().get_mut(user.as_str()).and_then(Vec::pop)
    }

    /// Drop the user's entire log.
    pub fn clear(&self, user: &UserId) {
        self.locked().remove(user.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn turn(n: u32) -> ConversationTurn {
        ConversationTurn {
            user_message: format!("question {n}"),
            ai_response: format!("answer {n}"),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, n, 0).unwrap(),
        }
    }

    #[test]
    fn recent_returns_newest_first() {
        let store = FallbackStore::new();
        let user = UserId::from("alice");
        for n in 0..4 {
            store.append(&user, turn(n));
        }

        let recent = store.recent(&user, 3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].user_message, "question 3");
        assert_eq!(recent[2].user_message, "question 1");
    }

    #[test]
    fn recent_for_unknown_user_is_empty() {
        let store = FallbackStore::new();
        assert!(store.recent(&UserId::from("nobody"), 5).is_empty());
    }

    #[test]
    fn pop_last_removes_newest() {
        let store = FallbackStore::new();
        let user = UserId::from("alice");
        store.append(&user, turn(0));
        store.append(&user, turn(1));

        let popped = store.pop_last(&user).expect("should pop");
        assert_eq!(popped.user_message, "question 1");
        assert_eq!(store.recent(&user, 10).len(), 1);

        store.pop_last(&user).expect("should pop the remaining turn");
        assert!(store.pop_last(&user).is_none());
    }

    #[test]
    fn clear_drops_only_that_user() {
        let store = FallbackStore::new();
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");
        store.append(&alice, turn(0));
        store.append(&bob, turn(1));

        store.clear(&alice);
        assert!(store.recent(&alice, 10).is_empty());
        assert_eq!(store.recent(&bob, 10).len(), 1);
    }
}
