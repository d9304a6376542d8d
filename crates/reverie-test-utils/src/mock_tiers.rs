// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory mock storage tiers with failure injection.
//!
//! `MockCacheTier` and `MockDurableTier` hold real per-user state so
//! precedence and degradation tests exercise genuine tier contents, and
//! each can be switched "down" at any point to simulate an outage.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;

use reverie_core::types::{
    AdapterType, ConversationTurn, HealthStatus, StoredTurn, TurnId, UserId,
};
use reverie_core::{Adapter, CacheTier, DurableTier, ReverieError};

fn outage(tier: &str) -> ReverieError {
    match tier {
        "cache" => ReverieError::Cache {
            message: "simulated outage".to_string(),
            source: None,
        },
        _ => ReverieError::Durable {
            message: "simulated outage".to_string(),
            source: None,
        },
    }
}

/// In-memory stand-in for the fast cache: per-user newest-first lists.
#[derive(Default)]
pub struct MockCacheTier {
    lists: Mutex<HashMap<String, VecDeque<ConversationTurn>>>,
    down: AtomicBool,
}

impl MockCacheTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the tier going down (`true`) or recovering (`false`).
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check_up(&self) -> Result<(), ReverieError> {
        if self.down.load(Ordering::SeqCst) {
            Err(outage("cache"))
        } else {
            Ok(())
        }
    }

    /// Number of entries currently held for the user.
    pub fn len(&self, user: &UserId) -> usize {
        self.lists
            .lock()
            .unwrap()
            .get(user.as_str())
            .map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self, user: &UserId) -> bool {
        self.len(user) == 0
    }
}

#[async_trait]
impl Adapter for MockCacheTier {
    fn name(&self) -> &str {
        "mock-cache"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Cache
    }

    async fn health_check(&self) -> Result<HealthStatus, ReverieError> {
        self.check_up()?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CacheTier for MockCacheTier {
    async fn push_front(
        &self,
        user: &UserId,
        turn: &ConversationTurn,
    ) -> Result<(), ReverieError> {
        self.check_up()?;
        self.lists
            .lock()
            .unwrap()
            .entry(user.as_str().to_string())
            .or_default()
            .push_front(turn.clone());
        Ok(())
    }

    async fn read_range(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, ReverieError> {
        self.check_up()?;
        Ok(self
            .lists
            .lock()
            .unwrap()
            .get(user.as_str())
            .map(|list| list.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn pop_front(&self, user: &UserId) -> Result<Option<ConversationTurn>, ReverieError> {
        self.check_up()?;
        Ok(self
            .lists
            .lock()
            .unwrap()
            .get_mut(user.as_str())
            .and_then(VecDeque::pop_front))
    }

    async fn delete_key(&self, user: &UserId) -> Result<(), ReverieError> {
        self.check_up()?;
        self.lists.lock().unwrap().remove(user.as_str());
        Ok(())
    }
}

/// In-memory stand-in for the durable store: per-user id-tagged logs,
/// oldest-first internally, served newest-first like the real tier.
#[derive(Default)]
pub struct MockDurableTier {
    docs: Mutex<HashMap<String, Vec<(TurnId, ConversationTurn)>>>,
    next_id: AtomicU64,
    down: AtomicBool,
}

impl MockDurableTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the tier going down (`true`) or recovering (`false`).
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check_up(&self) -> Result<(), ReverieError> {
        if self.down.load(Ordering::SeqCst) {
            Err(outage("durable"))
        } else {
            Ok(())
        }
    }

    /// Number of documents currently held for the user.
    pub fn len(&self, user: &UserId) -> usize {
        self.docs
            .lock()
            .unwrap()
            .get(user.as_str())
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, user: &UserId) -> bool {
        self.len(user) == 0
    }
}

#[async_trait]
impl Adapter for MockDurableTier {
    fn name(&self) -> &str {
        "mock-durable"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Durable
    }

    async fn health_check(&self) -> Result<HealthStatus, ReverieError> {
        self.check_up()?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl DurableTier for MockDurableTier {
    async fn insert_turn(
        &self,
        user: &UserId,
        turn: &ConversationTurn,
    ) -> Result<(), ReverieError> {
        self.check_up()?;
        let id = TurnId(format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        self.docs
            .lock()
            .unwrap()
            .entry(user.as_str().to_string())
            .or_default()
            .push((id, turn.clone()));
        Ok(())
    }

    async fn find_recent(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, ReverieError> {
        self.check_up()?;
        Ok(self
            .docs
            .lock()
            .unwrap()
            .get(user.as_str())
            .map(|log| log.iter().rev().take(limit).map(|(_, t)| t.clone()).collect())
            .unwrap_or_default())
    }

    async fn find_latest(&self, user: &UserId) -> Result<Option<StoredTurn>, ReverieError> {
        self.check_up()?;
        Ok(self
            .docs
            .lock()
            .unwrap()
            .get(user.as_str())
            .and_then(|log| log.last())
            .map(|(id, turn)| StoredTurn {
                id: id.clone(),
                turn: turn.clone(),
            }))
    }

    async fn delete_by_id(&self, id: &TurnId) -> Result<bool, ReverieError> {
        self.check_up()?;
        let mut docs = self.docs.lock().unwrap();
        for log in docs.values_mut() {
            if let Some(pos) = log.iter().position(|(doc_id, _)| doc_id == id) {
                log.remove(pos);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn delete_all(&self, user: &UserId) -> Result<(), ReverieError> {
        self.check_up()?;
        self.docs.lock().unwrap().remove(user.as_str());
        Ok(())
    }
}
