// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end degradation behavior through the public configuration path.
//!
//! These tests run without Redis or MongoDB: they exercise the exact
//! production wiring a deployment with no connection strings gets, plus
//! the configured-but-unreachable path.

use std::time::Duration;

use reverie_config::model::MemoryConfig;
use reverie_core::types::UserId;
use reverie_memory::{MemoryManager, RedisCache};

fn fallback_only_config() -> MemoryConfig {
    MemoryConfig {
        cache_url: None,
        durable_uri: None,
        ..MemoryConfig::default()
    }
}

#[tokio::test]
async fn unconfigured_tiers_degrade_to_fallback_silently() {
    let manager = MemoryManager::from_config(&fallback_only_config());
    let user = UserId::from("alice");

    let outcome = manager.save_turn(&user, "hello", "hi there").await;
    assert!(!outcome.cache_ok);
    assert!(!outcome.durable_ok);
    assert!(outcome.fallback_ok);
    assert!(outcome.persisted());

    // The conversation still works within the process.
    let context = manager.get_context(&user).await;
    assert_eq!(context.len(), 2);
    assert_eq!(context[0].content, "hello");
    assert_eq!(context[1].content, "hi there");

    let recent = manager.load_recent(&user).await;
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].user_message, "hello");
}

#[tokio::test]
async fn fallback_history_is_process_scoped() {
    let first = MemoryManager::from_config(&fallback_only_config());
    let user = UserId::from("alice");
    first.save_turn(&user, "remember me", "noted").await;

    // A fresh manager (fresh process, conceptually) starts empty.
    let second = MemoryManager::from_config(&fallback_only_config());
    assert!(second.get_context(&user).await.is_empty());
}

#[tokio::test]
async fn undo_and_clear_work_in_fallback_only_mode() {
    let manager = MemoryManager::from_config(&fallback_only_config());
    let user = UserId::from("alice");

    manager.save_turn(&user, "q1", "a1").await;
    manager.save_turn(&user, "q2", "a2").await;

    assert!(manager.delete_last(&user).await);
    let context = manager.get_context(&user).await;
    assert_eq!(context.len(), 2);
    assert_eq!(context[0].content, "q1");

    manager.clear_all(&user).await;
    assert!(manager.get_context(&user).await.is_empty());
    assert!(!manager.delete_last(&user).await);
}

#[tokio::test]
async fn malformed_cache_url_downgrades_instead_of_failing() {
    let config = MemoryConfig {
        cache_url: Some("definitely not a url".to_string()),
        ..fallback_only_config()
    };
    let manager = MemoryManager::from_config(&config);
    assert!(manager.cache().is_none());

    // Still fully usable.
    let user = UserId::from("alice");
    manager.save_turn(&user, "q", "a").await;
    assert_eq!(manager.get_context(&user).await.len(), 2);
}

#[tokio::test]
async fn unreachable_cache_reports_errors_not_panics() {
    // A valid URL pointing at a port nothing listens on.
    let cache = RedisCache::new("redis://127.0.0.1:1", Duration::from_millis(200))
        .expect("URL parses");
    let user = UserId::from("alice");

    let result = reverie_core::CacheTier::read_range(&cache, &user, 5).await;
    assert!(result.is_err(), "connect should fail cleanly");
}
