// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reverie recent` and `reverie forget` command implementations.
//!
//! Both operate on the same tiered history the shell uses, so output
//! reflects whatever tier is reachable right now.

use colored::Colorize;

use reverie_config::model::ReverieConfig;
use reverie_core::types::UserId;
use reverie_core::ReverieError;
use reverie_memory::MemoryManager;

/// Run the `reverie recent` command: print the newest turns, newest
/// first, with their short timestamps. `limit` overrides the configured
/// `recent_limit` when given.
pub async fn run_recent(
    config: &ReverieConfig,
    user: &str,
    limit: Option<usize>,
) -> Result<(), ReverieError> {
    let mut memory_config = config.memory.clone();
    if let Some(limit) = limit {
        memory_config.recent_limit = limit;
    }
    let memory = MemoryManager::from_config(&memory_config);
    let user = UserId::from(user);

    let recent = memory.load_recent(&user).await;
    if recent.is_empty() {
        println!("no conversation history for {user}");
        return Ok(());
    }

    for turn in recent {
        println!("{}", turn.timestamp_label.dimmed());
        println!("  {} {}", "you:".bold(), turn.user_message);
        println!("  {} {}", "reverie:".bold(), turn.ai_response);
    }
    Ok(())
}

/// Run the `reverie forget` command: remove the most recent exchange,
/// or with `--all` erase the user's history from every reachable tier.
pub async fn run_forget(
    config: &ReverieConfig,
    user: &str,
    all: bool,
) -> Result<(), ReverieError> {
    let memory = MemoryManager::from_config(&config.memory);
    let user = UserId::from(user);

    if all {
        memory.clear_all(&user).await;
        println!("conversation history cleared for {user}");
    } else if memory.delete_last(&user).await {
        println!("last exchange removed for {user}");
    } else {
        println!("nothing to remove for {user}");
    }
    Ok(())
}
