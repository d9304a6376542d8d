// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered conversation memory for the Reverie assistant.
//!
//! Three tiers back one logical per-user conversation log:
//!
//! - a Redis fast cache ([`cache::RedisCache`]), read first,
//! - a MongoDB durable store ([`durable::MongoDurable`]), the source of truth,
//! - an in-process fallback ([`fallback::FallbackStore`]), last resort.
//!
//! [`MemoryManager`] orchestrates them: best-effort writes to every
//! reachable tier, strict first-reachable-tier-wins reads, and graceful
//! degradation all the way down to process memory. Callers never see a
//! tier outage as an error.

pub mod cache;
pub mod durable;
pub mod fallback;
pub mod manager;

pub use cache::RedisCache;
pub use durable::MongoDurable;
pub use fallback::FallbackStore;
pub use manager::{MemoryManager, SaveOutcome};
