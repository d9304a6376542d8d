// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared mock adapters for testing Reverie components.
//!
//! Everything here is deterministic and in-process so tests run in CI
//! without Redis, MongoDB, or API credentials.

pub mod mock_detector;
pub mod mock_provider;
pub mod mock_tiers;

pub use mock_detector::MockDetector;
pub use mock_provider::MockProvider;
pub use mock_tiers::{MockCacheTier, MockDurableTier};
