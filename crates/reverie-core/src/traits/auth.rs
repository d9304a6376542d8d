// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication capability trait for account management.

use async_trait::async_trait;

use crate::error::ReverieError;
use crate::traits::adapter::Adapter;
use crate::types::Identity;

/// Capability for creating accounts and verifying credentials.
///
/// Implementations return a verified [`Identity`] whose `username` becomes
/// the stable `user_id` partition key for the memory tiers.
#[async_trait]
pub trait AuthService: Adapter {
    /// Creates a new account. Returns `false` if the username is taken.
    async fn create_user(&self, username: &str, password: &str) -> Result<bool, ReverieError>;

    /// Verifies credentials, returning the identity on success and `None`
    /// for an unknown user or wrong password.
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Identity>, ReverieError>;
}
