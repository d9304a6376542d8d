// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MongoDB-backed account store.
//!
//! One document per account `{username, password_hash, created_at}` with
//! Argon2id password hashing in PHC string format. The username doubles as
//! the memory tiers' partition key once authentication succeeds.

use std::time::Duration;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use reverie_core::types::{AdapterType, HealthStatus, Identity};
use reverie_core::{Adapter, AuthService, ReverieError};

/// Document shape of one account.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    username: String,
    password_hash: String,
    created_at: bson::DateTime,
}

/// Hash a password into a PHC string with a fresh random salt.
fn hash_password(password: &str) -> Result<String, ReverieError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ReverieError::Auth(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored PHC string.
fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ReverieError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ReverieError::Auth(format!("stored hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// MongoDB-backed [`AuthService`].
///
/// Shares the durable store's deployment; only the collection differs.
/// Connects lazily with a unique index on `username` so duplicate
/// registration loses the race at the database, not in application code.
pub struct MongoAuth {
    uri: String,
    database: String,
    collection: String,
    connect_timeout: Duration,
    coll: OnceCell<Collection<UserDocument>>,
}

impl MongoAuth {
    pub fn new(
        uri: &str,
        database: &str,
        collection: &str,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            uri: uri.to_string(),
            database: database.to_string(),
            collection: collection.to_string(),
            connect_timeout,
            coll: OnceCell::new(),
        }
    }

    async fn coll(&self) -> Result<&Collection<UserDocument>, ReverieError> {
        self.coll
            .get_or_try_init(|| async {
                let mut options = ClientOptions::parse(&self.uri)
                    .await
                    .map_err(|e| ReverieError::Auth(format!("invalid account store URI: {e}")))?;
                options.server_selection_timeout = Some(self.connect_timeout);
                options.connect_timeout = Some(self.connect_timeout);

                let client = Client::with_options(options)
                    .map_err(|e| ReverieError::Auth(format!("account store client failed: {e}")))?;
                let db = client.database(&self.database);
                let coll = db.collection::<UserDocument>(&self.collection);

                let index = IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build();
                coll.create_index(index)
                    .await
                    .map_err(|e| ReverieError::Auth(format!("username index failed: {e}")))?;

                debug!(collection = %self.collection, "account store connected");
                Ok::<_, ReverieError>(coll)
            })
            .await
    }
}

#[async_trait]
impl Adapter for MongoAuth {
    fn name(&self) -> &str {
        "mongo-auth"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, ReverieError> {
        let coll = self.coll().await?;
        coll.estimated_document_count()
            .await
            .map_err(|e| ReverieError::Auth(format!("account store probe failed: {e}")))?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl AuthService for MongoAuth {
    async fn create_user(&self, username: &str, password: &str) -> Result<bool, ReverieError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ReverieError::Auth(
                "username and password must not be empty".into(),
            ));
        }

        let coll = self.coll().await?;
        let existing = coll
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| ReverieError::Auth(format!("account lookup failed: {e}")))?;
        if existing.is_some() {
            return Ok(false);
        }

        let document = UserDocument {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            created_at: bson::DateTime::now(),
        };
        match coll.insert_one(document).await {
            Ok(_) => {
                info!(username, "account created");
                Ok(true)
            }
            // A concurrent registration can still win the race; the unique
            // index turns that into a duplicate-key write error.
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(ReverieError::Auth(format!("account insert failed: {e}"))),
        }
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Identity>, ReverieError> {
        let coll = self.coll().await?;
        let document = coll
            .find_one(doc! { "username": username.trim() })
            .await
            .map_err(|e| ReverieError::Auth(format!("account lookup failed: {e}")))?;

        match document {
            Some(user) if verify_password(password, &user.password_hash)? => {
                Ok(Some(Identity {
                    username: user.username,
                }))
            }
            _ => Ok(None),
        }
    }
}

/// Detect a duplicate-key (E11000) write error from the server.
fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    matches!(
        *error.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == 11000
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash).unwrap());
        assert!(!verify_password("wrong-pass", &hash).unwrap());
    }

    #[test]
    fn hashing_salts_are_unique() {
        let first = hash_password("same input").unwrap();
        let second = hash_password("same input").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("same input", &first).unwrap());
        assert!(verify_password("same input", &second).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let result = verify_password("whatever", "not-a-phc-string");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn create_user_rejects_blank_credentials() {
        let auth = MongoAuth::new(
            "mongodb://127.0.0.1:27017",
            "reverie",
            "users",
            Duration::from_secs(1),
        );
        // Input validation happens before any connection attempt.
        assert!(auth.create_user("", "password").await.is_err());
        assert!(auth.create_user("alice", "").await.is_err());
        assert!(auth.create_user("  ", "password").await.is_err());
    }
}
