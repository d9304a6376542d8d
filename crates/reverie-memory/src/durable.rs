// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MongoDB implementation of the durable store tier.
//!
//! One document per turn in a single collection, shaped
//! `{user_id, user_message, ai_response, timestamp}` with a compound
//! index on `(user_id, timestamp desc)` to serve the recency queries.

use std::time::Duration;

use async_trait::async_trait;
use bson::doc;
use bson::oid::ObjectId;
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::debug;

use reverie_core::types::{
    AdapterType, ConversationTurn, HealthStatus, StoredTurn, TurnId, UserId,
};
use reverie_core::{with_timeout, Adapter, DurableTier, ReverieError};

/// Document shape of one stored turn.
#[derive(Debug, Serialize, Deserialize)]
struct TurnDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_id: String,
    user_message: String,
    ai_response: String,
    timestamp: bson::DateTime,
}

impl TurnDocument {
    fn new(user: &UserId, turn: &ConversationTurn) -> Self {
        Self {
            id: None,
            user_id: user.as_str().to_string(),
            user_message: turn.user_message.clone(),
            ai_response: turn.ai_response.clone(),
            timestamp: bson::DateTime::from_chrono(turn.timestamp),
        }
    }

    fn into_turn(self) -> ConversationTurn {
        ConversationTurn {
            user_message: self.user_message,
            ai_response: self.ai_response,
            timestamp: self.timestamp.to_chrono(),
        }
    }

    fn into_stored(self) -> Option<StoredTurn> {
        let id = self.id?;
        Some(StoredTurn {
            id: TurnId(id.to_hex()),
            turn: ConversationTurn {
                user_message: self.user_message,
                ai_response: self.ai_response,
                timestamp: self.timestamp.to_chrono(),
            },
        })
    }
}

/// MongoDB-backed durable store.
///
/// Connection and index setup happen lazily on first use. A failed connect
/// leaves the cell empty so later calls retry instead of marking the tier
/// permanently dead.
pub struct MongoDurable {
    uri: String,
    database: String,
    collection: String,
    connect_timeout: Duration,
    coll: OnceCell<Collection<TurnDocument>>,
}

impl MongoDurable {
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

    /// Connect once, verify with a ping, and ensure the recency index.
    /// The driver's own timeouts cover server selection; the outer
    /// deadline covers the full connect, ping and index sequence.
    async fn coll(&self) -> Result<&Collection<TurnDocument>, ReverieError> {
        self.coll
            .get_or_try_init(|| {
                with_timeout(self.connect_timeout * 2, async {
                    let mut options = ClientOptions::parse(&self.uri)
                        .await
                        .map_err(|e| ReverieError::durable("invalid durable store URI", e))?;
                    options.server_selection_timeout = Some(self.connect_timeout);
                    options.connect_timeout = Some(self.connect_timeout);

                    let client = Client::with_options(options)
                        .map_err(|e| ReverieError::durable("durable store client failed", e))?;
                    let db = client.database(&self.database);
                    db.run_command(doc! { "ping": 1 })
                        .await
                        .map_err(|e| ReverieError::durable("durable store ping failed", e))?;

                    let coll = db.collection::<TurnDocument>(&self.collection);
                    let index = IndexModel::builder()
                        .keys(doc! { "user_id": 1, "timestamp": -1 })
                        .options(IndexOptions::builder().name("user_recency".to_string()).build())
                        .build();
                    coll.create_index(index)
                        .await
                        .map_err(|e| ReverieError::durable("index creation failed", e))?;

                    debug!(database = %self.database, collection = %self.collection,
                        "durable store connected");
                    Ok(coll)
                })
            })
            .await
    }
}

#[async_trait]
impl Adapter for MongoDurable {
    fn name(&self) -> &str {
        "mongo-durable"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Durable
    }

    async fn health_check(&self) -> Result<HealthStatus, ReverieError> {
        let coll = self.coll().await?;
        coll.estimated_document_count()
            .await
            .map_err(|e| ReverieError::durable("durable store probe failed", e))?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl DurableTier for MongoDurable {
    async fn insert_turn(
        &self,
        user: &UserId,
        turn: &ConversationTurn,
    ) -> Result<(), ReverieError> {
        let coll = self.coll().await?;
        coll.insert_one(TurnDocument::new(user, turn))
            .await
            .map_err(|e| ReverieError::durable("insert failed", e))?;
        Ok(())
    }

    async fn find_recent(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, ReverieError> {
        let coll = self.coll().await?;
        let cursor = coll
            .find(doc! { "user_id": user.as_str() })
            .sort(doc! { "timestamp": -1 })
            .limit(limit as i64)
            .await
            .map_err(|e| ReverieError::durable("recency query failed", e))?;
        let docs: Vec<TurnDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| ReverieError::durable("cursor read failed", e))?;
        Ok(docs.into_iter().map(TurnDocument::into_turn).collect())
    }

    async fn find_latest(&self, user: &UserId) -> Result<Option<StoredTurn>, ReverieError> {
        let coll = self.coll().await?;
        let doc = coll
            .find_one(doc! { "user_id": user.as_str() })
            .sort(doc! { "timestamp": -1 })
            .await
            .map_err(|e| ReverieError::durable("latest query failed", e))?;
        Ok(doc.and_then(TurnDocument::into_stored))
    }

    async fn delete_by_id(&self, id: &TurnId) -> Result<bool, ReverieError> {
        let oid = ObjectId::parse_str(&id.0)
            .map_err(|e| ReverieError::durable("malformed document id", e))?;
        let coll = self.coll().await?;
        let result = coll
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(|e| ReverieError::durable("delete failed", e))?;
        Ok(result.deleted_count == 1)
    }

    async fn delete_all(&self, user: &UserId) -> Result<(), ReverieError> {
        let coll = self.coll().await?;
        coll.delete_many(doc! { "user_id": user.as_str() })
            .await
            .map_err(|e| ReverieError::durable("delete-all failed", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_turn() -> ConversationTurn {
        ConversationTurn {
            user_message: "what is bson?".to_string(),
            ai_response: "binary json".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn document_round_trips_through_bson() {
        let user = UserId::from("alice");
        let doc = TurnDocument::new(&user, &sample_turn());
        let bytes = bson::to_vec(&doc).expect("should serialize");
        let back: TurnDocument = bson::from_slice(&bytes).expect("should deserialize");
        assert_eq!(back.user_id, "alice");
        assert_eq!(back.into_turn(), sample_turn());
    }

    #[test]
    fn new_document_omits_id_field() {
        let doc = TurnDocument::new(&UserId::from("alice"), &sample_turn());
        let serialized = bson::to_document(&doc).expect("should serialize");
        assert!(!serialized.contains_key("_id"));
        assert_eq!(serialized.get_str("user_id").unwrap(), "alice");
    }

    #[test]
    fn stored_turn_requires_an_id() {
        let mut doc = TurnDocument::new(&UserId::from("alice"), &sample_turn());
        assert!(doc.into_stored().is_none());

        doc = TurnDocument::new(&UserId::from("alice"), &sample_turn());
        let oid = ObjectId::new();
        doc.id = Some(oid);
        let stored = doc.into_stored().expect("id present");
        assert_eq!(stored.id, TurnId(oid.to_hex()));
    }

    #[test]
    fn malformed_turn_id_is_an_error_not_a_panic() {
        let parsed = ObjectId::parse_str("zz");
        assert!(parsed.is_err());
    }
}
