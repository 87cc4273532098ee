//! Storage gateway.
//!
//! Maps "read content for user X" / "write content for user X" onto the two
//! primitives a partitioned key-value store offers: get every item under a
//! partition key, and put (upsert) one item. The user id is the partition key,
//! so each user owns exactly one record.
//!
//! The backing store sits behind [`PartitionStore`] and is handed to
//! [`ContentGateway`] at construction. Two implementations ship with the crate:
//!
//! - [`DynamoStore`]: DynamoDB `Query` / `PutItem`
//! - [`MemoryStore`]: in-process map for local runs and tests
//!
//! No call is retried here. A failed get or put surfaces as a [`StorageError`]
//! and the caller decides what the client sees.

mod dynamodb;
mod memory;

pub use dynamodb::DynamoStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::identity::UserId;

/// The one record a user owns.
///
/// Persisted as `{ userId, content?, updatedAt }`; `userId` is the partition
/// key. A write replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContentRecord {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Milliseconds since the Unix epoch at the last write. Informational only.
    #[serde(default)]
    pub updated_at: i64,
}

/// The partition-key primitives of a key-value backing store.
#[async_trait]
pub trait PartitionStore: Send + Sync {
    /// Every item stored under `partition_key`. An unknown key yields an
    /// empty vector, not an error.
    async fn query_partition(&self, partition_key: &str) -> Result<Vec<UserContentRecord>, StorageError>;

    /// Unconditional upsert keyed by `record.user_id`.
    async fn put_item(&self, record: UserContentRecord) -> Result<(), StorageError>;
}

/// Reads and writes user content through a [`PartitionStore`].
#[derive(Clone)]
pub struct ContentGateway {
    store: Arc<dyn PartitionStore>,
}

impl ContentGateway {
    pub fn new(store: Arc<dyn PartitionStore>) -> Self {
        Self { store }
    }

    /// Returns the user's record, or `None` if they have never written.
    ///
    /// The partition holds at most one item, so the first item is the record.
    /// If a partition ever holds more, the first one the store returns wins.
    pub async fn read_user_content(&self, user_id: &UserId) -> Result<Option<UserContentRecord>, StorageError> {
        let items = self.store.query_partition(user_id.as_str()).await?;
        if items.len() > 1 {
            warn!(user_id = %user_id, items = items.len(), "partition holds more than one item, using the first");
        }
        debug!(user_id = %user_id, found = !items.is_empty(), "read user content");
        Ok(items.into_iter().next())
    }

    /// Overwrites the user's record with `content`, stamped with the current time.
    pub async fn write_user_content(&self, user_id: &UserId, content: &str) -> Result<UserContentRecord, StorageError> {
        let record = UserContentRecord {
            user_id: user_id.as_str().to_owned(),
            content: Some(content.to_owned()),
            updated_at: chrono::Utc::now().timestamp_millis(),
        };
        self.store.put_item(record.clone()).await?;
        debug!(user_id = %user_id, updated_at = record.updated_at, "wrote user content");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> (ContentGateway, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ContentGateway::new(store.clone()), store)
    }

    #[tokio::test]
    async fn unknown_user_reads_none() {
        let (gw, _) = gateway();
        let got = gw.read_user_content(&UserId::verified("nobody")).await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn write_then_read_returns_content() {
        let (gw, _) = gateway();
        let user = UserId::verified("abc-123");
        let written = gw.write_user_content(&user, "hello").await.unwrap();
        assert!(written.updated_at > 0);

        let read = gw.read_user_content(&user).await.unwrap().unwrap();
        assert_eq!(read.user_id, "abc-123");
        assert_eq!(read.content.as_deref(), Some("hello"));
        assert_eq!(read, written);
    }

    #[tokio::test]
    async fn write_replaces_previous_record() {
        let (gw, store) = gateway();
        let user = UserId::verified("abc-123");
        let first = gw.write_user_content(&user, "one").await.unwrap();
        let second = gw.write_user_content(&user, "two").await.unwrap();
        assert!(second.updated_at >= first.updated_at);

        let read = gw.read_user_content(&user).await.unwrap().unwrap();
        assert_eq!(read.content.as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let (gw, store) = gateway();
        store.fail_requests(true);
        let user = UserId::verified("abc-123");
        assert!(matches!(
            gw.write_user_content(&user, "x").await,
            Err(StorageError::Backend { operation: "PutItem", .. })
        ));
        assert!(matches!(
            gw.read_user_content(&user).await,
            Err(StorageError::Backend { operation: "Query", .. })
        ));
    }

    #[test]
    fn record_uses_camel_case_field_names() {
        let record = UserContentRecord {
            user_id: "u".into(),
            content: None,
            updated_at: 42,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"userId": "u", "updatedAt": 42}));
    }
}
