//! [`PartitionStore`] over DynamoDB.
//!
//! The table has a single string partition key, `userId`, and no sort key.
//! Reads are a `Query` on that key; writes are an unconditional `PutItem`.
//! Items are converted with `serde_dynamo`, so `updatedAt` lands as a number
//! attribute.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_dynamo::aws_sdk_dynamodb_1::{from_items, to_item};
use tracing::{error, info};

use super::{PartitionStore, UserContentRecord};
use crate::error::StorageError;

const PARTITION_KEY: &str = "userId";

/// DynamoDB-backed partition store bound to one table.
#[derive(Clone, Debug)]
pub struct DynamoStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self { client, table_name: table_name.into() }
    }

    /// Builds a client from the default AWS provider chain.
    ///
    /// `endpoint` overrides the service URL (DynamoDB Local). SDK retries are
    /// switched off: each request makes at most one storage attempt.
    pub async fn connect(table_name: impl Into<String>, endpoint: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::disabled());
        if let Some(url) = endpoint {
            loader = loader.endpoint_url(url);
        }
        let config = loader.load().await;
        let store = Self::new(aws_sdk_dynamodb::Client::new(&config), table_name);
        info!(table = %store.table_name, endpoint = endpoint.unwrap_or("default"), "dynamodb store ready");
        store
    }
}

#[async_trait]
impl PartitionStore for DynamoStore {
    async fn query_partition(&self, partition_key: &str) -> Result<Vec<UserContentRecord>, StorageError> {
        let output = self.client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression(format!("{PARTITION_KEY} = :userId"))
            .expression_attribute_values(":userId", AttributeValue::S(partition_key.to_owned()))
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!(table = %self.table_name, "query failed: {message}");
                StorageError::Backend { operation: "Query", message }
            })?;

        from_items(output.items.unwrap_or_default()).map_err(|e| StorageError::Decode {
            partition_key: partition_key.to_owned(),
            message: e.to_string(),
        })
    }

    async fn put_item(&self, record: UserContentRecord) -> Result<(), StorageError> {
        let item: HashMap<String, AttributeValue> =
            to_item(&record).map_err(|e| StorageError::Encode(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!(table = %self.table_name, "put_item failed: {message}");
                StorageError::Backend { operation: "PutItem", message }
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_encodes_to_dynamo_item() {
        let record = UserContentRecord {
            user_id: "abc-123".into(),
            content: Some("hello".into()),
            updated_at: 1_700_000_000_000,
        };
        let item: HashMap<String, AttributeValue> = to_item(&record).unwrap();
        assert_eq!(item["userId"], AttributeValue::S("abc-123".into()));
        assert_eq!(item["content"], AttributeValue::S("hello".into()));
        assert_eq!(item["updatedAt"], AttributeValue::N("1700000000000".into()));
    }

    #[test]
    fn item_without_content_decodes() {
        let mut item = HashMap::new();
        item.insert("userId".to_owned(), AttributeValue::S("abc-123".into()));
        item.insert("updatedAt".to_owned(), AttributeValue::N("5".into()));
        let records: Vec<UserContentRecord> = from_items(vec![item]).unwrap();
        assert_eq!(records[0].user_id, "abc-123");
        assert_eq!(records[0].content, None);
        assert_eq!(records[0].updated_at, 5);
    }
}
