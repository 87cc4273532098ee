//! In-process partition store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{PartitionStore, UserContentRecord};
use crate::error::StorageError;

/// A [`PartitionStore`] kept in a concurrent map, one record per key.
///
/// Used for `STORE_BACKEND=memory` local runs and as the test double for the
/// gateway and handler. [`fail_requests`](Self::fail_requests) makes every
/// call return a backend error, and [`calls`](Self::calls) counts how many
/// primitives were issued.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: DashMap<String, UserContentRecord>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_requests(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `query_partition` + `put_item` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn begin(&self, operation: &'static str) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Backend {
                operation,
                message: "memory store is unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PartitionStore for MemoryStore {
    async fn query_partition(&self, partition_key: &str) -> Result<Vec<UserContentRecord>, StorageError> {
        self.begin("Query")?;
        Ok(self.items
            .get(partition_key)
            .map(|r| vec![r.value().clone()])
            .unwrap_or_default())
    }

    async fn put_item(&self, record: UserContentRecord) -> Result<(), StorageError> {
        self.begin("PutItem")?;
        self.items.insert(record.user_id.clone(), record);
        Ok(())
    }
}
