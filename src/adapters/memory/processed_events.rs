//! In-memory processed-event store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::membership::MembershipError;
use crate::ports::{ProcessedEventRecord, ProcessedEventStore, SaveResult};

/// First-write-wins idempotency store backed by a `RwLock`ed map.
#[derive(Debug, Default)]
pub struct InMemoryProcessedEventStore {
    records: RwLock<HashMap<String, ProcessedEventRecord>>,
}

impl InMemoryProcessedEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProcessedEventStore for InMemoryProcessedEventStore {
    async fn find(&self, key: &str) -> Result<Option<ProcessedEventRecord>, MembershipError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn save(&self, record: ProcessedEventRecord) -> Result<SaveResult, MembershipError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.key) {
            return Ok(SaveResult::AlreadyExists);
        }
        records.insert(record.key.clone(), record);
        Ok(SaveResult::Inserted)
    }
}
