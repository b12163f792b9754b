//! Port for idempotency tracking of external events.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::membership::MembershipError;

/// Record of an already-processed external event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedEventRecord {
    /// Idempotency key: order id, payment reference, or webhook event id.
    pub key: String,
    /// Short description of what processing did, for diagnostics.
    pub outcome: String,
    pub processed_at: Timestamp,
}

/// Result of attempting to record an event as processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// This call recorded the event; the caller owns its side effects.
    Inserted,
    /// Another call already recorded it; the caller must skip side effects.
    AlreadyExists,
}

/// First-write-wins store of processed external events.
///
/// Handlers check before processing and save after; `save` resolving races
/// to a single `Inserted` is what makes duplicate webhook deliveries safe.
#[async_trait]
pub trait ProcessedEventStore: Send + Sync {
    async fn find(&self, key: &str) -> Result<Option<ProcessedEventRecord>, MembershipError>;

    /// Saves a record unless the key is already present.
    async fn save(&self, record: ProcessedEventRecord) -> Result<SaveResult, MembershipError>;
}
