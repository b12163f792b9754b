//! In-memory lifecycle event log.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{MembershipId, Timestamp};
use crate::domain::membership::{LifecycleEvent, MembershipError};
use crate::ports::LifecycleEventLog;

/// Append-only event log backed by a `RwLock`ed vector.
#[derive(Debug, Default)]
pub struct InMemoryLifecycleEventLog {
    events: RwLock<Vec<LifecycleEvent>>,
}

impl InMemoryLifecycleEventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LifecycleEventLog for InMemoryLifecycleEventLog {
    async fn append(&self, event: LifecycleEvent) -> Result<(), MembershipError> {
        self.events.write().await.push(event);
        Ok(())
    }

    async fn events_for(
        &self,
        membership_id: &MembershipId,
    ) -> Result<Vec<LifecycleEvent>, MembershipError> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| &e.membership_id == membership_id)
            .cloned()
            .collect())
    }

    async fn events_since(&self, since: Timestamp) -> Result<Vec<LifecycleEvent>, MembershipError> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| !e.occurred_at.is_before(&since))
            .cloned()
            .collect())
    }
}
