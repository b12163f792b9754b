//! Admin cancellation.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::foundation::{MembershipId, Timestamp};
use crate::domain::membership::{
    LifecycleEvent, LifecycleEventKind, Membership, MembershipError,
};
use crate::ports::{LifecycleEventLog, MembershipStore};

/// Cancels a membership by admin authority.
///
/// Works on any non-cancelled membership regardless of payment or
/// expiration state; only an already-cancelled membership is rejected.
pub struct AdminCancelMembershipHandler {
    store: Arc<dyn MembershipStore>,
    event_log: Arc<dyn LifecycleEventLog>,
}

impl AdminCancelMembershipHandler {
    pub fn new(store: Arc<dyn MembershipStore>, event_log: Arc<dyn LifecycleEventLog>) -> Self {
        Self { store, event_log }
    }

    pub async fn execute(
        &self,
        membership_id: &MembershipId,
        reason: &str,
        now: Timestamp,
    ) -> Result<Membership, MembershipError> {
        if reason.trim().is_empty() {
            return Err(MembershipError::validation(
                "reason",
                "a reason is required for cancellations",
            ));
        }

        let mut membership = self
            .store
            .find_by_id(membership_id)
            .await?
            .ok_or_else(|| MembershipError::not_found(membership_id.as_str()))?;

        membership
            .cancel(now)
            .map_err(|e| MembershipError::cancellation_failed(e.message))?;
        let updated = self.store.update(&membership).await?;

        let event = LifecycleEvent::new(
            LifecycleEventKind::Cancellation,
            updated.id.clone(),
            updated.customer_id.clone(),
            now,
            json!({"source": "admin", "reason": reason}),
        );
        if let Err(err) = self.event_log.append(event).await {
            warn!(membership_id = %updated.id, error = %err, "audit append failed");
        }

        info!(membership_id = %updated.id, "membership cancelled by admin");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryLifecycleEventLog, InMemoryMembershipStore};
    use crate::domain::foundation::CustomerId;
    use crate::domain::membership::{BenefitsSnapshot, MembershipStatus};

    async fn seed(store: &InMemoryMembershipStore, now: Timestamp) -> Membership {
        let mut m = Membership::create(
            CustomerId::new("cust-1").unwrap(),
            BenefitsSnapshot::capture(0.15, true, 199.0),
            12,
            now,
        );
        m.confirm_payment(now).unwrap();
        store.insert(&m).await.unwrap();
        m
    }

    #[tokio::test]
    async fn cancels_and_records_audit() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let event_log = Arc::new(InMemoryLifecycleEventLog::new());
        let now = Timestamp::now();
        let m = seed(&store, now).await;
        let handler = AdminCancelMembershipHandler::new(store.clone(), event_log.clone());

        let updated = handler
            .execute(&m.id, "fraudulent purchase", now)
            .await
            .unwrap();

        assert_eq!(updated.status, MembershipStatus::Cancelled);
        let events = event_log.events_for(&m.id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, LifecycleEventKind::Cancellation);
        assert_eq!(events[0].metadata["reason"], "fraudulent purchase");
    }

    #[tokio::test]
    async fn cancelling_pending_membership_works() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let now = Timestamp::now();
        let m = Membership::create(
            CustomerId::new("cust-1").unwrap(),
            BenefitsSnapshot::capture(0.15, true, 199.0),
            12,
            now,
        );
        store.insert(&m).await.unwrap();
        let handler = AdminCancelMembershipHandler::new(
            store,
            Arc::new(InMemoryLifecycleEventLog::new()),
        );

        let updated = handler.execute(&m.id, "never paid", now).await.unwrap();
        assert_eq!(updated.status, MembershipStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancelling_twice_fails() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let now = Timestamp::now();
        let m = seed(&store, now).await;
        let handler = AdminCancelMembershipHandler::new(
            store,
            Arc::new(InMemoryLifecycleEventLog::new()),
        );

        handler.execute(&m.id, "reason", now).await.unwrap();
        let err = handler.execute(&m.id, "reason", now).await.unwrap_err();
        assert!(matches!(err, MembershipError::CancellationFailed { .. }));
    }

    #[tokio::test]
    async fn requires_reason() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let now = Timestamp::now();
        let m = seed(&store, now).await;
        let handler = AdminCancelMembershipHandler::new(
            store,
            Arc::new(InMemoryLifecycleEventLog::new()),
        );

        let err = handler.execute(&m.id, "", now).await.unwrap_err();
        assert!(matches!(err, MembershipError::Validation { .. }));
    }
}
