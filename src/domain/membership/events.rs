//! Append-only lifecycle audit events.
//!
//! Events record what happened to a membership and when, for reporting and
//! audit only. Current state always lives on the aggregate; the event log
//! is never replayed to derive it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{CustomerId, EventId, MembershipId, Timestamp};

/// Kind of lifecycle transition being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEventKind {
    Expiration,
    Renewal,
    Cancellation,
    PaymentFailed,
}

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub id: EventId,
    pub kind: LifecycleEventKind,
    pub membership_id: MembershipId,
    pub customer_id: CustomerId,
    pub occurred_at: Timestamp,
    /// Free-form context (reasons, payment references, admin actor).
    pub metadata: Value,
}

impl LifecycleEvent {
    pub fn new(
        kind: LifecycleEventKind,
        membership_id: MembershipId,
        customer_id: CustomerId,
        occurred_at: Timestamp,
        metadata: Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            kind,
            membership_id,
            customer_id,
            occurred_at,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_carry_distinct_ids() {
        let now = Timestamp::now();
        let membership_id = MembershipId::generate(&now);
        let customer_id = CustomerId::new("cust-1").unwrap();

        let a = LifecycleEvent::new(
            LifecycleEventKind::Renewal,
            membership_id.clone(),
            customer_id.clone(),
            now,
            json!({}),
        );
        let b = LifecycleEvent::new(
            LifecycleEventKind::Renewal,
            membership_id,
            customer_id,
            now,
            json!({}),
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn kind_serializes_to_snake_case() {
        let json = serde_json::to_string(&LifecycleEventKind::PaymentFailed).unwrap();
        assert_eq!(json, "\"payment_failed\"");
    }

    #[test]
    fn metadata_round_trips() {
        let now = Timestamp::now();
        let event = LifecycleEvent::new(
            LifecycleEventKind::Cancellation,
            MembershipId::generate(&now),
            CustomerId::new("cust-1").unwrap(),
            now,
            json!({"reason": "customer request", "actor": "admin"}),
        );
        assert_eq!(event.metadata["reason"], "customer request");
    }
}
