//! Create membership use case.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::MembershipConfig;
use crate::domain::foundation::{CustomerId, Timestamp};
use crate::domain::membership::{BenefitsSnapshot, Membership, MembershipError};
use crate::ports::{MembershipStore, NotificationKind, NotificationSender};

/// Creates memberships, enforcing one per customer.
pub struct CreateMembershipHandler {
    store: Arc<dyn MembershipStore>,
    notifications: Arc<dyn NotificationSender>,
    config: MembershipConfig,
}

impl CreateMembershipHandler {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        notifications: Arc<dyn NotificationSender>,
        config: MembershipConfig,
    ) -> Self {
        Self {
            store,
            notifications,
            config,
        }
    }

    /// Creates a membership for the customer with a fresh benefits snapshot.
    ///
    /// When `payment_confirmed` is true the membership activates
    /// immediately; otherwise it stays pending until a payment event
    /// arrives. The welcome notification is best-effort.
    pub async fn execute(
        &self,
        customer_id: CustomerId,
        payment_confirmed: bool,
        now: Timestamp,
    ) -> Result<Membership, MembershipError> {
        if let Some(existing) = self.store.find_by_customer_id(&customer_id).await? {
            warn!(
                customer_id = %customer_id,
                membership_id = %existing.id,
                "create rejected, customer already has a membership"
            );
            return Err(MembershipError::already_exists(customer_id.as_str()));
        }

        let benefits = BenefitsSnapshot::capture(
            self.config.service_discount_fraction,
            self.config.free_delivery,
            self.config.annual_fee,
        );
        let mut membership =
            Membership::create(customer_id, benefits, self.config.duration_months, now);
        if payment_confirmed {
            membership
                .confirm_payment(now)
                .map_err(|e| MembershipError::store(e.message))?;
        }

        self.store.insert(&membership).await?;
        info!(
            membership_id = %membership.id,
            customer_id = %membership.customer_id,
            status = membership.status.label(),
            "membership created"
        );

        if let Err(err) = self
            .notifications
            .send(NotificationKind::Welcome, &membership, None)
            .await
        {
            warn!(membership_id = %membership.id, error = %err, "welcome notification failed");
        }

        Ok(membership)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryMembershipStore, RecordingNotificationSender};
    use crate::domain::membership::{MembershipStatus, PaymentStatus};

    fn handler() -> (
        CreateMembershipHandler,
        Arc<InMemoryMembershipStore>,
        Arc<RecordingNotificationSender>,
    ) {
        let store = Arc::new(InMemoryMembershipStore::new());
        let notifications = Arc::new(RecordingNotificationSender::new());
        let handler = CreateMembershipHandler::new(
            store.clone(),
            notifications.clone(),
            MembershipConfig::default(),
        );
        (handler, store, notifications)
    }

    #[tokio::test]
    async fn creates_paid_membership_as_active() {
        let (handler, _, notifications) = handler();
        let now = Timestamp::now();

        let membership = handler
            .execute(CustomerId::new("cust-1").unwrap(), true, now)
            .await
            .unwrap();

        assert_eq!(membership.status, MembershipStatus::Active);
        assert_eq!(membership.payment_status, PaymentStatus::Paid);
        assert_eq!(membership.expiration_date, now.add_months(12));
        assert_eq!(notifications.count_of(NotificationKind::Welcome).await, 1);
    }

    #[tokio::test]
    async fn creates_unpaid_membership_as_pending() {
        let (handler, _, _) = handler();
        let now = Timestamp::now();

        let membership = handler
            .execute(CustomerId::new("cust-1").unwrap(), false, now)
            .await
            .unwrap();

        assert_eq!(membership.status, MembershipStatus::Pending);
        assert!(!membership.is_active(now));
    }

    #[tokio::test]
    async fn distinct_customers_get_distinct_ids() {
        let (handler, _, _) = handler();
        let now = Timestamp::now();

        let a = handler
            .execute(CustomerId::new("cust-1").unwrap(), true, now)
            .await
            .unwrap();
        let b = handler
            .execute(CustomerId::new("cust-2").unwrap(), true, now)
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert!(a.id.as_str().starts_with("mem_"));
        assert!(b.id.as_str().starts_with("mem_"));
    }

    #[tokio::test]
    async fn rejects_second_membership_for_same_customer() {
        let (handler, _, _) = handler();
        let now = Timestamp::now();
        let customer = CustomerId::new("cust-1").unwrap();

        handler.execute(customer.clone(), true, now).await.unwrap();
        let err = handler.execute(customer, true, now).await.unwrap_err();

        assert!(matches!(err, MembershipError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn snapshot_captures_config_at_creation() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let notifications = Arc::new(RecordingNotificationSender::new());
        let config = MembershipConfig {
            annual_fee: 249.0,
            service_discount_fraction: 0.2,
            free_delivery: false,
            ..Default::default()
        };
        let handler = CreateMembershipHandler::new(store, notifications, config);
        let now = Timestamp::now();

        let membership = handler
            .execute(CustomerId::new("cust-1").unwrap(), true, now)
            .await
            .unwrap();

        assert_eq!(membership.benefits.annual_fee, 249.0);
        assert_eq!(membership.benefits.service_discount_fraction, 0.2);
        assert!(!membership.benefits.free_delivery);
    }
}
