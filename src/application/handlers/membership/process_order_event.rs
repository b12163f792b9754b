//! Storefront order-event ingestion.
//!
//! Orders arrive via webhook, at-least-once and possibly duplicated. Each
//! order id is processed once; membership-related line items either create
//! a membership, renew an existing one, or (for refunds and cancellations)
//! invoke the configured refund policy.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{MembershipConfig, RefundPolicy};
use crate::domain::foundation::{CustomerId, Timestamp};
use crate::domain::membership::{
    BenefitsSnapshot, FinancialStatus, LifecycleEvent, LifecycleEventKind, LineItemClassifier,
    LineItemKind, Membership, MembershipError, OrderEvent,
};
use crate::ports::{
    LifecycleEventLog, MembershipStore, NotificationKind, NotificationSender,
    ProcessedEventRecord, ProcessedEventStore, SaveResult,
};

/// What processing an order event did.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    /// A new membership was created and activated.
    Created(Membership),
    /// An existing membership was extended.
    Renewed(Membership),
    /// A refunded/cancelled order was handled per the refund policy.
    RefundHandled,
    /// No membership-related line items.
    Ignored,
    /// This order id was already processed.
    AlreadyProcessed,
}

/// Handles inbound storefront order events.
pub struct ProcessOrderEventHandler {
    store: Arc<dyn MembershipStore>,
    notifications: Arc<dyn NotificationSender>,
    event_log: Arc<dyn LifecycleEventLog>,
    processed_events: Arc<dyn ProcessedEventStore>,
    classifier: Arc<dyn LineItemClassifier>,
    config: MembershipConfig,
}

impl ProcessOrderEventHandler {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        notifications: Arc<dyn NotificationSender>,
        event_log: Arc<dyn LifecycleEventLog>,
        processed_events: Arc<dyn ProcessedEventStore>,
        classifier: Arc<dyn LineItemClassifier>,
        config: MembershipConfig,
    ) -> Self {
        Self {
            store,
            notifications,
            event_log,
            processed_events,
            classifier,
            config,
        }
    }

    pub async fn execute(
        &self,
        event: &OrderEvent,
        now: Timestamp,
    ) -> Result<OrderOutcome, MembershipError> {
        let kind = event.classify(self.classifier.as_ref());
        if kind == LineItemKind::Unrelated {
            return Ok(OrderOutcome::Ignored);
        }

        let idempotency_key = format!("order:{}", event.order_id);
        if self.processed_events.find(&idempotency_key).await?.is_some() {
            info!(order_id = %event.order_id, "duplicate order event ignored");
            return Ok(OrderOutcome::AlreadyProcessed);
        }

        let customer_id = CustomerId::new(event.customer_id.clone())
            .map_err(|e| MembershipError::invalid_customer(e.to_string()))?;

        // The line-item label is advisory: storefronts do not always use
        // the renewal product for returning members, and renewal-labelled
        // orders arrive from customers with no membership on record. What
        // the customer already has decides create-vs-extend, not the label.
        let outcome = match event.financial_status {
            FinancialStatus::Paid => {
                match self.store.find_by_customer_id(&customer_id).await? {
                    Some(membership) => self.extend_existing(membership, now).await?,
                    None => self.create_new(&customer_id, now).await?,
                }
            }
            FinancialStatus::Refunded | FinancialStatus::Cancelled => {
                self.handle_refund(&customer_id, event, now).await?
            }
        };

        let outcome_label = match &outcome {
            OrderOutcome::Created(_) => "created",
            OrderOutcome::Renewed(_) => "renewed",
            OrderOutcome::RefundHandled => "refund_handled",
            OrderOutcome::Ignored => "ignored",
            OrderOutcome::AlreadyProcessed => "already_processed",
        };
        let claimed = self
            .processed_events
            .save(ProcessedEventRecord {
                key: idempotency_key,
                outcome: outcome_label.to_string(),
                processed_at: now,
            })
            .await?;
        if claimed == SaveResult::AlreadyExists {
            return Ok(OrderOutcome::AlreadyProcessed);
        }
        Ok(outcome)
    }

    async fn create_new(
        &self,
        customer_id: &CustomerId,
        now: Timestamp,
    ) -> Result<OrderOutcome, MembershipError> {
        let benefits = BenefitsSnapshot::capture(
            self.config.service_discount_fraction,
            self.config.free_delivery,
            self.config.annual_fee,
        );
        let mut membership = Membership::create(
            customer_id.clone(),
            benefits,
            self.config.duration_months,
            now,
        );
        membership
            .confirm_payment(now)
            .map_err(|e| MembershipError::store(e.message))?;
        self.store.insert(&membership).await?;

        info!(
            membership_id = %membership.id,
            customer_id = %customer_id,
            "membership created from order"
        );
        if let Err(err) = self
            .notifications
            .send(NotificationKind::Welcome, &membership, None)
            .await
        {
            warn!(membership_id = %membership.id, error = %err, "welcome notification failed");
        }
        Ok(OrderOutcome::Created(membership))
    }

    async fn extend_existing(
        &self,
        mut membership: Membership,
        now: Timestamp,
    ) -> Result<OrderOutcome, MembershipError> {
        membership
            .extend(self.config.duration_months, true, now)
            .map_err(|e| MembershipError::renewal_failed(e.message))?;
        let updated = self.store.update(&membership).await?;

        self.append_audit(
            LifecycleEventKind::Renewal,
            &updated,
            json!({"source": "order_event"}),
            now,
        )
        .await;
        if let Err(err) = self
            .notifications
            .send(NotificationKind::RenewalConfirmation, &updated, None)
            .await
        {
            warn!(
                membership_id = %updated.id,
                error = %err,
                "renewal confirmation notification failed"
            );
        }
        Ok(OrderOutcome::Renewed(updated))
    }

    async fn handle_refund(
        &self,
        customer_id: &CustomerId,
        event: &OrderEvent,
        now: Timestamp,
    ) -> Result<OrderOutcome, MembershipError> {
        let Some(mut membership) = self.store.find_by_customer_id(customer_id).await? else {
            warn!(
                order_id = %event.order_id,
                customer_id = %customer_id,
                "refund for unknown membership, nothing to do"
            );
            return Ok(OrderOutcome::RefundHandled);
        };

        membership.mark_refunded(now);
        match self.config.refund_policy {
            RefundPolicy::LogOnly => {
                info!(
                    membership_id = %membership.id,
                    order_id = %event.order_id,
                    "membership order refunded, leaving status unchanged"
                );
                self.store.update(&membership).await?;
            }
            RefundPolicy::FlagForReview => {
                let updated = self.store.update(&membership).await?;
                self.append_audit(
                    LifecycleEventKind::PaymentFailed,
                    &updated,
                    json!({
                        "order_id": event.order_id,
                        "action": "flagged_for_review",
                    }),
                    now,
                )
                .await;
            }
            RefundPolicy::AutoCancel => {
                membership
                    .cancel(now)
                    .map_err(|e| MembershipError::cancellation_failed(e.message))?;
                let updated = self.store.update(&membership).await?;
                self.append_audit(
                    LifecycleEventKind::Cancellation,
                    &updated,
                    json!({
                        "order_id": event.order_id,
                        "reason": "order refunded",
                    }),
                    now,
                )
                .await;
            }
        }
        Ok(OrderOutcome::RefundHandled)
    }

    async fn append_audit(
        &self,
        kind: LifecycleEventKind,
        membership: &Membership,
        metadata: serde_json::Value,
        now: Timestamp,
    ) {
        let event = LifecycleEvent::new(
            kind,
            membership.id.clone(),
            membership.customer_id.clone(),
            now,
            metadata,
        );
        if let Err(err) = self.event_log.append(event).await {
            warn!(membership_id = %membership.id, error = %err, "audit append failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryLifecycleEventLog, InMemoryMembershipStore, InMemoryProcessedEventStore,
        RecordingNotificationSender,
    };
    use crate::domain::membership::{KeywordClassifier, LineItem, MembershipStatus, PaymentStatus};

    struct Fixture {
        handler: ProcessOrderEventHandler,
        store: Arc<InMemoryMembershipStore>,
        event_log: Arc<InMemoryLifecycleEventLog>,
    }

    fn fixture_with_policy(policy: RefundPolicy) -> Fixture {
        let store = Arc::new(InMemoryMembershipStore::new());
        let event_log = Arc::new(InMemoryLifecycleEventLog::new());
        let handler = ProcessOrderEventHandler::new(
            store.clone(),
            Arc::new(RecordingNotificationSender::new()),
            event_log.clone(),
            Arc::new(InMemoryProcessedEventStore::new()),
            Arc::new(KeywordClassifier::new()),
            MembershipConfig {
                refund_policy: policy,
                ..Default::default()
            },
        );
        Fixture {
            handler,
            store,
            event_log,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_policy(RefundPolicy::LogOnly)
    }

    fn order(order_id: &str, customer: &str, title: &str, status: FinancialStatus) -> OrderEvent {
        OrderEvent {
            order_id: order_id.to_string(),
            customer_id: customer.to_string(),
            line_items: vec![LineItem {
                title: title.to_string(),
                sku: None,
                quantity: 1,
                price: 199.0,
            }],
            financial_status: status,
            occurred_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn paid_membership_order_creates_active_membership() {
        let f = fixture();
        let now = Timestamp::now();

        let outcome = f
            .handler
            .execute(
                &order("o1", "cust-1", "ATP Annual Membership", FinancialStatus::Paid),
                now,
            )
            .await
            .unwrap();

        match outcome {
            OrderOutcome::Created(m) => {
                assert_eq!(m.status, MembershipStatus::Active);
                assert_eq!(m.payment_status, PaymentStatus::Paid);
            }
            other => panic!("expected Created, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn renewal_order_extends_existing_membership() {
        let f = fixture();
        let now = Timestamp::now();
        f.handler
            .execute(
                &order("o1", "cust-1", "ATP Membership", FinancialStatus::Paid),
                now,
            )
            .await
            .unwrap();
        let original = f
            .store
            .find_by_customer_id(&CustomerId::new("cust-1").unwrap())
            .await
            .unwrap()
            .unwrap();

        let outcome = f
            .handler
            .execute(
                &order("o2", "cust-1", "Membership Renewal", FinancialStatus::Paid),
                now,
            )
            .await
            .unwrap();

        match outcome {
            OrderOutcome::Renewed(m) => {
                assert_eq!(m.expiration_date, original.expiration_date.add_months(12));
            }
            other => panic!("expected Renewed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn membership_order_for_existing_customer_extends() {
        let f = fixture();
        let now = Timestamp::now();
        f.handler
            .execute(
                &order("o1", "cust-1", "ATP Annual Membership", FinancialStatus::Paid),
                now,
            )
            .await
            .unwrap();
        let original = f
            .store
            .find_by_customer_id(&CustomerId::new("cust-1").unwrap())
            .await
            .unwrap()
            .unwrap();

        // Second paid order uses the new-membership product, not the
        // renewal one; it still extends rather than failing the insert.
        let outcome = f
            .handler
            .execute(
                &order("o2", "cust-1", "ATP Annual Membership", FinancialStatus::Paid),
                now,
            )
            .await
            .unwrap();

        match outcome {
            OrderOutcome::Renewed(m) => {
                assert_eq!(m.expiration_date, original.expiration_date.add_months(12));
            }
            other => panic!("expected Renewed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn renewal_order_without_membership_creates_one() {
        let f = fixture();
        let now = Timestamp::now();

        let outcome = f
            .handler
            .execute(
                &order("o1", "cust-1", "Membership Renewal", FinancialStatus::Paid),
                now,
            )
            .await
            .unwrap();
        assert!(matches!(outcome, OrderOutcome::Created(_)));
    }

    #[tokio::test]
    async fn duplicate_order_id_is_ignored() {
        let f = fixture();
        let now = Timestamp::now();
        let event = order("o1", "cust-1", "Membership Renewal", FinancialStatus::Paid);

        f.handler.execute(&event, now).await.unwrap();
        let membership = f
            .store
            .find_by_customer_id(&CustomerId::new("cust-1").unwrap())
            .await
            .unwrap()
            .unwrap();

        let second = f.handler.execute(&event, now).await.unwrap();
        assert_eq!(second, OrderOutcome::AlreadyProcessed);

        let after = f
            .store
            .find_by_customer_id(&CustomerId::new("cust-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.expiration_date, membership.expiration_date);
    }

    #[tokio::test]
    async fn unrelated_order_is_ignored_without_idempotency_record() {
        let f = fixture();
        let now = Timestamp::now();

        let outcome = f
            .handler
            .execute(
                &order("o1", "cust-1", "Brake pads", FinancialStatus::Paid),
                now,
            )
            .await
            .unwrap();
        assert_eq!(outcome, OrderOutcome::Ignored);
    }

    #[tokio::test]
    async fn refund_with_log_only_policy_keeps_status() {
        let f = fixture();
        let now = Timestamp::now();
        f.handler
            .execute(
                &order("o1", "cust-1", "ATP Membership", FinancialStatus::Paid),
                now,
            )
            .await
            .unwrap();

        let outcome = f
            .handler
            .execute(
                &order("o2", "cust-1", "ATP Membership", FinancialStatus::Refunded),
                now,
            )
            .await
            .unwrap();
        assert_eq!(outcome, OrderOutcome::RefundHandled);

        let stored = f
            .store
            .find_by_customer_id(&CustomerId::new("cust-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, MembershipStatus::Active);
        assert_eq!(stored.payment_status, PaymentStatus::Refunded);
        assert!(!stored.is_active(now));
    }

    #[tokio::test]
    async fn refund_with_auto_cancel_policy_cancels() {
        let f = fixture_with_policy(RefundPolicy::AutoCancel);
        let now = Timestamp::now();
        f.handler
            .execute(
                &order("o1", "cust-1", "ATP Membership", FinancialStatus::Paid),
                now,
            )
            .await
            .unwrap();

        f.handler
            .execute(
                &order("o2", "cust-1", "ATP Membership", FinancialStatus::Refunded),
                now,
            )
            .await
            .unwrap();

        let stored = f
            .store
            .find_by_customer_id(&CustomerId::new("cust-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, MembershipStatus::Cancelled);

        let events = f.event_log.events_for(&stored.id).await.unwrap();
        assert!(events
            .iter()
            .any(|e| e.kind == LifecycleEventKind::Cancellation));
    }

    #[tokio::test]
    async fn refund_with_flag_policy_appends_review_event() {
        let f = fixture_with_policy(RefundPolicy::FlagForReview);
        let now = Timestamp::now();
        f.handler
            .execute(
                &order("o1", "cust-1", "ATP Membership", FinancialStatus::Paid),
                now,
            )
            .await
            .unwrap();

        f.handler
            .execute(
                &order("o2", "cust-1", "ATP Membership", FinancialStatus::Refunded),
                now,
            )
            .await
            .unwrap();

        let stored = f
            .store
            .find_by_customer_id(&CustomerId::new("cust-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, MembershipStatus::Active);
        let events = f.event_log.events_for(&stored.id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metadata["action"], "flagged_for_review");
    }
}
