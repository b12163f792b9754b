//! Renewal confirmation processing.
//!
//! Driven by confirmed-payment events from the billing side. Delivery is
//! at-least-once, so the handler is idempotent: each payment reference is
//! processed exactly once, and replays return the recorded outcome without
//! touching the membership again.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::MembershipConfig;
use crate::domain::foundation::{MembershipId, Timestamp};
use crate::domain::membership::{
    calculate_renewal_pricing, validate_renewal_eligibility, LifecycleEvent, LifecycleEventKind,
    Membership, MembershipError,
};
use crate::ports::{
    LifecycleEventLog, MembershipStore, NotificationKind, NotificationSender,
    ProcessedEventRecord, ProcessedEventStore, SaveResult,
};

/// Tolerance when comparing the paid amount to the quoted price.
const AMOUNT_EPSILON: f64 = 1e-6;

/// How many times a conflicted read-modify-write is retried.
const MAX_VERSION_RETRIES: u32 = 3;

/// Payment confirmation details from the billing provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDetails {
    pub amount: f64,
    pub currency: String,
    /// Unique reference from the provider; the idempotency key.
    pub payment_reference: String,
}

/// Result of processing a renewal confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum RenewalOutcome {
    /// This event extended the membership.
    Renewed(Membership),
    /// The same payment reference was already processed.
    AlreadyProcessed,
}

/// Processes confirmed renewal payments.
pub struct RenewMembershipHandler {
    store: Arc<dyn MembershipStore>,
    notifications: Arc<dyn NotificationSender>,
    event_log: Arc<dyn LifecycleEventLog>,
    processed_events: Arc<dyn ProcessedEventStore>,
    config: MembershipConfig,
}

impl RenewMembershipHandler {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        notifications: Arc<dyn NotificationSender>,
        event_log: Arc<dyn LifecycleEventLog>,
        processed_events: Arc<dyn ProcessedEventStore>,
        config: MembershipConfig,
    ) -> Self {
        Self {
            store,
            notifications,
            event_log,
            processed_events,
            config,
        }
    }

    /// Applies a confirmed renewal payment to a membership.
    ///
    /// Sequence: idempotency check, eligibility check, amount check
    /// against the snapshot-derived quote, extension with version-conflict
    /// retry, audit event, confirmation notification. The notification is
    /// best-effort; everything before it is not.
    pub async fn execute(
        &self,
        membership_id: &MembershipId,
        payment: &PaymentDetails,
        now: Timestamp,
    ) -> Result<RenewalOutcome, MembershipError> {
        let idempotency_key = format!("renewal:{}", payment.payment_reference);
        if self.processed_events.find(&idempotency_key).await?.is_some() {
            info!(
                membership_id = %membership_id,
                payment_reference = %payment.payment_reference,
                "duplicate renewal event ignored"
            );
            return Ok(RenewalOutcome::AlreadyProcessed);
        }

        let membership = self
            .store
            .find_by_id(membership_id)
            .await?
            .ok_or_else(|| MembershipError::not_found(membership_id.as_str()))?;

        let eligibility = validate_renewal_eligibility(&membership, now);
        if !eligibility.eligible {
            let reason = eligibility
                .reason
                .unwrap_or_else(|| "not eligible for renewal".to_string());
            return Err(MembershipError::renewal_failed(reason));
        }

        let pricing = calculate_renewal_pricing(&membership, &self.config.currency, now);
        if (payment.amount - pricing.final_price).abs() > AMOUNT_EPSILON {
            warn!(
                membership_id = %membership_id,
                expected = pricing.final_price,
                received = payment.amount,
                "renewal amount mismatch"
            );
            self.record_payment_failure(&membership, payment, pricing.final_price, now)
                .await;
            return Err(MembershipError::payment_failed(format!(
                "amount mismatch: expected {:.2}, received {:.2}",
                pricing.final_price, payment.amount
            )));
        }

        let Some(extended) = self
            .extend_with_retry(&idempotency_key, membership, self.config.duration_months, now)
            .await?
        else {
            info!(
                membership_id = %membership_id,
                payment_reference = %payment.payment_reference,
                "payment reference claimed by a concurrent delivery"
            );
            return Ok(RenewalOutcome::AlreadyProcessed);
        };

        // Claim the payment reference only once the extension is durable;
        // a lost race here means another delivery already did the work.
        let claimed = self
            .processed_events
            .save(ProcessedEventRecord {
                key: idempotency_key,
                outcome: "renewed".to_string(),
                processed_at: now,
            })
            .await?;
        if claimed == SaveResult::AlreadyExists {
            return Ok(RenewalOutcome::AlreadyProcessed);
        }

        self.append_audit(&extended, payment, now).await;

        if let Err(err) = self
            .notifications
            .send(
                NotificationKind::RenewalConfirmation,
                &extended,
                Some(json!({
                    "new_expiration_date": extended.expiration_date.to_string(),
                    "amount": payment.amount,
                    "currency": payment.currency,
                })),
            )
            .await
        {
            warn!(
                membership_id = %extended.id,
                error = %err,
                "renewal confirmation notification failed"
            );
        }

        info!(
            membership_id = %extended.id,
            new_expiration = %extended.expiration_date,
            "membership renewed"
        );
        Ok(RenewalOutcome::Renewed(extended))
    }

    /// Read-modify-write with a bounded retry on version conflicts.
    ///
    /// A conflict means someone else wrote the aggregate first. If that
    /// writer was another delivery of this same payment it will also have
    /// claimed the idempotency key, so the key is re-checked before the
    /// extension is applied to the fresh copy; `None` means the work is
    /// already done and the membership must not be extended again.
    async fn extend_with_retry(
        &self,
        idempotency_key: &str,
        mut membership: Membership,
        months: u32,
        now: Timestamp,
    ) -> Result<Option<Membership>, MembershipError> {
        let mut attempts = 0;
        loop {
            let mut candidate = membership.clone();
            candidate
                .extend(months, true, now)
                .map_err(|e| MembershipError::renewal_failed(e.message))?;

            match self.store.update(&candidate).await {
                Ok(updated) => return Ok(Some(updated)),
                Err(err @ MembershipError::VersionConflict { .. }) => {
                    attempts += 1;
                    if attempts >= MAX_VERSION_RETRIES {
                        return Err(err);
                    }
                    if self.processed_events.find(idempotency_key).await?.is_some() {
                        return Ok(None);
                    }
                    membership = self
                        .store
                        .find_by_id(&membership.id)
                        .await?
                        .ok_or_else(|| MembershipError::not_found(membership.id.as_str()))?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn append_audit(&self, membership: &Membership, payment: &PaymentDetails, now: Timestamp) {
        let event = LifecycleEvent::new(
            LifecycleEventKind::Renewal,
            membership.id.clone(),
            membership.customer_id.clone(),
            now,
            json!({
                "payment_reference": payment.payment_reference,
                "amount": payment.amount,
                "currency": payment.currency,
                "new_expiration_date": membership.expiration_date.to_string(),
            }),
        );
        if let Err(err) = self.event_log.append(event).await {
            warn!(membership_id = %membership.id, error = %err, "audit append failed");
        }
    }

    /// Records the mismatch for audit and alerts the customer, both
    /// best-effort; the membership itself is left untouched so a corrected
    /// payment can still go through.
    async fn record_payment_failure(
        &self,
        membership: &Membership,
        payment: &PaymentDetails,
        expected: f64,
        now: Timestamp,
    ) {
        let event = LifecycleEvent::new(
            LifecycleEventKind::PaymentFailed,
            membership.id.clone(),
            membership.customer_id.clone(),
            now,
            json!({
                "payment_reference": payment.payment_reference,
                "expected_amount": expected,
                "received_amount": payment.amount,
            }),
        );
        if let Err(err) = self.event_log.append(event).await {
            warn!(membership_id = %membership.id, error = %err, "audit append failed");
        }
        if let Err(err) = self
            .notifications
            .send(NotificationKind::PaymentFailure, membership, None)
            .await
        {
            warn!(
                membership_id = %membership.id,
                error = %err,
                "payment failure notification failed"
            );
        }
    }
}
