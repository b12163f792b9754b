//! Checkout-time membership validation.
//!
//! The validator is the gate the storefront calls before applying member
//! pricing. It never fails the caller: every branch, including a store
//! outage, degrades to an invalid result with a reason message. Benefits
//! are only ever granted on a positive, provable check.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::foundation::{CustomerId, Timestamp};
use crate::domain::membership::{Membership, MembershipStatus, PaymentStatus};
use crate::ports::MembershipStore;

/// Outcome of validating one customer's membership.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Stored status, when a membership was found.
    pub status: Option<MembershipStatus>,
    pub expiration_date: Option<Timestamp>,
    pub days_until_expiration: Option<i64>,
    /// True when the membership exists but needs renewing to regain
    /// benefits.
    pub requires_renewal: bool,
    /// Human-readable reason, for storefront messaging.
    pub message: String,
}

impl ValidationResult {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            status: None,
            expiration_date: None,
            days_until_expiration: None,
            requires_renewal: false,
            message: message.into(),
        }
    }
}

/// Validates membership status in real time, repairing stale stored state.
pub struct ValidateMembershipHandler {
    store: Arc<dyn MembershipStore>,
}

impl ValidateMembershipHandler {
    pub fn new(store: Arc<dyn MembershipStore>) -> Self {
        Self { store }
    }

    /// Validates the customer's membership at `now`.
    ///
    /// Time-based truth wins over stored status: a stored `active`
    /// membership past its expiration date validates as expired, and the
    /// corrected status is written back best-effort (lazy repair; the
    /// expiration sweep will catch it otherwise).
    pub async fn execute(&self, customer_id: &CustomerId, now: Timestamp) -> ValidationResult {
        let membership = match self.store.find_by_customer_id(customer_id).await {
            Ok(Some(m)) => m,
            Ok(None) => {
                return ValidationResult::invalid("No membership found for this customer");
            }
            Err(err) => {
                warn!(customer_id = %customer_id, error = %err, "membership lookup failed");
                return ValidationResult::invalid("Error validating membership");
            }
        };

        let days = membership.days_until_expiration(now);
        let base = ValidationResult {
            is_valid: false,
            status: Some(membership.status),
            expiration_date: Some(membership.expiration_date),
            days_until_expiration: Some(days),
            requires_renewal: false,
            message: String::new(),
        };

        match membership.status {
            MembershipStatus::Cancelled => ValidationResult {
                message: "Membership has been cancelled".to_string(),
                ..base
            },
            MembershipStatus::Pending => ValidationResult {
                message: "Membership is awaiting payment confirmation".to_string(),
                ..base
            },
            MembershipStatus::Expired => ValidationResult {
                requires_renewal: true,
                message: "Membership has expired".to_string(),
                ..base
            },
            MembershipStatus::Active if membership.is_expired(now) => {
                self.repair_expired(membership, now).await;
                ValidationResult {
                    status: Some(MembershipStatus::Expired),
                    requires_renewal: true,
                    message: "Membership has expired".to_string(),
                    ..base
                }
            }
            MembershipStatus::Active if membership.payment_status != PaymentStatus::Paid => {
                ValidationResult {
                    message: "Membership payment is not confirmed".to_string(),
                    ..base
                }
            }
            MembershipStatus::Active => ValidationResult {
                is_valid: true,
                message: format!("Membership active, {} days remaining", days),
                ..base
            },
        }
    }

    /// Validates many customers at once, one independent result each.
    ///
    /// All-settled: a failed lookup yields an invalid result for that
    /// customer and never aborts the rest of the batch.
    pub async fn batch_validate(
        &self,
        customer_ids: &[CustomerId],
        now: Timestamp,
    ) -> HashMap<CustomerId, ValidationResult> {
        let futures = customer_ids
            .iter()
            .map(|id| async move { (id.clone(), self.execute(id, now).await) });
        join_all(futures).await.into_iter().collect()
    }

    /// Writes back `status=expired` for a membership whose stored status
    /// drifted. Best-effort; a version conflict just means someone else
    /// already corrected it.
    async fn repair_expired(&self, mut membership: Membership, now: Timestamp) {
        if membership.expire(now).is_err() {
            return;
        }
        match self.store.update(&membership).await {
            Ok(_) => debug!(membership_id = %membership.id, "lazy-repaired stale active status"),
            Err(err) => {
                debug!(membership_id = %membership.id, error = %err, "lazy repair skipped")
            }
        }
    }
}
