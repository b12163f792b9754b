//! Membership aggregate entity.
//!
//! The Membership aggregate represents a customer's paid, time-bounded
//! access to service discounts and free delivery. Each customer has at most
//! one membership.
//!
//! # Invariants
//!
//! - `id` is globally unique and immutable after creation
//! - `customer_id` is unique (one membership per customer)
//! - Status transitions follow the state machine in [`MembershipStatus`]
//! - `expiration_date` is `start_date` + the cycle length at creation, and
//!   `max(expiration_date, now)` + the cycle length after each renewal
//! - Benefits are a snapshot; they are never re-read from live config
//! - `version` is an optimistic-concurrency token owned by the store

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode, MembershipId, Timestamp};
use serde::{Deserialize, Serialize};

use super::{BenefitsSnapshot, MembershipStatus, PaymentStatus};

/// Membership aggregate - a customer's annual ATP membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    /// Unique identifier for this membership.
    pub id: MembershipId,

    /// Customer who owns this membership.
    pub customer_id: CustomerId,

    /// Current lifecycle status.
    pub status: MembershipStatus,

    /// Outcome of the most recent payment.
    pub payment_status: PaymentStatus,

    /// Start of the current membership cycle.
    pub start_date: Timestamp,

    /// End of the current membership cycle.
    pub expiration_date: Timestamp,

    /// External billing-subscription reference, if any.
    pub subscription_id: Option<String>,

    /// Benefit terms captured at creation/renewal time.
    pub benefits: BenefitsSnapshot,

    /// When a renewal reminder was last sent, for de-duplication.
    pub last_reminder_sent_at: Option<Timestamp>,

    /// When the membership was created.
    pub created_at: Timestamp,

    /// When the membership was last updated.
    pub updated_at: Timestamp,

    /// Optimistic-concurrency token, bumped by the store on every update.
    pub version: u64,
}

impl Membership {
    /// Creates a new pending membership awaiting payment confirmation.
    ///
    /// The expiration date is set a full cycle out immediately so the terms
    /// are fixed from the moment of creation; payment confirmation only
    /// flips the status.
    pub fn create(
        customer_id: CustomerId,
        benefits: BenefitsSnapshot,
        duration_months: u32,
        now: Timestamp,
    ) -> Self {
        Self {
            id: MembershipId::generate(&now),
            customer_id,
            status: MembershipStatus::Pending,
            payment_status: PaymentStatus::Pending,
            start_date: now,
            expiration_date: now.add_months(duration_months),
            subscription_id: None,
            benefits,
            last_reminder_sent_at: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// True iff this member can receive benefits right now.
    ///
    /// All three conditions are required: active status, confirmed payment,
    /// and an unexpired cycle. Every other component funnels through this
    /// check rather than re-deriving it.
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.status == MembershipStatus::Active
            && self.payment_status == PaymentStatus::Paid
            && now.is_before(&self.expiration_date)
    }

    /// True iff the membership is past its expiration date or already
    /// marked expired.
    ///
    /// Can be true while `status` is still `Active` if a sweep has not run
    /// yet, so callers must not treat the stored status alone as
    /// authoritative for time-sensitive decisions.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.status == MembershipStatus::Expired || !now.is_before(&self.expiration_date)
    }

    /// True iff the membership expires within the given window.
    pub fn is_expiring_soon(&self, now: Timestamp, window_days: i64) -> bool {
        now.is_before(&self.expiration_date)
            && !now.add_days(window_days).is_before(&self.expiration_date)
    }

    /// Whole days until expiration, negative once past it.
    pub fn days_until_expiration(&self, now: Timestamp) -> i64 {
        self.expiration_date.days_from(&now)
    }

    /// Confirms payment and activates the membership.
    ///
    /// Used for the initial activation of a pending membership. The cycle
    /// dates are left as set at creation.
    ///
    /// # Errors
    ///
    /// Returns error if the current status does not allow activation.
    pub fn confirm_payment(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(MembershipStatus::Active)?;
        self.payment_status = PaymentStatus::Paid;
        self.updated_at = now;
        Ok(())
    }

    /// Extends the membership by a number of months after confirmed payment.
    ///
    /// The new expiration is `max(current expiration, now)` + the cycle
    /// length: renewing early adds a full cycle on top of remaining time,
    /// renewing after expiry starts the new cycle from today.
    ///
    /// # Errors
    ///
    /// - `PaymentRequired` if `payment_confirmed` is false
    /// - `InvalidStateTransition` if the membership is cancelled
    pub fn extend(
        &mut self,
        months: u32,
        payment_confirmed: bool,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        if !payment_confirmed {
            return Err(DomainError::new(
                ErrorCode::PaymentRequired,
                "Cannot extend a membership without confirmed payment",
            ));
        }
        self.extend_unchecked(months, now)
    }

    /// Extends the membership without the payment gate.
    ///
    /// Reserved for admin overrides; uses the same later-of date arithmetic
    /// as [`Membership::extend`].
    ///
    /// # Errors
    ///
    /// Returns error if the membership is cancelled.
    pub fn extend_unchecked(&mut self, months: u32, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(MembershipStatus::Active)?;

        let base = if self.expiration_date.is_after(&now) {
            self.expiration_date
        } else {
            now
        };
        self.expiration_date = base.add_months(months);
        self.payment_status = PaymentStatus::Paid;
        self.updated_at = now;
        Ok(())
    }

    /// Cancels the membership. Terminal; no further transitions.
    ///
    /// # Errors
    ///
    /// Returns error if already cancelled.
    pub fn cancel(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(MembershipStatus::Cancelled)?;
        self.updated_at = now;
        Ok(())
    }

    /// Marks the membership expired after its cycle has ended.
    ///
    /// # Errors
    ///
    /// Returns error if the current status does not allow expiration
    /// (already expired, cancelled, or never activated).
    pub fn expire(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(MembershipStatus::Expired)?;
        self.updated_at = now;
        Ok(())
    }

    /// Records a failed payment. The lifecycle status is left untouched;
    /// a non-`Paid` payment status already withholds all benefits.
    pub fn mark_payment_failed(&mut self, now: Timestamp) {
        self.payment_status = PaymentStatus::Failed;
        self.updated_at = now;
    }

    /// Records a refunded payment.
    pub fn mark_refunded(&mut self, now: Timestamp) {
        self.payment_status = PaymentStatus::Refunded;
        self.updated_at = now;
    }

    /// Records that a renewal reminder was sent.
    pub fn record_reminder_sent(&mut self, now: Timestamp) {
        self.last_reminder_sent_at = Some(now);
        self.updated_at = now;
    }

    /// Whether a reminder was already sent within the given number of hours.
    pub fn reminded_within_hours(&self, now: Timestamp, hours: i64) -> bool {
        match self.last_reminder_sent_at {
            Some(sent_at) => now.duration_since(&sent_at).num_hours() < hours,
            None => false,
        }
    }

    /// Transition to a new status using the state machine.
    fn transition_to(&mut self, target: MembershipStatus) -> Result<(), DomainError> {
        use crate::domain::foundation::StateMachine;

        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition membership from {:?} to {:?}",
                    self.status, target
                ),
            )
        })?;
        Ok(())
    }
}
