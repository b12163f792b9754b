//! Renewal eligibility windows and pricing.
//!
//! Renewal opens inside a fixed window before expiration and stays open
//! indefinitely afterwards; a small incentive discount applies only while
//! plenty of the window remains. Pricing always derives from the fee
//! snapshotted on the membership, never from current configuration.

use serde::{Deserialize, Serialize};

use super::Membership;
use crate::domain::foundation::Timestamp;
use crate::domain::membership::{MembershipStatus, PaymentStatus};

/// Days before expiration at which renewal opens.
pub const RENEWAL_WINDOW_DAYS: i64 = 90;

/// Minimum days remaining for the early-renewal discount to apply.
pub const EARLY_RENEWAL_THRESHOLD_DAYS: i64 = 60;

/// Early-renewal incentive as a fraction of the annual fee.
pub const EARLY_RENEWAL_DISCOUNT_FRACTION: f64 = 0.05;

/// Whether and how a membership may renew right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalEligibility {
    pub eligible: bool,
    /// Populated when `eligible` is false.
    pub reason: Option<String>,
    /// True when renewing now earns the early-renewal discount.
    pub can_renew_early: bool,
}

impl RenewalEligibility {
    fn eligible(can_renew_early: bool) -> Self {
        Self {
            eligible: true,
            reason: None,
            can_renew_early,
        }
    }

    fn ineligible(reason: impl Into<String>) -> Self {
        Self {
            eligible: false,
            reason: Some(reason.into()),
            can_renew_early: false,
        }
    }
}

/// Quoted price for renewing a membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewalPricing {
    pub base_price: f64,
    pub discount: f64,
    pub final_price: f64,
    pub currency: String,
}

/// Evaluates renewal eligibility for a membership at `now`.
///
/// Cancelled memberships can never renew. A failed payment blocks renewal
/// until resolved. Otherwise renewal is open from `RENEWAL_WINDOW_DAYS`
/// before expiration with no lower bound: an expired membership remains
/// renewable no matter how long ago it lapsed.
pub fn validate_renewal_eligibility(membership: &Membership, now: Timestamp) -> RenewalEligibility {
    if membership.status == MembershipStatus::Cancelled {
        return RenewalEligibility::ineligible("Cancelled memberships cannot be renewed");
    }
    if membership.payment_status == PaymentStatus::Failed {
        return RenewalEligibility::ineligible(
            "Previous payment failed; resolve payment before renewing",
        );
    }

    let days_remaining = membership.days_until_expiration(now);
    if days_remaining > RENEWAL_WINDOW_DAYS {
        return RenewalEligibility::ineligible(format!(
            "Renewal opens {} days before expiration ({} days remaining)",
            RENEWAL_WINDOW_DAYS, days_remaining
        ));
    }

    // Renewing before expiry is "early"; the pricing discount has its own
    // tighter threshold in `calculate_renewal_pricing`.
    RenewalEligibility::eligible(days_remaining > 0)
}

/// Quotes the renewal price from the membership's snapshotted annual fee.
///
/// The early-renewal discount applies iff at least
/// `EARLY_RENEWAL_THRESHOLD_DAYS` remain before expiration.
pub fn calculate_renewal_pricing(
    membership: &Membership,
    currency: &str,
    now: Timestamp,
) -> RenewalPricing {
    let base_price = membership.benefits.annual_fee;
    let days_remaining = membership.days_until_expiration(now);
    let discount = if days_remaining >= EARLY_RENEWAL_THRESHOLD_DAYS {
        base_price * EARLY_RENEWAL_DISCOUNT_FRACTION
    } else {
        0.0
    };
    RenewalPricing {
        base_price,
        discount,
        final_price: base_price - discount,
        currency: currency.to_string(),
    }
}
