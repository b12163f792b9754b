//! Pure discount and free-delivery calculators.
//!
//! All functions here are deterministic over their inputs and never touch
//! storage; callers load the membership first and pass the evaluation time
//! explicitly. A missing or inactive membership is not an error, it simply
//! yields a zero discount.

use serde::{Deserialize, Serialize};

use super::{Membership, ServiceCategory};
use crate::domain::foundation::Timestamp;

/// Result of applying the membership discount to a single price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountBreakdown {
    pub original_price: f64,
    pub discount_amount: f64,
    /// Discount as a percentage (15.0 = 15%), for display.
    pub discount_percentage: f64,
    pub final_price: f64,
    /// Equal to `discount_amount`; kept as a separate field for storefront
    /// payloads that render "you saved X".
    pub savings: f64,
}

impl DiscountBreakdown {
    fn none(original_price: f64) -> Self {
        Self {
            original_price,
            discount_amount: 0.0,
            discount_percentage: 0.0,
            final_price: original_price,
            savings: 0.0,
        }
    }
}

/// Discount detail for a single service, shaped for storefront display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDiscountInfo {
    pub service_id: String,
    pub service_name: String,
    pub eligible: bool,
    pub breakdown: DiscountBreakdown,
}

/// Calculates the member discount for a service price.
///
/// The full discount applies only when every gate passes: a membership is
/// present, it is active at `now`, and the service id maps to an eligible
/// category. Any failed gate yields a zero breakdown with the price
/// unchanged.
///
/// The arithmetic is a plain multiplication of the snapshotted fraction;
/// zero and negative prices scale linearly like any other value.
pub fn calculate_service_discount(
    price: f64,
    membership: Option<&Membership>,
    service_id: Option<&str>,
    now: Timestamp,
) -> DiscountBreakdown {
    let membership = match membership {
        Some(m) if m.is_active(now) => m,
        _ => return DiscountBreakdown::none(price),
    };

    if let Some(id) = service_id {
        match ServiceCategory::from_id(id) {
            Some(category) if membership.benefits.covers(category) => {}
            _ => return DiscountBreakdown::none(price),
        }
    }

    let fraction = membership.benefits.service_discount_fraction;
    let discount_amount = price * fraction;
    DiscountBreakdown {
        original_price: price,
        discount_amount,
        discount_percentage: fraction * 100.0,
        final_price: price - discount_amount,
        savings: discount_amount,
    }
}

/// Whether delivery fees are waived for this customer.
///
/// Requires an active membership whose snapshot includes free delivery.
pub fn is_eligible_for_free_delivery(membership: Option<&Membership>, now: Timestamp) -> bool {
    matches!(membership, Some(m) if m.is_active(now) && m.benefits.free_delivery)
}

/// Builds the per-service discount detail shown on service pages.
///
/// Unknown service ids are reported back verbatim as the display name with
/// a zero breakdown rather than erroring, so the storefront can render
/// whatever catalogue entry it asked about.
pub fn get_service_discount_info(
    service_id: &str,
    price: f64,
    membership: Option<&Membership>,
    now: Timestamp,
) -> ServiceDiscountInfo {
    let category = ServiceCategory::from_id(service_id);
    let eligible = match (category, membership) {
        (Some(c), Some(m)) => m.is_active(now) && m.benefits.covers(c),
        _ => false,
    };
    ServiceDiscountInfo {
        service_id: service_id.to_string(),
        service_name: category
            .map(|c| c.display_name().to_string())
            .unwrap_or_else(|| service_id.to_string()),
        eligible,
        breakdown: calculate_service_discount(price, membership, Some(service_id), now),
    }
}
