//! Membership domain module.
//!
//! Handles the ATP membership lifecycle, benefits, and renewal rules.
//!
//! # Module Structure
//!
//! - `aggregate` - Membership aggregate entity
//! - `status` - MembershipStatus state machine
//! - `payment` - PaymentStatus enum
//! - `benefits` - Benefits snapshot and eligible service categories
//! - `discount` - Pure discount and free-delivery calculators
//! - `renewal` - Renewal eligibility windows and pricing
//! - `events` - Append-only lifecycle audit events
//! - `order_event` - Order payloads and line-item classification
//! - `errors` - Membership error taxonomy

mod aggregate;
mod benefits;
mod discount;
mod errors;
mod events;
mod order_event;
mod payment;
mod renewal;
mod status;

pub use aggregate::Membership;
pub use benefits::{BenefitsSnapshot, ServiceCategory};
pub use discount::{
    calculate_service_discount, get_service_discount_info, is_eligible_for_free_delivery,
    DiscountBreakdown, ServiceDiscountInfo,
};
pub use errors::MembershipError;
pub use events::{LifecycleEvent, LifecycleEventKind};
pub use order_event::{
    FinancialStatus, KeywordClassifier, LineItem, LineItemClassifier, LineItemKind, OrderEvent,
};
pub use payment::PaymentStatus;
pub use renewal::{
    calculate_renewal_pricing, validate_renewal_eligibility, RenewalEligibility, RenewalPricing,
    EARLY_RENEWAL_DISCOUNT_FRACTION, EARLY_RENEWAL_THRESHOLD_DAYS, RENEWAL_WINDOW_DAYS,
};
pub use status::MembershipStatus;
