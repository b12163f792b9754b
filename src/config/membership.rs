//! Membership benefit and pricing configuration.

use serde::Deserialize;

use super::error::ConfigValidationError;

/// How refunded membership orders are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefundPolicy {
    /// Record the refund and log it; membership state is untouched.
    #[default]
    LogOnly,
    /// Record the refund and emit an audit event flagging it for review.
    FlagForReview,
    /// Record the refund and cancel the membership immediately.
    AutoCancel,
}

/// Membership terms applied to newly created or renewed memberships.
///
/// These values are snapshotted onto the membership at creation/renewal;
/// changing them never affects a cycle already in flight.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipConfig {
    /// Annual membership fee.
    #[serde(default = "default_annual_fee")]
    pub annual_fee: f64,

    /// ISO currency code for fees and refunds.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Service discount as a fraction (0.15 = 15%).
    #[serde(default = "default_service_discount_fraction")]
    pub service_discount_fraction: f64,

    /// Whether members get free delivery.
    #[serde(default = "default_free_delivery")]
    pub free_delivery: bool,

    /// Length of a membership cycle in calendar months.
    #[serde(default = "default_duration_months")]
    pub duration_months: u32,

    /// Days before expiration at which renewal reminders begin.
    #[serde(default = "default_renewal_reminder_window_days")]
    pub renewal_reminder_window_days: i64,

    /// What to do when a membership order is refunded.
    #[serde(default)]
    pub refund_policy: RefundPolicy,
}

fn default_annual_fee() -> f64 {
    199.0
}

fn default_currency() -> String {
    "GBP".to_string()
}

fn default_service_discount_fraction() -> f64 {
    0.15
}

fn default_free_delivery() -> bool {
    true
}

fn default_duration_months() -> u32 {
    12
}

fn default_renewal_reminder_window_days() -> i64 {
    30
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            annual_fee: default_annual_fee(),
            currency: default_currency(),
            service_discount_fraction: default_service_discount_fraction(),
            free_delivery: default_free_delivery(),
            duration_months: default_duration_months(),
            renewal_reminder_window_days: default_renewal_reminder_window_days(),
            refund_policy: RefundPolicy::default(),
        }
    }
}

impl MembershipConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.annual_fee <= 0.0 {
            return Err(ConfigValidationError::new(
                "membership.annual_fee",
                "must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.service_discount_fraction) {
            return Err(ConfigValidationError::new(
                "membership.service_discount_fraction",
                "must be between 0.0 and 1.0",
            ));
        }
        if self.duration_months == 0 {
            return Err(ConfigValidationError::new(
                "membership.duration_months",
                "must be at least 1",
            ));
        }
        if self.renewal_reminder_window_days <= 0 {
            return Err(ConfigValidationError::new(
                "membership.renewal_reminder_window_days",
                "must be positive",
            ));
        }
        if self.currency.len() != 3 {
            return Err(ConfigValidationError::new(
                "membership.currency",
                "must be a 3-letter ISO code",
            ));
        }
        Ok(())
    }
}
