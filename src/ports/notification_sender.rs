//! Port for customer notifications.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::DomainError;
use crate::domain::membership::Membership;

/// Kinds of customer-facing membership notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Welcome,
    RenewalReminder,
    RenewalConfirmation,
    Expiration,
    PaymentFailure,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Welcome => "welcome",
            NotificationKind::RenewalReminder => "renewal_reminder",
            NotificationKind::RenewalConfirmation => "renewal_confirmation",
            NotificationKind::Expiration => "expiration",
            NotificationKind::PaymentFailure => "payment_failure",
        }
    }
}

/// Delivery interface for membership notifications.
///
/// Notification delivery is best-effort everywhere in the application:
/// handlers log failures and carry on, so implementations should not
/// retry internally at the cost of blocking the caller.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(
        &self,
        kind: NotificationKind,
        membership: &Membership,
        context: Option<Value>,
    ) -> Result<(), DomainError>;
}
