//! Membership error taxonomy.
//!
//! Domain-specific errors for membership operations, with a stable error
//! code and a retryability hint so callers can distinguish permanent
//! failures from transient infrastructure faults.

use std::collections::HashMap;
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors arising from membership operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// No membership exists with the given id.
    NotFound { membership_id: String },

    /// No membership exists for the given customer.
    NotFoundForCustomer { customer_id: String },

    /// The customer already has a membership.
    AlreadyExists { customer_id: String },

    /// The membership has expired and the operation requires an active one.
    Expired { membership_id: String },

    /// A payment was attempted and failed.
    PaymentFailed { reason: String },

    /// The operation requires confirmed payment.
    PaymentRequired,

    /// The customer reference is missing or malformed.
    InvalidCustomer { reason: String },

    /// The requested status transition is not allowed.
    InvalidState { current: String, attempted: String },

    /// Renewal could not be completed.
    RenewalFailed { reason: String },

    /// Cancellation could not be completed.
    CancellationFailed { reason: String },

    /// Input validation failed.
    Validation { field: String, message: String },

    /// The backing store failed.
    Store(String),

    /// A concurrent update won; the caller holds a stale version.
    VersionConflict { membership_id: String },
}

impl MembershipError {
    pub fn not_found(membership_id: impl Into<String>) -> Self {
        Self::NotFound {
            membership_id: membership_id.into(),
        }
    }

    pub fn not_found_for_customer(customer_id: impl Into<String>) -> Self {
        Self::NotFoundForCustomer {
            customer_id: customer_id.into(),
        }
    }

    pub fn already_exists(customer_id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            customer_id: customer_id.into(),
        }
    }

    pub fn expired(membership_id: impl Into<String>) -> Self {
        Self::Expired {
            membership_id: membership_id.into(),
        }
    }

    pub fn payment_failed(reason: impl Into<String>) -> Self {
        Self::PaymentFailed {
            reason: reason.into(),
        }
    }

    pub fn invalid_customer(reason: impl Into<String>) -> Self {
        Self::InvalidCustomer {
            reason: reason.into(),
        }
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        Self::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn renewal_failed(reason: impl Into<String>) -> Self {
        Self::RenewalFailed {
            reason: reason.into(),
        }
    }

    pub fn cancellation_failed(reason: impl Into<String>) -> Self {
        Self::CancellationFailed {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    pub fn version_conflict(membership_id: impl Into<String>) -> Self {
        Self::VersionConflict {
            membership_id: membership_id.into(),
        }
    }

    /// Stable error code for API payloads and logs.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } | Self::NotFoundForCustomer { .. } => {
                ErrorCode::MembershipNotFound
            }
            Self::AlreadyExists { .. } => ErrorCode::MembershipAlreadyExists,
            Self::Expired { .. } => ErrorCode::MembershipExpired,
            Self::PaymentFailed { .. } => ErrorCode::PaymentFailed,
            Self::PaymentRequired => ErrorCode::PaymentRequired,
            Self::InvalidCustomer { .. } => ErrorCode::InvalidCustomer,
            Self::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            Self::RenewalFailed { .. } => ErrorCode::RenewalFailed,
            Self::CancellationFailed { .. } => ErrorCode::CancellationFailed,
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::Store(_) => ErrorCode::StoreError,
            Self::VersionConflict { .. } => ErrorCode::VersionConflict,
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { membership_id } => {
                format!("Membership not found: {}", membership_id)
            }
            Self::NotFoundForCustomer { customer_id } => {
                format!("No membership found for customer: {}", customer_id)
            }
            Self::AlreadyExists { customer_id } => {
                format!("Customer already has a membership: {}", customer_id)
            }
            Self::Expired { membership_id } => {
                format!("Membership has expired: {}", membership_id)
            }
            Self::PaymentFailed { reason } => format!("Payment failed: {}", reason),
            Self::PaymentRequired => "Confirmed payment is required for this operation".to_string(),
            Self::InvalidCustomer { reason } => format!("Invalid customer: {}", reason),
            Self::InvalidState { current, attempted } => {
                format!("Cannot transition from {} to {}", current, attempted)
            }
            Self::RenewalFailed { reason } => format!("Renewal failed: {}", reason),
            Self::CancellationFailed { reason } => format!("Cancellation failed: {}", reason),
            Self::Validation { field, message } => {
                format!("Validation failed for {}: {}", field, message)
            }
            Self::Store(message) => format!("Store error: {}", message),
            Self::VersionConflict { membership_id } => {
                format!("Concurrent update detected for membership: {}", membership_id)
            }
        }
    }

    /// Whether retrying the same operation could succeed.
    ///
    /// Store faults and version conflicts are transient; everything else
    /// needs a different input or a state change first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_) | Self::VersionConflict { .. })
    }
}

impl fmt::Display for MembershipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MembershipError {}

impl From<MembershipError> for DomainError {
    fn from(err: MembershipError) -> Self {
        let mut details = HashMap::new();
        match &err {
            MembershipError::NotFound { membership_id }
            | MembershipError::Expired { membership_id }
            | MembershipError::VersionConflict { membership_id } => {
                details.insert("membership_id".to_string(), membership_id.clone());
            }
            MembershipError::NotFoundForCustomer { customer_id }
            | MembershipError::AlreadyExists { customer_id } => {
                details.insert("customer_id".to_string(), customer_id.clone());
            }
            MembershipError::Validation { field, .. } => {
                details.insert("field".to_string(), field.clone());
            }
            MembershipError::InvalidState { current, attempted } => {
                details.insert("current".to_string(), current.clone());
                details.insert("attempted".to_string(), attempted.clone());
            }
            _ => {}
        }
        DomainError {
            code: err.code(),
            message: err.message(),
            details,
        }
    }
}
