//! Membership status state machine.
//!
//! Defines all possible membership states and valid transitions
//! according to the membership lifecycle.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Membership lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Created but payment not yet confirmed. No benefits.
    Pending,

    /// Paid and within the validity window. Full benefits.
    Active,

    /// Past the expiration date. No benefits until renewed.
    Expired,

    /// Terminal state. Never auto-transitions anywhere else.
    Cancelled,
}

impl MembershipStatus {
    /// Stable lowercase label used in exports and audit metadata.
    pub fn label(&self) -> &'static str {
        match self {
            MembershipStatus::Pending => "pending",
            MembershipStatus::Active => "active",
            MembershipStatus::Expired => "expired",
            MembershipStatus::Cancelled => "cancelled",
        }
    }
}

impl StateMachine for MembershipStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MembershipStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, Active)
                | (Pending, Cancelled)
            // From ACTIVE
                | (Active, Active) // Renewal while still active
                | (Active, Expired)
                | (Active, Cancelled)
            // From EXPIRED
                | (Expired, Active) // Late renewal, no upper bound on lateness
                | (Expired, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MembershipStatus::*;
        match self {
            Pending => vec![Active, Cancelled],
            Active => vec![Active, Expired, Cancelled],
            Expired => vec![Active, Cancelled],
            Cancelled => vec![],
        }
    }
}
