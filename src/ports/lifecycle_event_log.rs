//! Port for the append-only lifecycle audit log.

use async_trait::async_trait;

use crate::domain::foundation::{MembershipId, Timestamp};
use crate::domain::membership::{LifecycleEvent, MembershipError};

/// Append-only store of lifecycle audit events.
///
/// The log is for reporting and audit; it is never replayed to derive
/// current membership state.
#[async_trait]
pub trait LifecycleEventLog: Send + Sync {
    /// Appends an event. Events are immutable once written.
    async fn append(&self, event: LifecycleEvent) -> Result<(), MembershipError>;

    /// All events for one membership, oldest first.
    async fn events_for(
        &self,
        membership_id: &MembershipId,
    ) -> Result<Vec<LifecycleEvent>, MembershipError>;

    /// All events at or after the given time, oldest first.
    async fn events_since(&self, since: Timestamp) -> Result<Vec<LifecycleEvent>, MembershipError>;
}
