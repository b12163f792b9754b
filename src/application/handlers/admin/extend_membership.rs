//! Admin manual extension.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::foundation::{MembershipId, Timestamp};
use crate::domain::membership::{
    LifecycleEvent, LifecycleEventKind, Membership, MembershipError,
};
use crate::ports::{LifecycleEventLog, MembershipStore};

/// Extends a membership by admin authority, bypassing the payment gate.
///
/// Uses the same extend-from-later-of date arithmetic as a paid renewal,
/// and requires a non-empty reason for the audit trail.
pub struct AdminExtendMembershipHandler {
    store: Arc<dyn MembershipStore>,
    event_log: Arc<dyn LifecycleEventLog>,
}

impl AdminExtendMembershipHandler {
    pub fn new(store: Arc<dyn MembershipStore>, event_log: Arc<dyn LifecycleEventLog>) -> Self {
        Self { store, event_log }
    }

    pub async fn execute(
        &self,
        membership_id: &MembershipId,
        months: u32,
        reason: &str,
        now: Timestamp,
    ) -> Result<Membership, MembershipError> {
        if months == 0 {
            return Err(MembershipError::validation(
                "months",
                "must be at least 1",
            ));
        }
        if reason.trim().is_empty() {
            return Err(MembershipError::validation(
                "reason",
                "a reason is required for manual extensions",
            ));
        }

        let mut membership = self
            .store
            .find_by_id(membership_id)
            .await?
            .ok_or_else(|| MembershipError::not_found(membership_id.as_str()))?;

        membership
            .extend_unchecked(months, now)
            .map_err(|e| MembershipError::renewal_failed(e.message))?;
        let updated = self.store.update(&membership).await?;

        let event = LifecycleEvent::new(
            LifecycleEventKind::Renewal,
            updated.id.clone(),
            updated.customer_id.clone(),
            now,
            json!({
                "source": "admin_extension",
                "months": months,
                "reason": reason,
                "new_expiration_date": updated.expiration_date.to_string(),
            }),
        );
        if let Err(err) = self.event_log.append(event).await {
            warn!(membership_id = %updated.id, error = %err, "audit append failed");
        }

        info!(
            membership_id = %updated.id,
            months,
            "membership manually extended"
        );
        Ok(updated)
    }
}
