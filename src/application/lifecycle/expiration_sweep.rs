//! Expiration sweep.
//!
//! Finds active memberships whose cycle has ended, transitions each to
//! expired, notifies the customer, and appends an audit event. Safe to
//! re-run: a membership already marked expired is skipped, so redundant
//! sweeps never duplicate notifications.

use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::foundation::Timestamp;
use crate::domain::membership::{
    LifecycleEvent, LifecycleEventKind, Membership, MembershipError, MembershipStatus,
};
use crate::ports::{LifecycleEventLog, MembershipStore, NotificationKind, NotificationSender};

use super::SweepReport;

/// Expires memberships whose cycle has ended.
pub struct ExpirationSweep {
    store: Arc<dyn MembershipStore>,
    notifications: Arc<dyn NotificationSender>,
    event_log: Arc<dyn LifecycleEventLog>,
}

impl ExpirationSweep {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        notifications: Arc<dyn NotificationSender>,
        event_log: Arc<dyn LifecycleEventLog>,
    ) -> Self {
        Self {
            store,
            notifications,
            event_log,
        }
    }

    /// Runs one sweep pass.
    ///
    /// Per-item isolation: a failure on one membership is recorded and the
    /// sweep moves on. The stop flag is honored between items; in-flight
    /// item work always completes.
    pub async fn run(&self, now: Timestamp, stop: &AtomicBool) -> SweepReport {
        let mut report = SweepReport::default();

        let due = match self.store.find_due_for_expiration(now).await {
            Ok(due) => due,
            Err(err) => {
                warn!(error = %err, "expiration sweep could not list memberships");
                report.record_failure(format!("listing failed: {}", err));
                return report;
            }
        };

        info!(count = due.len(), "expiration sweep starting");
        for membership in due {
            if stop.load(Ordering::SeqCst) {
                info!("expiration sweep stopped before completion");
                break;
            }
            match self.expire_one(membership, now).await {
                Ok(true) => report.record_success(),
                Ok(false) => report.record_skip(),
                Err(err) => report.record_failure(err.message()),
            }
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "expiration sweep finished"
        );
        report
    }

    /// Expires one membership. Returns `Ok(false)` when another actor got
    /// there first and there was nothing to do.
    async fn expire_one(
        &self,
        membership: Membership,
        now: Timestamp,
    ) -> Result<bool, MembershipError> {
        // Re-read: the listing may be stale by the time we act.
        let Some(mut current) = self.store.find_by_id(&membership.id).await? else {
            return Ok(false);
        };
        if current.status != MembershipStatus::Active || !current.is_expired(now) {
            return Ok(false);
        }

        current
            .expire(now)
            .map_err(|_| MembershipError::invalid_state(current.status.label(), "expired"))?;
        let updated = self.store.update(&current).await?;

        if let Err(err) = self
            .notifications
            .send(NotificationKind::Expiration, &updated, None)
            .await
        {
            warn!(
                membership_id = %updated.id,
                error = %err,
                "expiration notification failed"
            );
        }

        let event = LifecycleEvent::new(
            LifecycleEventKind::Expiration,
            updated.id.clone(),
            updated.customer_id.clone(),
            now,
            json!({"expired_at": updated.expiration_date.to_string()}),
        );
        if let Err(err) = self.event_log.append(event).await {
            warn!(membership_id = %updated.id, error = %err, "audit append failed");
        }
        Ok(true)
    }
}
