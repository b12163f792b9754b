//! Renewal-reminder sweep.
//!
//! Finds active memberships expiring within the reminder window and sends
//! each customer a renewal reminder. De-duplication is explicit: the send
//! time is recorded on the membership, and another reminder is not sent
//! within 24 hours regardless of sweep cadence.

use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::foundation::Timestamp;
use crate::domain::membership::{Membership, MembershipError};
use crate::ports::{MembershipStore, NotificationKind, NotificationSender};

use super::SweepReport;

/// Hours within which a reminder is never re-sent.
const REMINDER_DEDUP_HOURS: i64 = 24;

/// Sends renewal reminders for soon-to-expire memberships.
pub struct ReminderSweep {
    store: Arc<dyn MembershipStore>,
    notifications: Arc<dyn NotificationSender>,
    window_days: i64,
}

impl ReminderSweep {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        notifications: Arc<dyn NotificationSender>,
        window_days: i64,
    ) -> Self {
        Self {
            store,
            notifications,
            window_days,
        }
    }

    /// Runs one sweep pass with per-item isolation and a between-items
    /// stop flag, like the expiration sweep.
    pub async fn run(&self, now: Timestamp, stop: &AtomicBool) -> SweepReport {
        let mut report = SweepReport::default();

        let expiring = match self
            .store
            .find_expiring_within_days(now, self.window_days)
            .await
        {
            Ok(expiring) => expiring,
            Err(err) => {
                warn!(error = %err, "reminder sweep could not list memberships");
                report.record_failure(format!("listing failed: {}", err));
                return report;
            }
        };

        info!(count = expiring.len(), "reminder sweep starting");
        for membership in expiring {
            if stop.load(Ordering::SeqCst) {
                info!("reminder sweep stopped before completion");
                break;
            }
            match self.remind_one(membership, now).await {
                Ok(true) => report.record_success(),
                Ok(false) => report.record_skip(),
                Err(err) => report.record_failure(err.message()),
            }
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "reminder sweep finished"
        );
        report
    }

    /// Sends one reminder. Returns `Ok(false)` when the customer was
    /// reminded recently and nothing was sent.
    async fn remind_one(
        &self,
        mut membership: Membership,
        now: Timestamp,
    ) -> Result<bool, MembershipError> {
        if membership.reminded_within_hours(now, REMINDER_DEDUP_HOURS) {
            return Ok(false);
        }

        let days_remaining = membership.days_until_expiration(now);
        self.notifications
            .send(
                NotificationKind::RenewalReminder,
                &membership,
                Some(json!({
                    "days_remaining": days_remaining,
                    "expiration_date": membership.expiration_date.to_string(),
                })),
            )
            .await
            .map_err(|e| MembershipError::store(e.message))?;

        // The send time must be durable or the next tick re-sends.
        membership.record_reminder_sent(now);
        self.store.update(&membership).await?;
        Ok(true)
    }
}
