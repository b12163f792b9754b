//! Membership analytics for the admin dashboard.

use std::sync::Arc;

use chrono::Datelike;
use serde::Serialize;

use crate::domain::foundation::Timestamp;
use crate::domain::membership::{LifecycleEventKind, MembershipError, MembershipStatus};
use crate::ports::{LifecycleEventLog, MembershipStore};

/// Aggregate membership figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipAnalytics {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub cancelled: usize,
    pub pending: usize,
    pub new_this_month: usize,
    /// Active count times each membership's snapshotted fee; no proration.
    pub annual_revenue: f64,
    /// Customer renewals in the last year over expired count, floored at
    /// one to avoid dividing by zero. Admin manual extensions are not
    /// renewals and do not count.
    pub renewal_rate: f64,
}

/// Computes aggregate counts, revenue, and the renewal rate.
pub struct AnalyticsHandler {
    store: Arc<dyn MembershipStore>,
    event_log: Arc<dyn LifecycleEventLog>,
}

impl AnalyticsHandler {
    pub fn new(store: Arc<dyn MembershipStore>, event_log: Arc<dyn LifecycleEventLog>) -> Self {
        Self { store, event_log }
    }

    pub async fn execute(&self, now: Timestamp) -> Result<MembershipAnalytics, MembershipError> {
        let memberships = self.store.list_all().await?;

        let mut active = 0;
        let mut expired = 0;
        let mut cancelled = 0;
        let mut pending = 0;
        let mut new_this_month = 0;
        let mut annual_revenue = 0.0;

        let current_month = (now.as_datetime().year(), now.as_datetime().month());
        for m in &memberships {
            match m.status {
                MembershipStatus::Active => {
                    active += 1;
                    annual_revenue += m.benefits.annual_fee;
                }
                MembershipStatus::Expired => expired += 1,
                MembershipStatus::Cancelled => cancelled += 1,
                MembershipStatus::Pending => pending += 1,
            }
            let created = m.created_at.as_datetime();
            if (created.year(), created.month()) == current_month {
                new_this_month += 1;
            }
        }

        let renewals_last_year = self
            .event_log
            .events_since(now.minus_days(365))
            .await?
            .iter()
            .filter(|e| {
                e.kind == LifecycleEventKind::Renewal
                    && e.metadata.get("source").and_then(|s| s.as_str())
                        != Some("admin_extension")
            })
            .count();
        let renewal_rate = renewals_last_year as f64 / expired.max(1) as f64;

        Ok(MembershipAnalytics {
            total: memberships.len(),
            active,
            expired,
            cancelled,
            pending,
            new_this_month,
            annual_revenue,
            renewal_rate,
        })
    }
}
