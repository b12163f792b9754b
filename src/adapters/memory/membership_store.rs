//! In-memory membership store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{CustomerId, MembershipId, Timestamp};
use crate::domain::membership::{Membership, MembershipError, MembershipStatus};
use crate::ports::MembershipStore;

/// Membership store backed by a `RwLock`ed map keyed by membership id.
///
/// The write lock is held across the uniqueness check in `insert` and the
/// version check in `update`, which is what makes both atomic.
#[derive(Debug, Default)]
pub struct InMemoryMembershipStore {
    memberships: RwLock<HashMap<MembershipId, Membership>>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn insert(&self, membership: &Membership) -> Result<(), MembershipError> {
        let mut memberships = self.memberships.write().await;

        if memberships
            .values()
            .any(|m| m.customer_id == membership.customer_id)
        {
            return Err(MembershipError::already_exists(
                membership.customer_id.as_str(),
            ));
        }
        if memberships.contains_key(&membership.id) {
            return Err(MembershipError::already_exists(
                membership.customer_id.as_str(),
            ));
        }
        memberships.insert(membership.id.clone(), membership.clone());
        Ok(())
    }

    async fn update(&self, membership: &Membership) -> Result<Membership, MembershipError> {
        let mut memberships = self.memberships.write().await;

        let stored = memberships
            .get(&membership.id)
            .ok_or_else(|| MembershipError::not_found(membership.id.as_str()))?;

        if stored.version != membership.version {
            return Err(MembershipError::version_conflict(membership.id.as_str()));
        }

        let mut updated = membership.clone();
        updated.version += 1;
        memberships.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    async fn find_by_id(&self, id: &MembershipId) -> Result<Option<Membership>, MembershipError> {
        Ok(self.memberships.read().await.get(id).cloned())
    }

    async fn find_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<Membership>, MembershipError> {
        Ok(self
            .memberships
            .read()
            .await
            .values()
            .find(|m| &m.customer_id == customer_id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Membership>, MembershipError> {
        Ok(self.memberships.read().await.values().cloned().collect())
    }

    async fn find_due_for_expiration(
        &self,
        now: Timestamp,
    ) -> Result<Vec<Membership>, MembershipError> {
        Ok(self
            .memberships
            .read()
            .await
            .values()
            .filter(|m| m.status == MembershipStatus::Active && !now.is_before(&m.expiration_date))
            .cloned()
            .collect())
    }

    async fn find_expiring_within_days(
        &self,
        now: Timestamp,
        days: i64,
    ) -> Result<Vec<Membership>, MembershipError> {
        Ok(self
            .memberships
            .read()
            .await
            .values()
            .filter(|m| m.is_active(now) && m.is_expiring_soon(now, days))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::BenefitsSnapshot;

    fn membership_for(customer: &str, now: Timestamp) -> Membership {
        let mut m = Membership::create(
            CustomerId::new(customer).unwrap(),
            BenefitsSnapshot::capture(0.15, true, 199.0),
            12,
            now,
        );
        m.confirm_payment(now).unwrap();
        m
    }

    #[tokio::test]
    async fn insert_and_find_round_trip() {
        let store = InMemoryMembershipStore::new();
        let now = Timestamp::now();
        let m = membership_for("cust-1", now);

        store.insert(&m).await.unwrap();

        let found = store.find_by_id(&m.id).await.unwrap().unwrap();
        assert_eq!(found, m);

        let by_customer = store
            .find_by_customer_id(&m.customer_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_customer.id, m.id);
    }

    #[tokio::test]
    async fn insert_enforces_one_membership_per_customer() {
        let store = InMemoryMembershipStore::new();
        let now = Timestamp::now();

        store.insert(&membership_for("cust-1", now)).await.unwrap();
        let err = store
            .insert(&membership_for("cust-1", now))
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let store = InMemoryMembershipStore::new();
        let now = Timestamp::now();
        let m = membership_for("cust-1", now);
        store.insert(&m).await.unwrap();

        let updated = store.update(&m).await.unwrap();
        assert_eq!(updated.version, m.version + 1);
    }

    #[tokio::test]
    async fn update_rejects_stale_version() {
        let store = InMemoryMembershipStore::new();
        let now = Timestamp::now();
        let m = membership_for("cust-1", now);
        store.insert(&m).await.unwrap();

        // First writer wins.
        store.update(&m).await.unwrap();

        // Second writer still holds the original version.
        let err = store.update(&m).await.unwrap_err();
        assert!(matches!(err, MembershipError::VersionConflict { .. }));
    }

    #[tokio::test]
    async fn update_fails_for_missing_membership() {
        let store = InMemoryMembershipStore::new();
        let now = Timestamp::now();
        let m = membership_for("cust-1", now);

        let err = store.update(&m).await.unwrap_err();
        assert!(matches!(err, MembershipError::NotFound { .. }));
    }

    #[tokio::test]
    async fn find_due_for_expiration_returns_lapsed_active_only() {
        let store = InMemoryMembershipStore::new();
        let now = Timestamp::now();

        let mut lapsed = membership_for("cust-1", now);
        lapsed.expiration_date = now.minus_days(1);
        store.insert(&lapsed).await.unwrap();

        let current = membership_for("cust-2", now);
        store.insert(&current).await.unwrap();

        let mut cancelled = membership_for("cust-3", now);
        cancelled.expiration_date = now.minus_days(1);
        cancelled.cancel(now).unwrap();
        store.insert(&cancelled).await.unwrap();

        let due = store.find_due_for_expiration(now).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, lapsed.id);
    }

    #[tokio::test]
    async fn find_expiring_within_days_filters_window() {
        let store = InMemoryMembershipStore::new();
        let now = Timestamp::now();

        let mut soon = membership_for("cust-1", now);
        soon.expiration_date = now.add_days(10);
        store.insert(&soon).await.unwrap();

        let later = membership_for("cust-2", now);
        store.insert(&later).await.unwrap();

        let expiring = store.find_expiring_within_days(now, 30).await.unwrap();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].id, soon.id);
    }
}
