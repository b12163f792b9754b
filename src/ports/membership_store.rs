//! Port for membership persistence.

use async_trait::async_trait;

use crate::domain::foundation::{CustomerId, MembershipId, Timestamp};
use crate::domain::membership::{Membership, MembershipError};

/// Persistence interface for membership aggregates.
///
/// Implementations own the optimistic-concurrency version token: `update`
/// must reject a write whose `version` does not match the stored one, and
/// bump the version on every accepted write.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Inserts a new membership.
    ///
    /// Fails with `AlreadyExists` when the customer already has one; the
    /// check and insert must be atomic with respect to other inserts.
    async fn insert(&self, membership: &Membership) -> Result<(), MembershipError>;

    /// Updates an existing membership.
    ///
    /// Fails with `VersionConflict` when `membership.version` is stale.
    /// On success the stored version is bumped; the caller must re-read
    /// before retrying a conflicted write.
    async fn update(&self, membership: &Membership) -> Result<Membership, MembershipError>;

    /// Looks up a membership by id.
    async fn find_by_id(&self, id: &MembershipId) -> Result<Option<Membership>, MembershipError>;

    /// Looks up a customer's membership.
    async fn find_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<Membership>, MembershipError>;

    /// Lists every membership. Admin and sweep use only.
    async fn list_all(&self) -> Result<Vec<Membership>, MembershipError>;

    /// Memberships whose cycle has ended but whose stored status has not
    /// caught up yet.
    async fn find_due_for_expiration(
        &self,
        now: Timestamp,
    ) -> Result<Vec<Membership>, MembershipError>;

    /// Active memberships expiring within the given window.
    async fn find_expiring_within_days(
        &self,
        now: Timestamp,
        days: i64,
    ) -> Result<Vec<Membership>, MembershipError>;
}
