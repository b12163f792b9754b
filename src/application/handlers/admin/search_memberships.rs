//! Admin search over the membership set.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::membership::{Membership, MembershipError, MembershipStatus};
use crate::ports::MembershipStore;

/// Filters applied before pagination. All are optional and combine with
/// AND semantics.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub status: Option<MembershipStatus>,
    /// Memberships expiring at or after this time.
    pub expires_after: Option<Timestamp>,
    /// Memberships expiring before this time.
    pub expires_before: Option<Timestamp>,
    /// Case-insensitive substring match on customer id or membership id.
    pub free_text: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub items: Vec<Membership>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// In-memory filter and paginate over the full membership list.
pub struct SearchMembershipsHandler {
    store: Arc<dyn MembershipStore>,
}

impl SearchMembershipsHandler {
    pub fn new(store: Arc<dyn MembershipStore>) -> Self {
        Self { store }
    }

    /// Searches with 1-based page numbering. A zero `limit` defaults to 50.
    pub async fn execute(
        &self,
        filters: &SearchFilters,
        page: usize,
        limit: usize,
    ) -> Result<SearchPage, MembershipError> {
        let limit = if limit == 0 { 50 } else { limit };
        let page = page.max(1);

        let mut matches: Vec<Membership> = self
            .store
            .list_all()
            .await?
            .into_iter()
            .filter(|m| Self::matches(filters, m))
            .collect();
        // Newest first, stable across pages.
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matches.len();
        let items = matches
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();
        Ok(SearchPage {
            items,
            total,
            page,
            limit,
        })
    }

    fn matches(filters: &SearchFilters, membership: &Membership) -> bool {
        if let Some(status) = filters.status {
            if membership.status != status {
                return false;
            }
        }
        if let Some(after) = filters.expires_after {
            if membership.expiration_date.is_before(&after) {
                return false;
            }
        }
        if let Some(before) = filters.expires_before {
            if !membership.expiration_date.is_before(&before) {
                return false;
            }
        }
        if let Some(text) = &filters.free_text {
            let needle = text.to_lowercase();
            let customer = membership.customer_id.as_str().to_lowercase();
            let id = membership.id.as_str().to_lowercase();
            if !customer.contains(&needle) && !id.contains(&needle) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMembershipStore;
    use crate::domain::foundation::CustomerId;
    use crate::domain::membership::BenefitsSnapshot;
    use crate::ports::MembershipStore as _;

    async fn seed(store: &InMemoryMembershipStore, customer: &str, now: Timestamp) -> Membership {
        let mut m = Membership::create(
            CustomerId::new(customer).unwrap(),
            BenefitsSnapshot::capture(0.15, true, 199.0),
            12,
            now,
        );
        m.confirm_payment(now).unwrap();
        store.insert(&m).await.unwrap();
        m
    }

    #[tokio::test]
    async fn filters_by_status() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let now = Timestamp::now();
        seed(&store, "cust-1", now).await;
        let mut cancelled = seed(&store, "cust-2", now).await;
        cancelled.cancel(now).unwrap();
        store.update(&cancelled).await.unwrap();

        let handler = SearchMembershipsHandler::new(store);
        let page = handler
            .execute(
                &SearchFilters {
                    status: Some(MembershipStatus::Cancelled),
                    ..Default::default()
                },
                1,
                10,
            )
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].customer_id.as_str(), "cust-2");
    }

    #[tokio::test]
    async fn free_text_matches_ids_case_insensitively() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let now = Timestamp::now();
        seed(&store, "Alice-Garage", now).await;
        seed(&store, "bob-motors", now).await;

        let handler = SearchMembershipsHandler::new(store);
        let page = handler
            .execute(
                &SearchFilters {
                    free_text: Some("ALICE".to_string()),
                    ..Default::default()
                },
                1,
                10,
            )
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].customer_id.as_str(), "Alice-Garage");
    }

    #[tokio::test]
    async fn date_range_filters_expiration() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let now = Timestamp::now();
        let mut soon = seed(&store, "cust-1", now).await;
        soon.expiration_date = now.add_days(10);
        store.update(&soon).await.unwrap();
        seed(&store, "cust-2", now).await;

        let handler = SearchMembershipsHandler::new(store);
        let page = handler
            .execute(
                &SearchFilters {
                    expires_before: Some(now.add_days(30)),
                    ..Default::default()
                },
                1,
                10,
            )
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].customer_id.as_str(), "cust-1");
    }

    #[tokio::test]
    async fn paginates_with_total_count() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let now = Timestamp::now();
        for i in 0..5 {
            seed(&store, &format!("cust-{}", i), now).await;
        }

        let handler = SearchMembershipsHandler::new(store);
        let first = handler
            .execute(&SearchFilters::default(), 1, 2)
            .await
            .unwrap();
        let third = handler
            .execute(&SearchFilters::default(), 3, 2)
            .await
            .unwrap();

        assert_eq!(first.total, 5);
        assert_eq!(first.items.len(), 2);
        assert_eq!(third.items.len(), 1);
    }
}
