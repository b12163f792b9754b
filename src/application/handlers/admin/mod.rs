//! Admin operations: manual overrides, search, analytics, export.

mod analytics;
mod cancel_membership;
mod export;
mod extend_membership;
mod search_memberships;

pub use analytics::{AnalyticsHandler, MembershipAnalytics};
pub use cancel_membership::AdminCancelMembershipHandler;
pub use export::{export_csv, export_json};
pub use extend_membership::AdminExtendMembershipHandler;
pub use search_memberships::{SearchFilters, SearchMembershipsHandler, SearchPage};
