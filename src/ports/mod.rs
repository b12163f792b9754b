//! Port definitions - trait interfaces for external dependencies.
//!
//! Ports define what the application needs from the outside world without
//! specifying how it is provided. Adapters implement these traits.

mod lifecycle_event_log;
mod membership_store;
mod notification_sender;
mod processed_event_store;

pub use lifecycle_event_log::LifecycleEventLog;
pub use membership_store::MembershipStore;
pub use notification_sender::{NotificationKind, NotificationSender};
pub use processed_event_store::{ProcessedEventRecord, ProcessedEventStore, SaveResult};
