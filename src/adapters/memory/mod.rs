//! In-memory adapters.
//!
//! Thread-safe, tokio-friendly implementations backed by `RwLock`ed maps.
//! Used as the default wiring and as test doubles for the integration
//! tests; they honor the same uniqueness, versioning, and first-write-wins
//! contracts a database-backed adapter must provide.

mod event_log;
mod membership_store;
mod notification_sender;
mod processed_events;

pub use event_log::InMemoryLifecycleEventLog;
pub use membership_store::InMemoryMembershipStore;
pub use notification_sender::{RecordedNotification, RecordingNotificationSender};
pub use processed_events::InMemoryProcessedEventStore;
