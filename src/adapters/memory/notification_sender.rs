//! Notification sender that records instead of delivering.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::foundation::DomainError;
use crate::domain::membership::Membership;
use crate::ports::{NotificationKind, NotificationSender};

/// One captured notification.
#[derive(Debug, Clone)]
pub struct RecordedNotification {
    pub kind: NotificationKind,
    pub membership_id: String,
    pub customer_id: String,
    pub context: Option<Value>,
}

/// Records notifications in memory and logs them.
///
/// The default wiring until a real email/SMS gateway adapter exists; also
/// what the integration tests assert against.
#[derive(Debug, Default)]
pub struct RecordingNotificationSender {
    sent: RwLock<Vec<RecordedNotification>>,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<RecordedNotification> {
        self.sent.read().await.clone()
    }

    pub async fn count_of(&self, kind: NotificationKind) -> usize {
        self.sent.read().await.iter().filter(|n| n.kind == kind).count()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn send(
        &self,
        kind: NotificationKind,
        membership: &Membership,
        context: Option<Value>,
    ) -> Result<(), DomainError> {
        info!(
            kind = kind.label(),
            membership_id = %membership.id,
            customer_id = %membership.customer_id,
            "notification sent"
        );
        self.sent.write().await.push(RecordedNotification {
            kind,
            membership_id: membership.id.to_string(),
            customer_id: membership.customer_id.to_string(),
            context,
        });
        Ok(())
    }
}
