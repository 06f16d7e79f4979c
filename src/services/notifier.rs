use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{MatchId, ProfileId};

/// New-message event for the other participant of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageNotification {
    pub recipient_id: ProfileId,
    pub sender_id: ProfileId,
    pub match_id: MatchId,
    pub preview: String,
}

/// Delivery port for notifications
///
/// Delivery is best effort; the gateway does not wait on the recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: MessageNotification);
}

/// Notifier that only records events in the log
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: MessageNotification) {
        tracing::info!(
            "Notify {} of message in match {}: {}",
            notification.recipient_id,
            notification.match_id,
            notification.preview
        );
    }
}
