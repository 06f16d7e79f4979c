use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::{MessageKind, SwipeAction};

/// Query string for the discovery feed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedRequest {
    #[serde(default = "default_feed_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: u16,
}

fn default_feed_limit() -> u16 {
    10
}

/// Request to swipe on a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeRequest {
    #[serde(alias = "target_id", rename = "targetId")]
    pub target_id: Uuid,
    pub action: SwipeAction,
}

/// Query string for message history
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FetchMessagesRequest {
    #[serde(default = "default_fetch_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u16,
}

fn default_fetch_limit() -> u16 {
    50
}

/// Request to send a message into a match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[serde(alias = "message_type", rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub content: Option<String>,
    #[serde(default, alias = "media_url", rename = "mediaUrl")]
    #[validate(length(min = 1, max = 2048))]
    pub media_url: Option<String>,
    #[serde(default, alias = "gift_id", rename = "giftId")]
    #[validate(length(min = 1, max = 128))]
    pub gift_id: Option<String>,
    #[serde(default, alias = "gift_cost", rename = "giftCost")]
    pub gift_cost: Option<i64>,
}

/// Query string for ledger history
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HistoryRequest {
    #[serde(default = "default_history_limit")]
    #[validate(range(min = 1, max = 200))]
    pub limit: u16,
}

fn default_history_limit() -> u16 {
    50
}
