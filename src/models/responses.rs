use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{
    CoinTransaction, FeedCandidate, LikeRecord, Match, MatchId, Message, ProfileId, SwipeIntent,
};

/// Result of recording a swipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeOutcome {
    /// Both directions of interest exist and the match row is present
    pub is_match: bool,
    /// This call inserted the match row
    pub match_created: bool,
    pub match_id: Option<MatchId>,
    /// The pair had already been swiped; nothing changed
    pub duplicate: bool,
}

impl SwipeOutcome {
    pub fn no_match() -> Self {
        Self {
            is_match: false,
            match_created: false,
            match_id: None,
            duplicate: false,
        }
    }

    pub fn duplicate() -> Self {
        Self {
            duplicate: true,
            ..Self::no_match()
        }
    }
}

/// Result of undoing the latest swipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoOutcome {
    pub undone: SwipeIntent,
    pub coins_charged: i64,
    /// Balance after the charge, when one was applied
    pub balance: Option<i64>,
}

/// Profiles that liked the viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedLikes {
    pub count: u64,
    pub premium_required: bool,
    pub likes: Vec<LikeRecord>,
}

/// A message as returned to a reader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedMessage {
    #[serde(flatten)]
    pub message: Message,
    /// Media past its expiry; consumers must not present the content
    pub is_expired: bool,
}

/// A match from one participant's point of view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub other_profile_id: ProfileId,
    pub created_at: DateTime<Utc>,
    pub last_message: Option<Message>,
    pub unread_count: u64,
}

impl MatchSummary {
    /// Last message time, falling back to match creation
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_message
            .as_ref()
            .map_or(self.created_at, |m| m.sent_at)
    }
}

/// Response for the discovery endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub candidates: Vec<FeedCandidate>,
    pub total_results: usize,
}

/// Coin balance response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub coins: i64,
}

/// Ledger history response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub transactions: Vec<CoinTransaction>,
}

/// Block match response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResponse {
    pub match_id: MatchId,
    pub is_blocked: bool,
}

impl From<&Match> for BlockResponse {
    fn from(m: &Match) -> Self {
        Self {
            match_id: m.id,
            is_blocked: m.is_blocked,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

