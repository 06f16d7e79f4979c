use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProfileId = Uuid;
pub type MatchId = Uuid;

/// Geographic point, degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Discovery filters a profile applies to the people it is shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryPreferences {
    #[serde(default = "default_min_age")]
    pub min_age: u8,
    #[serde(default = "default_max_age")]
    pub max_age: u8,
    /// Exact gender to show; `None` shows everyone
    #[serde(default)]
    pub show_gender: Option<String>,
    #[serde(default = "default_max_distance_km")]
    pub max_distance_km: u16,
}

fn default_min_age() -> u8 { 18 }
fn default_max_age() -> u8 { 100 }
fn default_max_distance_km() -> u16 { 100 }

impl Default for DiscoveryPreferences {
    fn default() -> Self {
        Self {
            min_age: default_min_age(),
            max_age: default_max_age(),
            show_gender: None,
            max_distance_km: default_max_distance_km(),
        }
    }
}

/// User profile as seen by the matching core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub display_name: String,
    pub age: u8,
    pub gender: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    /// Cached coin balance, kept in lockstep with the coin ledger
    #[serde(default)]
    pub coins: i64,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub preferences: DiscoveryPreferences,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub total_likes_given: i64,
    #[serde(default)]
    pub total_super_likes_given: i64,
    #[serde(default)]
    pub total_matches: i64,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Approved and not banned
    pub fn is_discoverable(&self) -> bool {
        self.is_approved && !self.is_banned
    }

    /// Non-empty bio text, if any
    pub fn bio_text(&self) -> Option<&str> {
        self.bio.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }
}

/// Directional swipe action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "swipe_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SwipeAction {
    Pass,
    Like,
    SuperLike,
}

impl SwipeAction {
    /// Like or super like
    pub fn is_like(self) -> bool {
        matches!(self, SwipeAction::Like | SwipeAction::SuperLike)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SwipeAction::Pass => "pass",
            SwipeAction::Like => "like",
            SwipeAction::SuperLike => "super_like",
        }
    }
}

impl std::str::FromStr for SwipeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pass" => Ok(SwipeAction::Pass),
            "like" => Ok(SwipeAction::Like),
            "super_like" | "superlike" => Ok(SwipeAction::SuperLike),
            other => Err(format!("unknown swipe action: {}", other)),
        }
    }
}

/// A recorded swipe of `actor` on `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeIntent {
    pub id: Uuid,
    pub actor_id: ProfileId,
    pub target_id: ProfileId,
    pub action: SwipeAction,
    pub created_at: DateTime<Utc>,
}

/// Like-only projection of swipe history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecord {
    pub liker_id: ProfileId,
    pub liked_id: ProfileId,
    pub is_super: bool,
    pub created_at: DateTime<Utc>,
}

impl LikeRecord {
    pub fn from_intent(intent: &SwipeIntent) -> Option<Self> {
        intent.action.is_like().then(|| LikeRecord {
            liker_id: intent.actor_id,
            liked_id: intent.target_id,
            is_super: intent.action == SwipeAction::SuperLike,
            created_at: intent.created_at,
        })
    }
}

/// Unordered profile pair stored as (min, max)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalPair {
    low: ProfileId,
    high: ProfileId,
}

impl CanonicalPair {
    pub fn new(a: ProfileId, b: ProfileId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn low(&self) -> ProfileId {
        self.low
    }

    pub fn high(&self) -> ProfileId {
        self.high
    }

    pub fn contains(&self, id: ProfileId) -> bool {
        self.low == id || self.high == id
    }

    /// The member that is not `id`, if `id` is a member
    pub fn other(&self, id: ProfileId) -> Option<ProfileId> {
        if id == self.low {
            Some(self.high)
        } else if id == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

/// Mutual match between two profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub pair: CanonicalPair,
    pub created_at: DateTime<Utc>,
    pub is_blocked: bool,
}

impl Match {
    pub fn is_participant(&self, id: ProfileId) -> bool {
        self.pair.contains(id)
    }
}

/// Message content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Image,
    Voice,
    Video,
    Gift,
}

impl MessageKind {
    /// Media messages carry an expiry
    pub fn is_media(self) -> bool {
        matches!(self, MessageKind::Image | MessageKind::Voice | MessageKind::Video)
    }
}

/// A stored in-match message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub match_id: MatchId,
    pub sender_id: ProfileId,
    pub kind: MessageKind,
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub gift_id: Option<String>,
    pub gift_cost: Option<i64>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub sent_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Message {
    /// False once a media message has passed its expiry
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expiry| now < expiry)
    }
}

/// Kind of coin ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "coin_transaction_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CoinTransactionKind {
    WelcomeBonus,
    Purchase,
    GiftSent,
    UndoFee,
    Refund,
}

impl CoinTransactionKind {
    /// Kinds that take coins away from a profile
    pub fn is_debit(self) -> bool {
        matches!(self, CoinTransactionKind::GiftSent | CoinTransactionKind::UndoFee)
    }
}

/// Append-only ledger row; `amount` is signed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinTransaction {
    pub id: Uuid,
    pub profile_id: ProfileId,
    pub amount: i64,
    pub kind: CoinTransactionKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Purchasable coin bundles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinPackage {
    Small,
    Medium,
    Large,
    Mega,
}

impl CoinPackage {
    pub fn coins(self) -> i64 {
        match self {
            CoinPackage::Small => 100,
            CoinPackage::Medium => 500,
            CoinPackage::Large => 1000,
            CoinPackage::Mega => 2500,
        }
    }
}

/// Candidate query pushed down to the store
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub viewer_id: ProfileId,
    pub min_age: u8,
    pub max_age: u8,
    pub gender: Option<String>,
    pub exclude_ids: Vec<ProfileId>,
    pub limit: usize,
}

/// Ranked discovery entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedCandidate {
    pub profile_id: ProfileId,
    pub display_name: String,
    pub age: u8,
    pub gender: String,
    pub bio: Option<String>,
    pub interests: Vec<String>,
    pub is_premium: bool,
    pub compatibility_score: u8,
    pub distance_km: Option<f64>,
}
