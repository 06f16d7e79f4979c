use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    CandidateQuery, CanonicalPair, CoinTransaction, LikeRecord, Match, MatchId, Message, Profile,
    ProfileId, SwipeIntent,
};

/// Errors raised by a persistence backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Insufficient coins: balance {balance}, required {required}")]
    InsufficientFunds { balance: i64, required: i64 },

    #[error("Balance overflow: balance {balance}, amount {amount}")]
    BalanceOverflow { balance: i64, amount: i64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Outcome of a conflict-tolerant match insert
#[derive(Debug, Clone, PartialEq)]
pub enum MatchInsert {
    /// This call inserted the row
    Created(Match),
    /// A row for the pair already existed
    Existing(Match),
}

impl MatchInsert {
    pub fn into_match(self) -> Match {
        match self {
            MatchInsert::Created(m) | MatchInsert::Existing(m) => m,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, MatchInsert::Created(_))
    }
}

/// Persistence port for the matching core
///
/// Every method is a single unit of work. Methods taking an optional
/// `charge` apply the coin transaction in the same unit of work, so a
/// failed charge leaves no trace of the rest of the operation.
#[async_trait]
pub trait MatchStore: Send + Sync {
    // Profiles

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    async fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>, StoreError>;

    /// Discoverable profiles satisfying the query, oldest registration first
    async fn query_candidates(&self, query: &CandidateQuery) -> Result<Vec<Profile>, StoreError>;

    // Swipes and likes

    /// Every target `actor` has swiped, in any direction
    async fn swiped_targets(&self, actor: ProfileId) -> Result<Vec<ProfileId>, StoreError>;

    async fn get_swipe(
        &self,
        actor: ProfileId,
        target: ProfileId,
    ) -> Result<Option<SwipeIntent>, StoreError>;

    async fn count_super_likes_since(
        &self,
        actor: ProfileId,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// Insert the intent, ignoring a conflict on (actor, target).
    ///
    /// When inserted and the action is a like, the like record and the
    /// actor's like counters are written in the same unit of work. An
    /// inserted swipe reopens the actor's undo history.
    /// Returns whether the intent was inserted.
    async fn insert_swipe(&self, intent: &SwipeIntent) -> Result<bool, StoreError>;

    async fn has_like(&self, liker: ProfileId, liked: ProfileId) -> Result<bool, StoreError>;

    /// Most recent swipe, unless the actor has undone a swipe since their
    /// last one; undo history is one swipe deep.
    async fn latest_swipe(&self, actor: ProfileId) -> Result<Option<SwipeIntent>, StoreError>;

    /// Delete the intent and its like record after applying `charge`.
    ///
    /// Closes the actor's undo history until their next swipe.
    /// Fails with `NotFound` when the intent no longer exists. Returns the
    /// balance after the charge, if one was applied.
    async fn delete_swipe(
        &self,
        intent: &SwipeIntent,
        charge: Option<&CoinTransaction>,
    ) -> Result<Option<i64>, StoreError>;

    async fn count_likes_received(&self, liked: ProfileId) -> Result<u64, StoreError>;

    /// Likes received, newest first
    async fn likes_received(&self, liked: ProfileId) -> Result<Vec<LikeRecord>, StoreError>;

    // Matches

    /// Insert a match for the pair, ignoring a conflict on the pair.
    ///
    /// On insert both profiles' match counters are incremented.
    async fn create_match_if_absent(
        &self,
        pair: CanonicalPair,
        at: DateTime<Utc>,
    ) -> Result<MatchInsert, StoreError>;

    async fn get_match(&self, id: MatchId) -> Result<Option<Match>, StoreError>;

    async fn find_match(&self, pair: CanonicalPair) -> Result<Option<Match>, StoreError>;

    /// Non-blocked matches the profile participates in
    async fn active_matches_for(&self, profile: ProfileId) -> Result<Vec<Match>, StoreError>;

    async fn block_match(&self, id: MatchId) -> Result<Option<Match>, StoreError>;

    // Messages

    /// Insert the message after applying `charge`; returns the balance
    /// after the charge, if one was applied.
    async fn insert_message(
        &self,
        message: &Message,
        charge: Option<&CoinTransaction>,
    ) -> Result<Option<i64>, StoreError>;

    /// Oldest first, at most `limit`, then mark every unread message in the
    /// match not sent by `reader` as read.
    ///
    /// Listing and marking are one unit of work, so a message sent
    /// concurrently is only marked if it was already stored at listing time.
    /// The returned messages show the read state from before marking.
    async fn fetch_and_mark_read(
        &self,
        match_id: MatchId,
        reader: ProfileId,
        limit: usize,
        at: DateTime<Utc>,
    ) -> Result<Vec<Message>, StoreError>;

    async fn last_message(&self, match_id: MatchId) -> Result<Option<Message>, StoreError>;

    async fn count_unread(&self, match_id: MatchId, reader: ProfileId) -> Result<u64, StoreError>;

    // Coin ledger

    /// Append the transaction and adjust the cached balance atomically.
    ///
    /// Fails with `InsufficientFunds` if the balance would go negative and
    /// with `BalanceOverflow` if it would leave the `i64` range.
    async fn apply_transaction(&self, tx: &CoinTransaction) -> Result<i64, StoreError>;

    /// Newest first, at most `limit`
    async fn transactions(
        &self,
        profile: ProfileId,
        limit: usize,
    ) -> Result<Vec<CoinTransaction>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

