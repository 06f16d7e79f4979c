use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::filters::matches_query_constraints;
use crate::models::{
    CandidateQuery, CanonicalPair, CoinTransaction, LikeRecord, Match, MatchId, Message, Profile,
    ProfileId, SwipeAction, SwipeIntent,
};
use crate::services::store::{MatchInsert, MatchStore, StoreError};

#[derive(Default)]
struct State {
    profiles: HashMap<ProfileId, Profile>,
    /// Insertion order is recency order
    swipes: Vec<SwipeIntent>,
    likes: Vec<LikeRecord>,
    matches: HashMap<CanonicalPair, Match>,
    /// Insertion order is send order
    messages: Vec<Message>,
    transactions: Vec<CoinTransaction>,
    /// Actors whose latest swipe was undone and who have not swiped since
    undo_spent: HashSet<ProfileId>,
}

impl State {
    fn apply(&mut self, tx: &CoinTransaction) -> Result<i64, StoreError> {
        let profile = self
            .profiles
            .get_mut(&tx.profile_id)
            .ok_or_else(|| StoreError::NotFound(format!("profile {}", tx.profile_id)))?;

        let next = profile.coins.checked_add(tx.amount).ok_or(StoreError::BalanceOverflow {
            balance: profile.coins,
            amount: tx.amount,
        })?;
        if next < 0 {
            return Err(StoreError::InsufficientFunds {
                balance: profile.coins,
                required: -tx.amount,
            });
        }

        profile.coins = next;
        self.transactions.push(tx.clone());
        Ok(next)
    }
}

/// In-process store with the same unit-of-work semantics as PostgreSQL
///
/// Every operation holds the state lock for its whole duration, which
/// serializes units of work the way a transaction would.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of match rows for the pair; used to check uniqueness
    pub async fn match_count(&self, pair: CanonicalPair) -> usize {
        let state = self.state.lock().await;
        state.matches.values().filter(|m| m.pair == pair).count()
    }

    pub async fn message_count(&self) -> usize {
        self.state.lock().await.messages.len()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        Ok(self.state.lock().await.profiles.get(&id).cloned())
    }

    async fn query_candidates(&self, query: &CandidateQuery) -> Result<Vec<Profile>, StoreError> {
        let state = self.state.lock().await;
        let mut candidates: Vec<Profile> = state
            .profiles
            .values()
            .filter(|p| matches_query_constraints(p, query))
            .cloned()
            .collect();

        candidates.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        candidates.truncate(query.limit);
        Ok(candidates)
    }

    async fn swiped_targets(&self, actor: ProfileId) -> Result<Vec<ProfileId>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .swipes
            .iter()
            .filter(|s| s.actor_id == actor)
            .map(|s| s.target_id)
            .collect())
    }

    async fn get_swipe(
        &self,
        actor: ProfileId,
        target: ProfileId,
    ) -> Result<Option<SwipeIntent>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .swipes
            .iter()
            .find(|s| s.actor_id == actor && s.target_id == target)
            .cloned())
    }

    async fn count_super_likes_since(
        &self,
        actor: ProfileId,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .likes
            .iter()
            .filter(|l| l.liker_id == actor && l.is_super && l.created_at >= since)
            .count() as u64)
    }

    async fn insert_swipe(&self, intent: &SwipeIntent) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;

        let exists = state
            .swipes
            .iter()
            .any(|s| s.actor_id == intent.actor_id && s.target_id == intent.target_id);
        if exists {
            return Ok(false);
        }

        if !state.profiles.contains_key(&intent.actor_id) {
            return Err(StoreError::NotFound(format!("profile {}", intent.actor_id)));
        }

        state.swipes.push(intent.clone());
        state.undo_spent.remove(&intent.actor_id);

        if let Some(like) = LikeRecord::from_intent(intent) {
            let duplicate_like = state
                .likes
                .iter()
                .any(|l| l.liker_id == like.liker_id && l.liked_id == like.liked_id);
            if !duplicate_like {
                state.likes.push(like);
            }

            if let Some(actor) = state.profiles.get_mut(&intent.actor_id) {
                actor.total_likes_given += 1;
                if intent.action == SwipeAction::SuperLike {
                    actor.total_super_likes_given += 1;
                }
            }
        }

        Ok(true)
    }

    async fn has_like(&self, liker: ProfileId, liked: ProfileId) -> Result<bool, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .likes
            .iter()
            .any(|l| l.liker_id == liker && l.liked_id == liked))
    }

    async fn latest_swipe(&self, actor: ProfileId) -> Result<Option<SwipeIntent>, StoreError> {
        let state = self.state.lock().await;
        if state.undo_spent.contains(&actor) {
            return Ok(None);
        }
        Ok(state
            .swipes
            .iter()
            .rev()
            .find(|s| s.actor_id == actor)
            .cloned())
    }

    async fn delete_swipe(
        &self,
        intent: &SwipeIntent,
        charge: Option<&CoinTransaction>,
    ) -> Result<Option<i64>, StoreError> {
        let mut state = self.state.lock().await;

        if !state.swipes.iter().any(|s| s.id == intent.id) {
            return Err(StoreError::NotFound(format!("swipe {}", intent.id)));
        }

        let balance = match charge {
            Some(tx) => Some(state.apply(tx)?),
            None => None,
        };

        state.swipes.retain(|s| s.id != intent.id);
        if intent.action.is_like() {
            state
                .likes
                .retain(|l| !(l.liker_id == intent.actor_id && l.liked_id == intent.target_id));
        }
        state.undo_spent.insert(intent.actor_id);

        Ok(balance)
    }

    async fn count_likes_received(&self, liked: ProfileId) -> Result<u64, StoreError> {
        let state = self.state.lock().await;
        Ok(state.likes.iter().filter(|l| l.liked_id == liked).count() as u64)
    }

    async fn likes_received(&self, liked: ProfileId) -> Result<Vec<LikeRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .likes
            .iter()
            .rev()
            .filter(|l| l.liked_id == liked)
            .cloned()
            .collect())
    }

    async fn create_match_if_absent(
        &self,
        pair: CanonicalPair,
        at: DateTime<Utc>,
    ) -> Result<MatchInsert, StoreError> {
        let mut state = self.state.lock().await;

        if let Some(existing) = state.matches.get(&pair) {
            return Ok(MatchInsert::Existing(existing.clone()));
        }

        let created = Match {
            id: Uuid::new_v4(),
            pair,
            created_at: at,
            is_blocked: false,
        };
        state.matches.insert(pair, created.clone());

        for id in [pair.low(), pair.high()] {
            if let Some(profile) = state.profiles.get_mut(&id) {
                profile.total_matches += 1;
            }
        }

        Ok(MatchInsert::Created(created))
    }

    async fn get_match(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.matches.values().find(|m| m.id == id).cloned())
    }

    async fn find_match(&self, pair: CanonicalPair) -> Result<Option<Match>, StoreError> {
        Ok(self.state.lock().await.matches.get(&pair).cloned())
    }

    async fn active_matches_for(&self, profile: ProfileId) -> Result<Vec<Match>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .matches
            .values()
            .filter(|m| !m.is_blocked && m.is_participant(profile))
            .cloned()
            .collect())
    }

    async fn block_match(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.matches.values_mut().find(|m| m.id == id).map(|m| {
            m.is_blocked = true;
            m.clone()
        }))
    }

    async fn insert_message(
        &self,
        message: &Message,
        charge: Option<&CoinTransaction>,
    ) -> Result<Option<i64>, StoreError> {
        let mut state = self.state.lock().await;

        let balance = match charge {
            Some(tx) => Some(state.apply(tx)?),
            None => None,
        };

        state.messages.push(message.clone());
        Ok(balance)
    }

    async fn fetch_and_mark_read(
        &self,
        match_id: MatchId,
        reader: ProfileId,
        limit: usize,
        at: DateTime<Utc>,
    ) -> Result<Vec<Message>, StoreError> {
        let mut state = self.state.lock().await;
        let listed: Vec<Message> = state
            .messages
            .iter()
            .filter(|m| m.match_id == match_id)
            .take(limit)
            .cloned()
            .collect();

        for message in state
            .messages
            .iter_mut()
            .filter(|m| m.match_id == match_id && m.sender_id != reader && !m.is_read)
        {
            message.is_read = true;
            message.read_at = Some(at);
        }

        Ok(listed)
    }

    async fn last_message(&self, match_id: MatchId) -> Result<Option<Message>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .messages
            .iter()
            .rev()
            .find(|m| m.match_id == match_id)
            .cloned())
    }

    async fn count_unread(&self, match_id: MatchId, reader: ProfileId) -> Result<u64, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .messages
            .iter()
            .filter(|m| m.match_id == match_id && m.sender_id != reader && !m.is_read)
            .count() as u64)
    }

    async fn apply_transaction(&self, tx: &CoinTransaction) -> Result<i64, StoreError> {
        self.state.lock().await.apply(tx)
    }

    async fn transactions(
        &self,
        profile: ProfileId,
        limit: usize,
    ) -> Result<Vec<CoinTransaction>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .iter()
            .rev()
            .filter(|t| t.profile_id == profile)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
