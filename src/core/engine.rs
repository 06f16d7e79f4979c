use std::sync::Arc;
use uuid::Uuid;

use crate::config::EconomySettings;
use crate::core::clock::{start_of_day, Clock};
use crate::core::ledger::CoinLedger;
use crate::error::CoreError;
use crate::models::{
    CanonicalPair, CoinTransactionKind, Profile, ProfileId, ReceivedLikes, SwipeAction,
    SwipeIntent, SwipeOutcome, UndoOutcome,
};
use crate::services::{MatchInsert, MatchStore};

/// Swipe & match engine
///
/// Records directional swipes, enforces the daily super-like quota, and
/// turns mutual likes into exactly one match per pair. Match uniqueness
/// rests on the store's conflict-tolerant insert, never on a read here.
#[derive(Clone)]
pub struct SwipeEngine {
    store: Arc<dyn MatchStore>,
    ledger: CoinLedger,
    clock: Arc<dyn Clock>,
    undo_cost: i64,
    daily_super_likes: u32,
    day_offset_minutes: i32,
}

impl SwipeEngine {
    pub fn new(
        store: Arc<dyn MatchStore>,
        ledger: CoinLedger,
        clock: Arc<dyn Clock>,
        economy: &EconomySettings,
    ) -> Self {
        Self {
            store,
            ledger,
            clock,
            undo_cost: economy.undo_cost,
            daily_super_likes: economy.daily_super_likes,
            day_offset_minutes: economy.day_offset_minutes,
        }
    }

    /// Record `actor`'s swipe on `target`
    ///
    /// Repeating a swipe on the same target is a no-op reported as
    /// `duplicate`; it never double-counts likes or creates a second match.
    pub async fn record_swipe(
        &self,
        actor: ProfileId,
        target: ProfileId,
        action: SwipeAction,
    ) -> Result<SwipeOutcome, CoreError> {
        if actor == target {
            return Err(CoreError::Validation("Cannot swipe on yourself".into()));
        }

        let actor_profile = self.load_profile(actor).await?;
        self.load_profile(target).await?;

        if self.store.get_swipe(actor, target).await?.is_some() {
            return self.duplicate_outcome(actor, target).await;
        }

        if action == SwipeAction::SuperLike && !actor_profile.is_premium {
            self.check_super_like_quota(actor).await?;
        }

        let intent = SwipeIntent {
            id: Uuid::new_v4(),
            actor_id: actor,
            target_id: target,
            action,
            created_at: self.clock.now(),
        };

        if !self.store.insert_swipe(&intent).await? {
            // A concurrent request for the same pair won the insert
            return self.duplicate_outcome(actor, target).await;
        }

        tracing::info!("Swipe recorded: {} -> {} ({})", actor, target, action.as_str());

        if !action.is_like() {
            return Ok(SwipeOutcome::no_match());
        }

        Ok(match self.reconcile_match(actor, target).await? {
            Some(inserted) => {
                let created = inserted.is_created();
                let m = inserted.into_match();
                SwipeOutcome {
                    is_match: true,
                    match_created: created,
                    match_id: Some(m.id),
                    duplicate: false,
                }
            }
            None => SwipeOutcome::no_match(),
        })
    }

    /// Create the match for `a` and `b` if both like each other
    ///
    /// Safe to call from both sides at once: the store inserts with a
    /// conflict-ignore on the canonical pair, so exactly one call sees
    /// `Created`. Returns `None` while interest is one-sided.
    pub async fn reconcile_match(
        &self,
        a: ProfileId,
        b: ProfileId,
    ) -> Result<Option<MatchInsert>, CoreError> {
        if !self.store.has_like(a, b).await? || !self.store.has_like(b, a).await? {
            return Ok(None);
        }

        let pair = CanonicalPair::new(a, b);
        let inserted = self.store.create_match_if_absent(pair, self.clock.now()).await?;

        if inserted.is_created() {
            tracing::info!("Match created between {} and {}", pair.low(), pair.high());
        } else {
            tracing::debug!("Match between {} and {} already exists", pair.low(), pair.high());
        }

        Ok(Some(inserted))
    }

    /// Undo the actor's most recent swipe
    ///
    /// Non-premium actors pay the undo fee; the charge and the deletion are
    /// one unit of work. An existing match is not retracted.
    pub async fn undo_last_swipe(&self, actor: ProfileId) -> Result<UndoOutcome, CoreError> {
        let profile = self.load_profile(actor).await?;

        let latest = self
            .store
            .latest_swipe(actor)
            .await?
            .ok_or_else(|| CoreError::NotFound("No swipe to undo".into()))?;

        let charge = if profile.is_premium || self.undo_cost == 0 {
            None
        } else {
            Some(self.ledger.prepare_debit(
                actor,
                self.undo_cost,
                CoinTransactionKind::UndoFee,
                "Undo swipe",
            )?)
        };

        let balance = self.store.delete_swipe(&latest, charge.as_ref()).await?;
        let coins_charged = charge.as_ref().map_or(0, |tx| -tx.amount);

        tracing::info!(
            "Undid swipe {} -> {} ({}), charged {} coins",
            actor,
            latest.target_id,
            latest.action.as_str(),
            coins_charged
        );

        Ok(UndoOutcome {
            undone: latest,
            coins_charged,
            balance,
        })
    }

    /// Who liked the viewer
    ///
    /// Premium viewers get the likes themselves; everyone else gets a count.
    pub async fn received_likes(&self, viewer: ProfileId) -> Result<ReceivedLikes, CoreError> {
        let profile = self.load_profile(viewer).await?;

        if profile.is_premium {
            let likes = self.store.likes_received(viewer).await?;
            return Ok(ReceivedLikes {
                count: likes.len() as u64,
                premium_required: false,
                likes,
            });
        }

        Ok(ReceivedLikes {
            count: self.store.count_likes_received(viewer).await?,
            premium_required: true,
            likes: Vec::new(),
        })
    }

    async fn check_super_like_quota(&self, actor: ProfileId) -> Result<(), CoreError> {
        let since = start_of_day(self.clock.now(), self.day_offset_minutes);
        let used = self.store.count_super_likes_since(actor, since).await?;

        if used >= u64::from(self.daily_super_likes) {
            tracing::info!("Super like quota reached for {} ({} today)", actor, used);
            return Err(CoreError::QuotaExceeded {
                limit: self.daily_super_likes,
            });
        }
        Ok(())
    }

    async fn duplicate_outcome(
        &self,
        actor: ProfileId,
        target: ProfileId,
    ) -> Result<SwipeOutcome, CoreError> {
        tracing::debug!("Duplicate swipe {} -> {} ignored", actor, target);

        let existing = self.store.find_match(CanonicalPair::new(actor, target)).await?;
        Ok(SwipeOutcome {
            is_match: existing.is_some(),
            match_id: existing.map(|m| m.id),
            ..SwipeOutcome::duplicate()
        })
    }

    async fn load_profile(&self, id: ProfileId) -> Result<Profile, CoreError> {
        self.store
            .get_profile(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Profile {}", id)))
    }
}
