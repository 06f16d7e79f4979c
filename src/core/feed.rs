use futures::future::join_all;
use std::sync::Arc;

use crate::config::{FeedSettings, RankingPolicy};
use crate::core::compatibility::CompatibilityScorer;
use crate::core::distance::distance_between;
use crate::core::filters::matches_query_constraints;
use crate::error::CoreError;
use crate::models::{CandidateQuery, FeedCandidate, Profile, ProfileId};
use crate::services::MatchStore;

/// Result of building a feed
#[derive(Debug)]
pub struct FeedResult {
    pub candidates: Vec<FeedCandidate>,
    pub total_candidates: usize,
}

/// Discovery feed builder
///
/// # Pipeline Stages
/// 1. Store query: not the viewer, visible, age range, gender, not swiped
/// 2. Same constraints re-checked in process
/// 3. Cap at `limit`
/// 4. Compatibility scoring, all candidates concurrently
/// 5. Ranking by the configured policy
#[derive(Clone)]
pub struct FeedBuilder {
    store: Arc<dyn MatchStore>,
    scorer: CompatibilityScorer,
    max_limit: usize,
    ranking: RankingPolicy,
}

impl FeedBuilder {
    pub fn new(store: Arc<dyn MatchStore>, scorer: CompatibilityScorer, settings: &FeedSettings) -> Self {
        Self {
            store,
            scorer,
            max_limit: settings.max_limit,
            ranking: settings.ranking,
        }
    }

    /// Build a ranked candidate list for `viewer`
    ///
    /// Each call starts over; there is no cursor.
    pub async fn build_feed(&self, viewer: ProfileId, limit: usize) -> Result<FeedResult, CoreError> {
        if limit == 0 || limit > self.max_limit {
            return Err(CoreError::Validation(format!(
                "limit must be between 1 and {}, got {}",
                self.max_limit, limit
            )));
        }

        let viewer = self
            .store
            .get_profile(viewer)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Profile {}", viewer)))?;

        let query = CandidateQuery {
            viewer_id: viewer.id,
            min_age: viewer.preferences.min_age,
            max_age: viewer.preferences.max_age,
            gender: viewer.preferences.show_gender.clone(),
            exclude_ids: self.store.swiped_targets(viewer.id).await?,
            limit,
        };

        let candidates: Vec<Profile> = self
            .store
            .query_candidates(&query)
            .await?
            .into_iter()
            .filter(|profile| matches_query_constraints(profile, &query))
            .take(limit)
            .collect();

        let total_candidates = candidates.len();

        let scores = join_all(candidates.iter().map(|candidate| {
            self.scorer.score(
                &viewer.interests,
                &candidate.interests,
                viewer.bio_text(),
                candidate.bio_text(),
            )
        }))
        .await;

        let mut entries: Vec<FeedCandidate> = candidates
            .into_iter()
            .zip(scores)
            .map(|(candidate, score)| FeedCandidate {
                distance_km: distance_between(viewer.location, candidate.location),
                profile_id: candidate.id,
                display_name: candidate.display_name,
                age: candidate.age,
                gender: candidate.gender,
                bio: candidate.bio,
                interests: candidate.interests,
                is_premium: candidate.is_premium,
                compatibility_score: score,
            })
            .collect();

        rank_candidates(&mut entries, self.ranking);

        tracing::debug!(
            "Built feed for {}: {} candidates ({:?})",
            viewer.id,
            entries.len(),
            self.ranking
        );

        Ok(FeedResult {
            candidates: entries,
            total_candidates,
        })
    }
}

/// Sort candidates in place by `policy`
///
/// The sort is stable, so equal candidates keep their query order.
pub fn rank_candidates(candidates: &mut [FeedCandidate], policy: RankingPolicy) {
    match policy {
        RankingPolicy::PremiumFirst => candidates.sort_by(|a, b| {
            b.is_premium
                .cmp(&a.is_premium)
                .then_with(|| b.compatibility_score.cmp(&a.compatibility_score))
        }),
        RankingPolicy::ScoreOnly => {
            candidates.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score))
        }
    }
}
