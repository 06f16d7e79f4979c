use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::services::cache::OracleScoreCache;

/// Errors from an external compatibility oracle
///
/// These never reach callers of the scorer; they select the fallback branch.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Oracle returned status {0}")]
    Status(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// External service that rates two bios against each other
#[async_trait]
pub trait CompatibilityOracle: Send + Sync {
    /// Free-form answer expected to contain a 0-100 rating
    async fn assess(
        &self,
        bio_a: &str,
        bio_b: &str,
        common_interests: &[String],
    ) -> Result<String, OracleError>;
}

/// Why the oracle did not contribute to a score
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NotConfigured,
    MissingBio,
    TimedOut,
    Failed(String),
    Unparseable(String),
}

/// Outcome of consulting the oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleVerdict {
    Scored(u8),
    Fallback(FallbackReason),
}

/// Interest overlap of two profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestOverlap {
    pub shared: Vec<String>,
    pub union_size: usize,
}

impl InterestOverlap {
    /// `None` when either side has no interests
    pub fn between(a: &[String], b: &[String]) -> Option<Self> {
        let a: HashSet<&str> = a.iter().map(String::as_str).collect();
        let b: HashSet<&str> = b.iter().map(String::as_str).collect();

        if a.is_empty() || b.is_empty() {
            return None;
        }

        let mut shared: Vec<String> = a.intersection(&b).map(|s| s.to_string()).collect();
        shared.sort();

        Some(Self {
            shared,
            union_size: a.union(&b).count(),
        })
    }

    /// Jaccard similarity x 100, rounded down
    pub fn percent(&self) -> u8 {
        (self.shared.len() * 100 / self.union_size) as u8
    }

    /// 60% interests, 40% oracle, rounded down
    ///
    /// Computed as `(300 * shared + 2 * oracle * union) / (5 * union)` so
    /// the result is exact integer arithmetic.
    pub fn blend(&self, oracle: u8) -> u8 {
        let oracle = oracle.min(100) as usize;
        let numerator = 300 * self.shared.len() + 2 * oracle * self.union_size;
        (numerator / (5 * self.union_size)).min(100) as u8
    }
}

/// Extract a 0-100 rating from free-form oracle text
///
/// Takes the first run of digits and clamps it to 100. Text without
/// digits is unparseable.
pub fn parse_oracle_score(text: &str) -> Option<u8> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let run: &str = text[start..]
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();

    let significant = run.trim_start_matches('0');
    if significant.is_empty() {
        return Some(0);
    }
    if significant.len() > 3 {
        return Some(100);
    }

    significant.parse::<u16>().ok().map(|v| v.min(100) as u8)
}

/// Computes 0-100 compatibility between two profiles
///
/// The interest overlap is always available; an oracle, when configured
/// and both bios are present, is blended in. Oracle problems of any kind
/// fall back to the interest-only score.
#[derive(Clone)]
pub struct CompatibilityScorer {
    oracle: Option<Arc<dyn CompatibilityOracle>>,
    timeout: Duration,
    cache: Option<OracleScoreCache>,
}

impl CompatibilityScorer {
    /// Scorer that never consults an oracle
    pub fn interests_only() -> Self {
        Self {
            oracle: None,
            timeout: Duration::from_secs(2),
            cache: None,
        }
    }

    pub fn with_oracle(oracle: Arc<dyn CompatibilityOracle>, timeout: Duration) -> Self {
        Self {
            oracle: Some(oracle),
            timeout,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: OracleScoreCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Compatibility score in [0, 100]
    pub async fn score(
        &self,
        interests_a: &[String],
        interests_b: &[String],
        bio_a: Option<&str>,
        bio_b: Option<&str>,
    ) -> u8 {
        let Some(overlap) = InterestOverlap::between(interests_a, interests_b) else {
            return 0;
        };

        match self.consult_oracle(&overlap, bio_a, bio_b).await {
            OracleVerdict::Scored(oracle) => overlap.blend(oracle),
            OracleVerdict::Fallback(reason) => {
                if !matches!(reason, FallbackReason::NotConfigured | FallbackReason::MissingBio) {
                    tracing::debug!("Compatibility oracle fallback: {:?}", reason);
                }
                overlap.percent()
            }
        }
    }

    /// Ask the oracle, bounded by the configured timeout
    pub async fn consult_oracle(
        &self,
        overlap: &InterestOverlap,
        bio_a: Option<&str>,
        bio_b: Option<&str>,
    ) -> OracleVerdict {
        let Some(oracle) = &self.oracle else {
            return OracleVerdict::Fallback(FallbackReason::NotConfigured);
        };

        let (bio_a, bio_b) = match (non_empty(bio_a), non_empty(bio_b)) {
            (Some(a), Some(b)) => (a, b),
            _ => return OracleVerdict::Fallback(FallbackReason::MissingBio),
        };

        if let Some(cache) = &self.cache {
            if let Some(score) = cache.get(bio_a, bio_b, &overlap.shared).await {
                return OracleVerdict::Scored(score);
            }
        }

        let answer = match tokio::time::timeout(
            self.timeout,
            oracle.assess(bio_a, bio_b, &overlap.shared),
        )
        .await
        {
            Err(_) => return OracleVerdict::Fallback(FallbackReason::TimedOut),
            Ok(Err(e)) => return OracleVerdict::Fallback(FallbackReason::Failed(e.to_string())),
            Ok(Ok(answer)) => answer,
        };

        match parse_oracle_score(&answer) {
            Some(score) => {
                if let Some(cache) = &self.cache {
                    cache.insert(bio_a, bio_b, &overlap.shared, score).await;
                }
                OracleVerdict::Scored(score)
            }
            None => OracleVerdict::Fallback(FallbackReason::Unparseable(answer)),
        }
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
