use std::time::Duration;

/// In-memory cache of oracle verdicts
///
/// Keyed on the oracle inputs, so the same pair of bios with the same shared
/// interests is only assessed once per TTL. The bio pair is unordered.
#[derive(Clone)]
pub struct OracleScoreCache {
    scores: moka::future::Cache<CacheKey, u8>,
}

impl OracleScoreCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let scores = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { scores }
    }

    pub async fn get(&self, bio_a: &str, bio_b: &str, shared: &[String]) -> Option<u8> {
        let hit = self.scores.get(&CacheKey::oracle(bio_a, bio_b, shared)).await;
        if hit.is_some() {
            tracing::trace!("Oracle cache hit for {} shared interests", shared.len());
        }
        hit
    }

    pub async fn insert(&self, bio_a: &str, bio_b: &str, shared: &[String], score: u8) {
        self.scores.insert(CacheKey::oracle(bio_a, bio_b, shared), score).await;
    }
}

/// Oracle inputs as a cache key, bios in sorted order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    bios: (String, String),
    shared: Vec<String>,
}

impl CacheKey {
    /// Key for an oracle verdict; order of the two bios does not matter
    pub fn oracle(bio_a: &str, bio_b: &str, shared: &[String]) -> Self {
        let (first, second) = if bio_a <= bio_b { (bio_a, bio_b) } else { (bio_b, bio_a) };

        Self {
            bios: (first.to_string(), second.to_string()),
            shared: shared.to_vec(),
        }
    }
}
