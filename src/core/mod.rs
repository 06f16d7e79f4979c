// Core matching exports
pub mod clock;
pub mod compatibility;
pub mod distance;
pub mod engine;
pub mod feed;
pub mod filters;
pub mod ledger;
pub mod messaging;

pub use clock::{start_of_day, Clock, ManualClock, SystemClock};
pub use compatibility::{
    parse_oracle_score, CompatibilityOracle, CompatibilityScorer, FallbackReason, InterestOverlap,
    OracleError, OracleVerdict,
};
pub use distance::{distance_between, haversine_distance};
pub use engine::SwipeEngine;
pub use feed::{rank_candidates, FeedBuilder, FeedResult};
pub use filters::matches_query_constraints;
pub use ledger::CoinLedger;
pub use messaging::{MediaKind, MessagePayload, MessagingGateway};
