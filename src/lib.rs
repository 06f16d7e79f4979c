//! Sphere Match - matching core for the ConnectSphere dating app
//!
//! Swipes, mutual matches, the discovery feed, in-match messaging and the
//! coin ledger behind paid actions. Persistence, the compatibility oracle
//! and notification delivery are injected ports.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    CoinLedger, CompatibilityScorer, FeedBuilder, MessagePayload, MessagingGateway, SwipeEngine,
};
pub use error::CoreError;
pub use models::{Match, Message, Profile, SwipeAction, SwipeOutcome};
pub use services::{MatchStore, MemoryStore, PostgresStore};
