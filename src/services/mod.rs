// Service exports
pub mod cache;
pub mod memory;
pub mod notifier;
pub mod oracle;
pub mod postgres;
pub mod store;

pub use cache::OracleScoreCache;
pub use memory::MemoryStore;
pub use notifier::{MessageNotification, Notifier, TracingNotifier};
pub use oracle::HttpOracle;
pub use postgres::PostgresStore;
pub use store::{MatchInsert, MatchStore, StoreError};
