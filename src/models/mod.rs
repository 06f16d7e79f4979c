// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CandidateQuery, CanonicalPair, CoinPackage, CoinTransaction, CoinTransactionKind,
    DiscoveryPreferences, FeedCandidate, GeoPoint, LikeRecord, Match, MatchId, Message,
    MessageKind, Profile, ProfileId, SwipeAction, SwipeIntent,
};
pub use requests::{FeedRequest, FetchMessagesRequest, HistoryRequest, SendMessageRequest, SwipeRequest};
pub use responses::{
    BalanceResponse, BlockResponse, ErrorResponse, FeedResponse, FetchedMessage, HealthResponse,
    HistoryResponse, MatchSummary, ReceivedLikes, SwipeOutcome, UndoOutcome,
};
