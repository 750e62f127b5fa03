// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CandidateMatch, DecisionKind, InterestAction, InterestDecision, Introduction,
    IntroductionDecision, IntroductionOutcome, IntroductionStatus, ListId, MatchBand, Momentum,
    Role, SearchFilters, SearchPreset, WatchIntent,
};
pub use requests::{
    IntroductionRequest, IntroductionResponseRequest, OutcomeUpdateRequest, RecordInterestRequest,
    WatchlistRequest,
};
pub use responses::{
    Acknowledgement, ErrorResponse, IntroductionCreated, ReadinessSummary, RiskItem,
    StartupDetail, WatchlistEntry,
};
